use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{authorize, AuthError, AuthenticatedIdentity, PrivilegePolicy, Role, UserRecord};

/// The user store could not answer a lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("user lookup failed: {message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Point read of a user record by its unique email.
///
/// Implementations return `Ok(None)` when no record exists; `Err` is reserved
/// for the store itself failing.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, LookupError>;
}

/// Answers "does this identity currently hold role R and is it verified?".
#[derive(Clone)]
pub struct RoleResolver {
    lookup: Arc<dyn UserLookup>,
    policy: PrivilegePolicy,
}

impl RoleResolver {
    pub fn new(lookup: Arc<dyn UserLookup>, policy: PrivilegePolicy) -> Self {
        Self { lookup, policy }
    }

    pub fn policy(&self) -> &PrivilegePolicy {
        &self.policy
    }

    /// Deny unless the identity's record grants `role`.
    pub async fn require(&self, identity: &AuthenticatedIdentity, role: &Role) -> Result<(), AuthError> {
        let record = self.lookup.find_by_email(identity.email()).await?;
        authorize(record.as_ref(), role, &self.policy)
    }

    /// Same predicate as [`RoleResolver::require`], as a boolean.
    pub async fn holds(&self, identity: &AuthenticatedIdentity, role: &Role) -> Result<bool, LookupError> {
        match self.require(identity, role).await {
            Ok(()) => Ok(true),
            Err(AuthError::Lookup(e)) => Err(e),
            Err(_) => Ok(false),
        }
    }
}

impl core::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
