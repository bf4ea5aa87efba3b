//! Per-route authorization chain.
//!
//! A route declares an [`AccessPolicy`]; the [`Gate`] runs its checks in a
//! fixed order and stops at the first failure:
//!
//! 1. credential verification (always)
//! 2. self-access: a path parameter must equal the authenticated email
//! 3. role: the caller's user record must grant the required role

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{AuthError, AuthenticatedIdentity, CredentialVerifier, Role, RoleResolver};

/// Checks a route requires beyond authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    self_access: Option<Cow<'static, str>>,
    role: Option<Role>,
}

impl AccessPolicy {
    /// Valid credential only.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Require the path parameter `param` to equal the caller's email.
    pub fn self_access(mut self, param: impl Into<Cow<'static, str>>) -> Self {
        self.self_access = Some(param.into());
        self
    }

    /// Require the caller to hold `role` (and be verified).
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn self_access_param(&self) -> Option<&str> {
        self.self_access.as_deref()
    }

    pub fn required_role(&self) -> Option<&Role> {
        self.role.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct Gate {
    verifier: CredentialVerifier,
    resolver: RoleResolver,
}

impl Gate {
    pub fn new(verifier: CredentialVerifier, resolver: RoleResolver) -> Self {
        Self { verifier, resolver }
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Run `policy` against one request.
    ///
    /// `path_params` are the matched route parameters; only consulted when
    /// the policy declares a self-access check.
    pub async fn authorize(
        &self,
        policy: &AccessPolicy,
        authorization: Option<&str>,
        path_params: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let identity = self.verifier.verify(authorization, now)?;

        if let Some(param) = policy.self_access_param() {
            let requested = path_params.get(param).map(String::as_str);
            if requested != Some(identity.email()) {
                return Err(AuthError::SelfAccessMismatch {
                    param: param.to_string(),
                });
            }
        }

        if let Some(role) = policy.required_role() {
            self.resolver.require(&identity, role).await?;
        }

        Ok(identity)
    }
}
