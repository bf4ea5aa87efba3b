use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role label stored on a user record.
///
/// Roles are opaque strings compared by exact match; only [`Role::ADMIN`] and
/// [`Role::HR`] carry privileges. Any other label (or none) grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("Admin"));
    pub const HR: Role = Role(Cow::Borrowed("HR"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
