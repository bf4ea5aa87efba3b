use crate::{AuthError, Role, UserRecord};

/// Tunables of the privilege predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrivilegePolicy {
    /// Also require `fired == false`.
    ///
    /// Off by default: a fired user who still holds a verified role keeps
    /// access until the role or verification is revoked.
    pub exclude_fired: bool,
}

/// Decide whether a user record grants `required`.
///
/// - No IO
/// - No panics
/// - A missing record is a denial, not an error
pub fn authorize(
    record: Option<&UserRecord>,
    required: &Role,
    policy: &PrivilegePolicy,
) -> Result<(), AuthError> {
    let record = record.ok_or(AuthError::UnknownUser)?;

    if record.role.as_ref() != Some(required) {
        return Err(AuthError::RoleMismatch {
            required: required.clone(),
        });
    }
    if !record.verified {
        return Err(AuthError::Unverified);
    }
    if policy.exclude_fired && record.fired {
        return Err(AuthError::Fired);
    }

    Ok(())
}
