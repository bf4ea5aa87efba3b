use thiserror::Error;

use crate::{LookupError, Role};

/// Why the gate refused a request.
///
/// Variants are kept distinct for diagnostics. Callers facing the network
/// must collapse them with [`AuthError::kind`] so that clients only ever see
/// which class of failure occurred, never which check failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingHeader,

    #[error("authorization header is not a bearer credential")]
    MalformedHeader,

    #[error("token rejected: {0}")]
    InvalidToken(String),

    #[error("token has expired")]
    Expired,

    #[error("path parameter '{param}' does not match the authenticated identity")]
    SelfAccessMismatch { param: String },

    #[error("no user record for the authenticated identity")]
    UnknownUser,

    #[error("user does not hold role '{required}'")]
    RoleMismatch { required: Role },

    #[error("user is not verified")]
    Unverified,

    #[error("user has been fired")]
    Fired,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Externally visible failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// 401: no valid credential.
    Unauthenticated,
    /// 403: valid credential, insufficient privilege.
    Forbidden,
    /// The user store could not answer.
    LookupFailure,
}

/// Position in the per-request check chain.
///
/// Requests move strictly forward through these stages; a failure at any
/// stage ends the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    Authentication,
    SelfAccess,
    Role,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::InvalidToken(_)
            | AuthError::Expired => AuthErrorKind::Unauthenticated,
            AuthError::SelfAccessMismatch { .. }
            | AuthError::UnknownUser
            | AuthError::RoleMismatch { .. }
            | AuthError::Unverified
            | AuthError::Fired => AuthErrorKind::Forbidden,
            AuthError::Lookup(_) => AuthErrorKind::LookupFailure,
        }
    }

    pub fn stage(&self) -> GateStage {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::InvalidToken(_)
            | AuthError::Expired => GateStage::Authentication,
            AuthError::SelfAccessMismatch { .. } => GateStage::SelfAccess,
            AuthError::UnknownUser
            | AuthError::RoleMismatch { .. }
            | AuthError::Unverified
            | AuthError::Fired
            | AuthError::Lookup(_) => GateStage::Role,
        }
    }
}
