//! `empdesk-auth` — authentication/authorization gate.
//!
//! This crate is intentionally decoupled from HTTP and storage: the HTTP layer
//! hands it a raw `Authorization` value and path parameters, and storage is
//! reached through the [`UserLookup`] seam.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod principal;
pub mod resolver;
pub mod roles;
pub mod user;
pub mod verifier;

pub use authorize::{authorize, PrivilegePolicy};
pub use claims::{validate_claims, IdentityClaim, TOKEN_LIFETIME_SECS};
pub use error::{AuthError, AuthErrorKind, GateStage};
pub use gate::{AccessPolicy, Gate};
pub use jwt::{Hs256Jwt, JwtValidator, TokenError};
pub use principal::AuthenticatedIdentity;
pub use resolver::{LookupError, RoleResolver, UserLookup};
pub use roles::Role;
pub use user::UserRecord;
pub use verifier::CredentialVerifier;
