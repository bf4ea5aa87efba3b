use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AuthError, AuthenticatedIdentity, JwtValidator};

/// Turns an `Authorization` header value into an [`AuthenticatedIdentity`].
#[derive(Clone)]
pub struct CredentialVerifier {
    jwt: Arc<dyn JwtValidator>,
}

impl CredentialVerifier {
    pub fn new(jwt: Arc<dyn JwtValidator>) -> Self {
        Self { jwt }
    }

    pub fn verify(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let token = extract_bearer(authorization)?;
        let claim = self.jwt.validate(token, now)?;
        Ok(AuthenticatedIdentity::from_verified_claim(claim))
    }
}

impl core::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}

fn extract_bearer(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization.ok_or(AuthError::MissingHeader)?;

    // Auth schemes are case-insensitive (RFC 7235).
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
