//! HS256 token issuance and validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{validate_claims, AuthError, IdentityClaim, TOKEN_LIFETIME_SECS};

/// Verifies a raw token string and yields its identity claim.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, AuthError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Symmetric (HS256) token service.
///
/// The same secret signs and verifies, so issuance and validation must be
/// built from one configuration value.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Jwt {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign an arbitrary JSON object, stamping `iat` and a one-hour `exp`.
    ///
    /// Caller-supplied `iat`/`exp` are overwritten.
    pub fn issue(&self, mut payload: Map<String, Value>, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        payload.insert("iat".to_string(), Value::from(iat));
        payload.insert("exp".to_string(), Value::from(iat + TOKEN_LIFETIME_SECS));

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt").finish_non_exhaustive()
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, AuthError> {
        let data = jsonwebtoken::decode::<IdentityClaim>(token, &self.decoding, &self.validation)
            .map_err(|e| AuthError::InvalidToken(format!("{:?}", e.kind())))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
