use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AuthError;

/// Lifetime of an issued token.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Identity claim carried inside a signed token.
///
/// Only `email` is interpreted. Whatever else the issuing client put into the
/// payload is preserved in `extra` and carries no trust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub email: String,

    /// Issued-at (seconds since the epoch).
    pub iat: i64,

    /// Expiration (seconds since the epoch).
    pub exp: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Check the claim's time window against `now`.
///
/// A token is expired from the second `exp` is reached; no leeway is applied.
/// Signature verification happens before this, in [`crate::Hs256Jwt`].
pub fn validate_claims(claims: &IdentityClaim, now: DateTime<Utc>) -> Result<(), AuthError> {
    if now.timestamp() >= claims.exp {
        return Err(AuthError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claim_expiring_at(exp: DateTime<Utc>) -> IdentityClaim {
        IdentityClaim {
            email: "alice@example.com".to_string(),
            iat: (exp - Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
            exp: exp.timestamp(),
            extra: Map::new(),
        }
    }

    #[test]
    fn valid_before_expiry() {
        let now = Utc::now();
        let claims = claim_expiring_at(now + Duration::minutes(5));
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn expired_at_the_exact_second() {
        let now = Utc::now();
        let claims = claim_expiring_at(now);
        assert_eq!(validate_claims(&claims, now), Err(AuthError::Expired));
    }

    #[test]
    fn extra_payload_fields_round_trip_through_flatten() {
        let json = serde_json::json!({
            "email": "alice@example.com",
            "iat": 1,
            "exp": 2,
            "name": "Alice",
        });
        let claims: IdentityClaim = serde_json::from_value(json).unwrap();
        assert_eq!(claims.extra.get("name"), Some(&Value::from("Alice")));
    }

    #[test]
    fn missing_email_is_rejected() {
        let json = serde_json::json!({ "iat": 1, "exp": 2 });
        assert!(serde_json::from_value::<IdentityClaim>(json).is_err());
    }
}
