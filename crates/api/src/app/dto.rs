//! Request/response DTOs and JSON mapping helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use empdesk_core::{DocumentId, DomainError};
use empdesk_infra::{InsertResult, UpdateResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl From<InsertResult> for InsertResponse {
    fn from(r: InsertResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: r.inserted_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdateResponse {
    fn from(r: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: r.matched_count,
            modified_count: r.modified_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct HrStatus {
    pub hr: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct WorkQuery {
    pub email: Option<String>,
}

/// Require a JSON object body.
pub fn into_object(value: Value) -> Result<Map<String, Value>, DomainError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation("request body must be a JSON object")),
    }
}

/// Require `field` to be present and non-null.
pub fn require_field(body: &Map<String, Value>, field: &str) -> Result<(), DomainError> {
    match body.get(field) {
        Some(Value::Null) | None => Err(DomainError::validation(format!("{field} is required"))),
        Some(_) => Ok(()),
    }
}

pub fn parse_id(raw: &str) -> Result<DocumentId, DomainError> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_response_uses_driver_field_names() {
        let body = serde_json::to_value(UpdateResponse::from(UpdateResult {
            matched_count: 1,
            modified_count: 0,
        }))
        .unwrap();
        assert_eq!(body, json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 0 }));
    }

    #[test]
    fn objects_only() {
        assert!(into_object(json!([1, 2])).is_err());
        assert!(into_object(json!({ "a": 1 })).is_ok());
    }

    #[test]
    fn required_field_must_be_non_null() {
        let body = into_object(json!({ "email": null, "name": "x" })).unwrap();
        assert!(require_field(&body, "email").is_err());
        assert!(require_field(&body, "name").is_ok());
        assert!(require_field(&body, "missing").is_err());
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(matches!(parse_id("not-an-id"), Err(DomainError::InvalidId(_))));
        assert!(parse_id(&DocumentId::new().to_string()).is_ok());
    }
}
