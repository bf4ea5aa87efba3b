//! Error to response mapping.
//!
//! Every error leaves the API as `{"message": ...}`. Gate failures collapse
//! to two uniform bodies so callers cannot tell which check rejected them;
//! the specific reason only goes to the log.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use empdesk_auth::{AuthError, AuthErrorKind, TokenError};
use empdesk_core::DomainError;
use empdesk_infra::{DirectoryError, StoreError};

pub const UNAUTHORIZED: &str = "unauthorized access";
pub const FORBIDDEN: &str = "forbidden";
pub const INTERNAL: &str = "internal server error";
pub const INVALID_ID: &str = "invalid id";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => match err.kind() {
                AuthErrorKind::Unauthenticated => {
                    tracing::debug!(stage = ?err.stage(), reason = %err, "request denied");
                    json_error(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
                }
                AuthErrorKind::Forbidden => {
                    tracing::debug!(stage = ?err.stage(), reason = %err, "request denied");
                    json_error(StatusCode::FORBIDDEN, FORBIDDEN)
                }
                AuthErrorKind::LookupFailure => {
                    tracing::error!(stage = ?err.stage(), error = %err, "user lookup failed");
                    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
                }
            },
            ApiError::Domain(DomainError::InvalidId(_)) => json_error(StatusCode::BAD_REQUEST, INVALID_ID),
            ApiError::Domain(DomainError::Validation(msg)) => json_error(StatusCode::BAD_REQUEST, msg),
            ApiError::Store(err) | ApiError::Directory(DirectoryError::Store(err)) => {
                tracing::error!(error = %err, "document store failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
            ApiError::Directory(err @ DirectoryError::DuplicateEmail(_)) => {
                json_error(StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Token(err) => {
                tracing::error!(error = %err, "token issuance failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
            ApiError::Json(rejection) => json_error(rejection.status(), rejection.body_text()),
            ApiError::Query(rejection) => json_error(rejection.status(), rejection.body_text()),
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use empdesk_auth::{LookupError, Role};

    fn status(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn gate_failures_map_to_two_statuses() {
        for err in [AuthError::MissingHeader, AuthError::MalformedHeader, AuthError::Expired] {
            assert_eq!(status(err), StatusCode::UNAUTHORIZED);
        }
        for err in [
            AuthError::UnknownUser,
            AuthError::Unverified,
            AuthError::Fired,
            AuthError::RoleMismatch { required: Role::ADMIN },
            AuthError::SelfAccessMismatch { param: "email".into() },
        ] {
            assert_eq!(status(err), StatusCode::FORBIDDEN);
        }
        assert_eq!(
            status(AuthError::Lookup(LookupError::new("down"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_are_bad_requests() {
        assert_eq!(status(DomainError::invalid_id("nope")), StatusCode::BAD_REQUEST);
        assert_eq!(status(DomainError::validation("email is required")), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_registration_is_a_bad_request() {
        assert_eq!(
            status(DirectoryError::DuplicateEmail("a@example.com".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(DirectoryError::Store(StoreError::Poisoned)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
