use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::app::dto::{self, TokenResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/jwt", post(issue_token))
}

/// Sign the posted claims. `iat`/`exp` are always set here; the caller
/// cannot choose the token lifetime.
pub async fn issue_token(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = body?;
    let token = services.issue_token(dto::into_object(body)?)?;
    Ok(Json(TokenResponse { token }))
}
