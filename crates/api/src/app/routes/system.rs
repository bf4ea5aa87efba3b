use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::app::errors::json_error;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

pub async fn index() -> &'static str {
    "management is working"
}

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}
