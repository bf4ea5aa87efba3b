use std::sync::Arc;

use axum::{extract::Extension, routing::get, Json, Router};

use empdesk_infra::{collections, Document};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/service", get(list_services))
        .route("/review", get(list_reviews))
}

pub async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(services.list(collections::SERVICES).await?))
}

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(services.list(collections::REVIEWS).await?))
}
