use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    routing::get,
    Json, Router,
};
use serde_json::Value;

use empdesk_auth::{AccessPolicy, Gate};
use empdesk_core::DomainError;
use empdesk_infra::Document;

use crate::app::dto::{self, InsertResponse, WorkQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::guard;

pub fn router(gate: &Arc<Gate>) -> Router {
    Router::new().route(
        "/work",
        guard(get(list_work), gate, AccessPolicy::authenticated()).post(record_work),
    )
}

pub async fn list_work(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<WorkQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let Query(query) = query?;
    let email = query
        .email
        .ok_or_else(|| DomainError::validation("email is required"))?;
    Ok(Json(services.work_for(&email).await?))
}

pub async fn record_work(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InsertResponse>, ApiError> {
    let Json(body) = body?;
    let entry = dto::into_object(body)?;
    Ok(Json(services.record_work(entry).await?.into()))
}
