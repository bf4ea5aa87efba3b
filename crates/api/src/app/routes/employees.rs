use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;

use empdesk_auth::{AccessPolicy, Gate, Role};
use empdesk_infra::Document;

use crate::app::dto::{self, InsertResponse, UpdateResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::guard;

pub fn router(gate: &Arc<Gate>) -> Router {
    Router::new()
        .route(
            "/employees",
            guard(get(list_employees), gate, AccessPolicy::authenticated()).post(register_employee),
        )
        .route(
            "/employees/:id",
            guard(patch(verify_employee), gate, AccessPolicy::authenticated().role(Role::HR)),
        )
        .route(
            "/employees/hr/:id",
            guard(patch(promote_to_hr), gate, AccessPolicy::authenticated().role(Role::ADMIN)),
        )
        .route(
            "/employees/fire/:id",
            guard(patch(fire_employee), gate, AccessPolicy::authenticated().role(Role::ADMIN)),
        )
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(services.employees.list().await?))
}

pub async fn register_employee(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InsertResponse>, ApiError> {
    let Json(body) = body?;
    let profile = dto::into_object(body)?;
    dto::require_field(&profile, "email")?;

    let inserted = services.employees.register(profile).await?;
    tracing::info!(id = %inserted.inserted_id, "employee registered");
    Ok(Json(inserted.into()))
}

pub async fn verify_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let id = dto::parse_id(&id)?;
    Ok(Json(services.employees.mark_verified(id).await?.into()))
}

pub async fn promote_to_hr(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let id = dto::parse_id(&id)?;
    Ok(Json(services.employees.promote_to_hr(id).await?.into()))
}

pub async fn fire_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let id = dto::parse_id(&id)?;
    Ok(Json(services.employees.fire(id).await?.into()))
}
