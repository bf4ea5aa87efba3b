//! Role probes used by the front end to decide which dashboard to show.
//!
//! The `:email` path parameter must be the caller's own address, so these
//! can only answer for the authenticated user.

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Json, Router};

use empdesk_auth::{AccessPolicy, AuthError, AuthenticatedIdentity, Gate, Role};

use crate::app::dto::{AdminStatus, HrStatus};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::guard;

pub fn router(gate: &Arc<Gate>) -> Router {
    let own_email = || AccessPolicy::authenticated().self_access("email");

    Router::new()
        .route("/users/hr/:email", guard(get(hr_status), gate, own_email()))
        .route("/users/admin/:email", guard(get(admin_status), gate, own_email()))
}

pub async fn hr_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<Json<HrStatus>, ApiError> {
    let hr = holds(&services, &identity, &Role::HR).await?;
    Ok(Json(HrStatus { hr }))
}

pub async fn admin_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<Json<AdminStatus>, ApiError> {
    let admin = holds(&services, &identity, &Role::ADMIN).await?;
    Ok(Json(AdminStatus { admin }))
}

async fn holds(services: &AppServices, identity: &AuthenticatedIdentity, role: &Role) -> Result<bool, ApiError> {
    services
        .gate
        .resolver()
        .holds(identity, role)
        .await
        .map_err(|e| ApiError::Auth(AuthError::from(e)))
}
