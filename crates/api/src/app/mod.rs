//! HTTP application wiring (Axum router + shared services).
//!
//! - `services.rs`: store, token codec, and gate construction
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: request/response shapes
//! - `errors.rs`: error to response mapping

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    routes::router(&services.gate)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
