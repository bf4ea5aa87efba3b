use std::sync::Arc;

use axum::Router;

use empdesk_auth::Gate;

pub mod catalog;
pub mod employees;
pub mod system;
pub mod tokens;
pub mod users;
pub mod work;

/// Every endpoint. Gated routes carry their access policy on the route itself.
pub fn router(gate: &Arc<Gate>) -> Router {
    Router::new()
        .merge(system::router())
        .merge(tokens::router())
        .merge(catalog::router())
        .merge(employees::router(gate))
        .merge(users::router(gate))
        .merge(work::router(gate))
}
