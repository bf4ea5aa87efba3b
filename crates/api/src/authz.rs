//! Attaching access policies to routes.

use std::sync::Arc;

use axum::routing::MethodRouter;

use empdesk_auth::{AccessPolicy, Gate};

use crate::middleware::{self, GateState};

/// Wrap every method currently registered on `route` with `policy`.
///
/// Methods chained onto the result afterwards stay public, so one path can
/// mix a gated `GET` with an open `POST`.
pub fn guard<S>(route: MethodRouter<S>, gate: &Arc<Gate>, policy: AccessPolicy) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(axum::middleware::from_fn_with_state(
        GateState {
            gate: gate.clone(),
            policy: Arc::new(policy),
        },
        middleware::gate_middleware,
    ))
}
