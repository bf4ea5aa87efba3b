use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use empdesk_auth::{AccessPolicy, Gate};

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<Gate>,
    pub policy: Arc<AccessPolicy>,
}

/// Run the route's [`AccessPolicy`] before the handler.
///
/// On success the [`empdesk_auth::AuthenticatedIdentity`] is placed in the
/// request extensions; on failure the handler never runs.
pub async fn gate_middleware(State(state): State<GateState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    // A header that is not visible ASCII cannot carry a bearer token.
    let authorization = parts
        .headers
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default().to_owned());

    let path_params = if state.policy.self_access_param().is_some() {
        Path::<HashMap<String, String>>::from_request_parts(&mut parts, &())
            .await
            .map(|Path(params)| params)
            .unwrap_or_default()
    } else {
        HashMap::new()
    };

    let identity = match state
        .gate
        .authorize(&state.policy, authorization.as_deref(), &path_params, Utc::now())
        .await
    {
        Ok(identity) => identity,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(identity);
    next.run(req).await
}
