use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use bucket_gate::{AccessDecision, AuthError};

use crate::error::ServerResult;
use crate::state::AppState;

/// Gate middleware: runs the [`AccessGate`](bucket_gate::AccessGate) on the
/// `Authorization` header and only calls the inner handler on admission.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ServerResult<Response> {
    let decision = match request.headers().get(AUTHORIZATION) {
        None => state.gate.authorize(None),
        Some(value) => match value.to_str() {
            Ok(text) => state.gate.authorize(Some(text)),
            Err(_) => AccessDecision::Reject(AuthError::Malformed),
        },
    };
    decision.into_result()?;
    Ok(next.run(request).await)
}
