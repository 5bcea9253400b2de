use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::{middleware, Router};

use crate::access_log::log_request;
use crate::auth::require_bearer;
use crate::handler;
use crate::state::AppState;

/// Build the axum router.
///
/// Layering, outermost first: access log → bearer gate → handler. The
/// blob routes accept any method so that the gate answers before the
/// method check does.
pub fn build_router(state: AppState) -> Router {
    let blobs = Router::new()
        .route("/upload", any(handler::upload_handler))
        .route("/fetch", any(handler::fetch_handler))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(handler::health_handler))
        .merge(blobs)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
