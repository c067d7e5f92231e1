//! HTTP router setup.

use crate::handlers;
use crate::middleware::inject_request_id;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the application router. CORS is permissive: browser dapps call
/// the relay directly.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/relay", post(handlers::relay))
        .route("/nonce/{address}", get(handlers::nonce))
        .layer(axum::middleware::from_fn(inject_request_id))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
