use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Assembles the HTTP surface over the shared application state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route("/api/commands", post(handlers::create_command))
        .route("/api/commands/{id}", get(handlers::get_command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
