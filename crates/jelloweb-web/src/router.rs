//! Axum router — maps all URL paths to handlers.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::handlers::{
    home::{home_page, home_submit},
    jc::{jc_page, jc_submit},
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_input_bytes;
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",   get(home_page).post(home_submit))
        .route("/jc", get(jc_page).post(jc_submit))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(shared)
}
