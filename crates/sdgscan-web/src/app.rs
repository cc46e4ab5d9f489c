use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes());

    Router::new()
        .route("/", get(handlers::index::index))
        .route(
            "/extract-abstract",
            post(handlers::extract::extract_abstract),
        )
        .route(
            "/forminator-webhook",
            post(handlers::webhook::forminator_webhook),
        )
        .route("/report", post(handlers::report::report))
        .route("/admin", get(handlers::admin::admin))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
