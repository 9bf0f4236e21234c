pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{Method, Uri},
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::handlers;

async fn not_found(method: Method, uri: Uri) -> AppError {
    tracing::warn!("404 Not Found: {method} {}", uri.path());
    AppError::NotFound(format!("{method} {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        .route("/api/v1/tailor/json", post(handlers::handle_tailor_json))
        .fallback(not_found)
        .layer(body_limit)
        .with_state(state)
}
