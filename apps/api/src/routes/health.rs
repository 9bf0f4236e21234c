use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "tailor-api",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "apiKeyConfigured": !state.config.anthropic_api_key.is_empty()
    }))
}
