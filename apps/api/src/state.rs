use std::sync::Arc;

use crate::config::Config;
use crate::tailoring::TailorModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: the Anthropic `LlmClient`.
    pub model: Arc<dyn TailorModel>,
    pub config: Config,
}
