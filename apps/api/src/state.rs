use std::sync::Arc;

use crate::assistant::Assistant;
use crate::config::{AnalysisSettings, Config};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Validated at startup; every session starts from these.
    pub settings: AnalysisSettings,
    /// Pluggable model backend. Default: `OllamaAssistant`.
    pub assistant: Arc<dyn Assistant>,
    pub sessions: SessionStore,
}
