use std::sync::Arc;

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::panels::Panels;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisClient,
    /// Per-panel state machines. In memory only; lost on restart.
    pub panels: Arc<Panels>,
    pub config: Config,
}
