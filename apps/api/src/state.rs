use std::sync::Arc;

use crate::export::orchestrator::ExportPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The export pipeline: template renderer + governed render engine.
    /// Immutable after startup; the engine's surface pool is the only shared
    /// mutable state inside it.
    pub pipeline: Arc<ExportPipeline>,
}
