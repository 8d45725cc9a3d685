use std::sync::Arc;

use crate::analysis::gateway::AnalysisBackend;
use crate::analysis::models::AnalysisReport;
use crate::document::handlers::UploadResult;
use crate::tasks::TaskStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Gateway to the generative service. Always answers — degraded
    /// responses come from the deterministic fallback synthesizer.
    pub gateway: Arc<dyn AnalysisBackend>,
    /// Transient upload bookkeeping; entries are consumed on the first
    /// terminal poll.
    pub uploads: TaskStore<UploadResult>,
    /// Transient analysis bookkeeping, same take-once contract.
    pub analyses: TaskStore<AnalysisReport>,
}
