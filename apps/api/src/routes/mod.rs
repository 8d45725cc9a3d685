pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::document::handlers as document;
use crate::render;
use crate::state::AppState;

/// Headroom over the 5 MiB upload cap so the handler can reject oversize
/// files with a descriptive error instead of a bare 413.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/upload-resume", post(document::handle_upload_resume))
        .route(
            "/api/upload-status/:task_id",
            get(document::handle_upload_status),
        )
        .route("/api/analyze-resume", post(analysis::handle_analyze_resume))
        .route(
            "/api/analyze-resume-async",
            post(analysis::handle_analyze_resume_async),
        )
        .route(
            "/api/analysis-status/:task_id",
            get(analysis::handle_analysis_status),
        )
        .route(
            "/api/generate-enhanced-resume",
            post(render::handle_generate_enhanced_resume),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
