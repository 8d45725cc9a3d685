use std::time::Duration;

use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::analysis::gateway::{AnalysisBackend, TaskKind};
use crate::analysis::models::AnalysisReport;
use crate::analysis::parser::{parse_improvements, parse_keywords};
use crate::analysis::prompts::{bullet_prompt, keyword_prompt};
use crate::analysis::scoring::score;
use crate::document::sections::classify;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tasks::{TaskAccepted, TaskStatus};

/// Wall-clock budget for the synchronous analyze pipeline. The per-call
/// gateway timeouts only bound individual hops, not the whole request.
const ANALYSIS_BUDGET: Duration = Duration::from_secs(10);
const MAX_RESUME_CHARS: usize = 10_000;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

fn validate(request: &AnalyzeRequest) -> Result<(), AppError> {
    if request.resume_text.trim().is_empty() {
        error!("Resume text is empty");
        return Err(AppError::Validation(
            "Resume text cannot be empty".to_string(),
        ));
    }
    if request.job_description.trim().is_empty() {
        error!("Job description is empty");
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }
    let resume_chars = request.resume_text.chars().count();
    if resume_chars > MAX_RESUME_CHARS {
        error!("Resume text too long: {resume_chars} chars");
        return Err(AppError::Validation(
            "Resume text exceeds 10000 characters".to_string(),
        ));
    }
    Ok(())
}

/// Runs the full pipeline. The keyword and bullet gateway calls are
/// independent, so they run concurrently; scoring needs the parsed
/// keywords and follows them.
async fn perform_analysis(
    state: &AppState,
    resume_text: &str,
    job_description: &str,
) -> AnalysisReport {
    let sections = classify(resume_text);

    let keyword_task = async {
        let prompt = keyword_prompt(job_description, resume_text);
        let response = state.gateway.analyze(&prompt, TaskKind::Keywords).await;
        parse_keywords(&response)
    };
    let bullet_task = async {
        let prompt = bullet_prompt(&sections.experience, job_description);
        let response = state.gateway.analyze(&prompt, TaskKind::Bullets).await;
        parse_improvements(&response)
    };
    let (keywords, improved_bullets) = tokio::join!(keyword_task, bullet_task);

    let match_result = score(resume_text, &keywords, job_description);

    AnalysisReport {
        match_score: match_result.overall_score,
        missing_keywords: keywords,
        improved_bullets,
        suggestions: match_result.recommendations,
    }
}

/// POST /api/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    validate(&request)?;

    let analysis = perform_analysis(&state, &request.resume_text, &request.job_description);
    match tokio::time::timeout(ANALYSIS_BUDGET, analysis).await {
        Ok(report) => Ok(Json(report)),
        Err(_) => {
            error!("Analysis timed out");
            Err(AppError::Timeout(
                "Analysis timed out. Try the async endpoint.".to_string(),
            ))
        }
    }
}

/// POST /api/analyze-resume-async
pub async fn handle_analyze_resume_async(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Result<Json<TaskAccepted>, AppError> {
    validate(&request)?;

    let task_id = state.analyses.create();
    let task_state = state.clone();
    tokio::spawn(async move {
        let report = perform_analysis(
            &task_state,
            &request.resume_text,
            &request.job_description,
        )
        .await;
        task_state.analyses.complete(task_id, report);
    });

    Ok(Json(TaskAccepted::processing(task_id)))
}

/// GET /api/analysis-status/:task_id
///
/// Terminal results are consumed by this read.
pub async fn handle_analysis_status(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskStatus<AnalysisReport>>, AppError> {
    state
        .analyses
        .poll(task_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Task {task_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::gateway::AnalysisGateway;
    use crate::tasks::TaskStore;
    use std::sync::Arc;

    fn offline_state() -> AppState {
        // Unroutable service URL: every gateway call degrades to the
        // deterministic fallback path.
        AppState {
            gateway: Arc::new(AnalysisGateway::new("http://127.0.0.1:9".to_string())),
            uploads: TaskStore::new(),
            analyses: TaskStore::new(),
        }
    }

    fn request(resume: &str, job: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            resume_text: resume.to_string(),
            job_description: job.to_string(),
        }
    }

    #[test]
    fn test_validation_rejects_empty_fields() {
        assert!(validate(&request("", "job")).is_err());
        assert!(validate(&request("resume", "   ")).is_err());
        assert!(validate(&request("resume", "job")).is_ok());
    }

    #[test]
    fn test_validation_rejects_over_long_resume() {
        let long = "a".repeat(MAX_RESUME_CHARS + 1);
        assert!(validate(&request(&long, "job")).is_err());
    }

    #[tokio::test]
    async fn test_offline_pipeline_reports_missing_keywords() {
        let state = offline_state();
        // Repeated emphasis on Python pushes its fallback importance to
        // high; neither term appears in the résumé.
        let job = "Python Python Python and AWS";
        let resume = "Seasoned Java engineer";

        let report = perform_analysis(&state, resume, job).await;

        let terms: Vec<&str> = report
            .missing_keywords
            .iter()
            .map(|k| k.keyword.as_str())
            .collect();
        assert!(terms.contains(&"python"));
        assert!(terms.contains(&"aws"));

        let match_result = score(resume, &report.missing_keywords, job);
        assert!(match_result.keyword_score < 85);
        assert_eq!(report.suggestions.len(), 2);
    }

    #[tokio::test]
    async fn test_offline_pipeline_always_yields_bullet_records() {
        let state = offline_state();
        let report = perform_analysis(&state, "EXPERIENCE\n- Wrote code", "Ship Rust software").await;

        assert!(!report.improved_bullets.is_empty());
        for bullet in &report.improved_bullets {
            assert!(!bullet.original.is_empty());
            assert!(!bullet.improved.is_empty());
            assert!(bullet.impact_score <= 10);
        }
    }
}
