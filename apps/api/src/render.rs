//! Enhanced-résumé rendering: splices accepted bullet rewrites back into
//! the experience section and emits a plain-text document.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::document::sections::{classify, ResumeSections};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub original_text: String,
    /// JSON-encoded array of accepted improvements.
    pub improvements: String,
}

/// An improvement the user accepted in the client. Extra fields (reason,
/// impact score) are ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptedImprovement {
    pub original: String,
    pub improved: String,
}

/// POST /api/generate-enhanced-resume
pub async fn handle_generate_enhanced_resume(
    Form(request): Form<EnhanceRequest>,
) -> Result<Response, AppError> {
    info!("Generating enhanced resume");

    let improvements: Vec<AcceptedImprovement> = serde_json::from_str(&request.improvements)
        .map_err(|e| AppError::Validation(format!("Invalid JSON format for improvements: {e}")))?;

    let sections = classify(&request.original_text);
    let (experience, replaced) = apply_improvements(&sections.experience, &improvements);
    if replaced == 0 {
        warn!("No bullet points were replaced");
        return Err(AppError::Validation(
            "No bullet points could be replaced. Ensure improvements match resume content."
                .to_string(),
        ));
    }

    let document = render_document(&sections, &experience);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=enhanced_resume.txt",
            ),
        ],
        document,
    )
        .into_response())
}

/// Strips a leading bullet marker and lowercases, so client-edited and
/// re-extracted lines still compare equal.
fn bullet_key(line: &str) -> String {
    line.trim()
        .trim_start_matches(['•', '-', ' '])
        .trim()
        .to_lowercase()
}

/// Replaces every experience line whose bullet key matches an accepted
/// improvement. Returns the new experience body and the replacement count.
fn apply_improvements(
    experience: &str,
    improvements: &[AcceptedImprovement],
) -> (String, usize) {
    let mut lines: Vec<String> = experience.lines().map(str::to_string).collect();
    let mut replaced = 0;

    for improvement in improvements {
        let target = bullet_key(&improvement.original);
        let improved = improvement.improved.trim();
        if target.is_empty() || improved.is_empty() {
            continue;
        }
        for line in &mut lines {
            if bullet_key(line) == target {
                *line = format!("• {improved}");
                replaced += 1;
            }
        }
    }

    (lines.join("\n"), replaced)
}

fn render_document(sections: &ResumeSections, experience: &str) -> String {
    let rule = "=".repeat(50);
    let sub_rule = "-".repeat(30);

    let mut out = String::new();
    out.push_str(&format!("Enhanced Resume\n{rule}\n"));
    if !sections.summary.is_empty() {
        out.push_str(&format!("Summary\n{sub_rule}\n{}\n\n", sections.summary));
    }
    if !experience.is_empty() {
        out.push_str(&format!("Experience\n{sub_rule}\n{experience}\n\n"));
    }
    if !sections.skills.is_empty() {
        out.push_str(&format!("Skills\n{sub_rule}\n{}\n\n", sections.skills));
    }
    if !sections.education.is_empty() {
        out.push_str(&format!("Education\n{sub_rule}\n{}\n\n", sections.education));
    }
    out.push_str(&format!(
        "{rule}\nGenerated on: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out
}
