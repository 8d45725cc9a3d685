use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::document::extract::{extract_text, DocumentKind};
use crate::document::normalize::normalize_lines;
use crate::document::sections::{classify, ResumeSections};
use crate::errors::AppError;
use crate::state::AppState;
use crate::tasks::{TaskAccepted, TaskStatus};

/// Uploads above this size are rejected before any decoding happens.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Decoded résumés above this length are rejected.
pub const MAX_RESUME_CHARS: usize = 10_000;

/// Outcome of a successful upload task: decoded text plus its sections.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub filename: String,
    pub text: String,
    pub sections: ResumeSections,
}

/// POST /api/upload-resume
///
/// Accepts a multipart `file` field, validates shape and size, then
/// decodes and classifies in the background. Returns a task handle.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TaskAccepted>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(str::to_owned)
                .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
            let content = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((filename, content));
            break;
        }
    }
    let (filename, content) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    info!("Received upload request for file: {filename}");

    let kind = DocumentKind::from_filename(&filename).ok_or_else(|| {
        error!("Unsupported file type: {filename}");
        AppError::Validation("Only PDF and plain-text (.txt) resumes are supported".to_string())
    })?;

    if content.len() > MAX_UPLOAD_BYTES {
        error!("File too large: {} bytes", content.len());
        return Err(AppError::Validation(
            "File size exceeds 5MB limit".to_string(),
        ));
    }

    let task_id = state.uploads.create();
    let uploads = state.uploads.clone();
    tokio::spawn(async move {
        // PDF decoding is CPU-bound; keep it off the async workers.
        let outcome =
            tokio::task::spawn_blocking(move || process_upload(kind, &filename, &content)).await;
        match outcome {
            Ok(Ok(result)) => uploads.complete(task_id, result),
            Ok(Err(e)) => {
                error!("Upload processing error: {e}");
                uploads.fail(task_id, e.to_string());
            }
            Err(e) => {
                error!("Upload task panicked: {e}");
                uploads.fail(task_id, "Internal error while processing upload");
            }
        }
    });

    Ok(Json(TaskAccepted::processing(task_id)))
}

fn process_upload(
    kind: DocumentKind,
    filename: &str,
    content: &Bytes,
) -> Result<UploadResult, AppError> {
    let raw = extract_text(kind, content)?;

    if raw.chars().count() > MAX_RESUME_CHARS {
        error!("Extracted text too long: {} chars", raw.chars().count());
        return Err(AppError::Validation(
            "Resume text exceeds 10000 characters".to_string(),
        ));
    }

    let text = normalize_lines(&raw);
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from the uploaded file".to_string(),
        ));
    }

    let sections = classify(&text);
    Ok(UploadResult {
        filename: filename.to_string(),
        text,
        sections,
    })
}

/// GET /api/upload-status/:task_id
///
/// Terminal results are consumed by this read.
pub async fn handle_upload_status(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskStatus<UploadResult>>, AppError> {
    state
        .uploads
        .poll(task_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Task {task_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_upload_classifies_sections() {
        let content = Bytes::from_static(b"Jane Doe\nEXPERIENCE\n- Built APIs\nSKILLS\nRust");
        let result = process_upload(DocumentKind::Text, "resume.txt", &content).unwrap();
        assert_eq!(result.filename, "resume.txt");
        assert_eq!(result.sections.summary, "Jane Doe");
        assert_eq!(result.sections.experience, "- Built APIs");
        assert_eq!(result.sections.skills, "Rust");
    }

    #[test]
    fn test_process_upload_normalizes_terminology() {
        let content = Bytes::from_static(b"SKILLS\nReactJS and NodeJS");
        let result = process_upload(DocumentKind::Text, "resume.txt", &content).unwrap();
        assert_eq!(result.sections.skills, "React and Node.js");
    }

    #[test]
    fn test_process_upload_rejects_over_long_text() {
        let content = Bytes::from(vec![b'a'; MAX_RESUME_CHARS + 1]);
        let err = process_upload(DocumentKind::Text, "resume.txt", &content).unwrap_err();
        assert!(err.to_string().contains("10000"));
    }
}
