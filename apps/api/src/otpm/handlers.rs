//! Axum route handlers for normalization and OTPM scoring.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::batch::{score_postings, BatchReport};
use crate::errors::AppError;
use crate::models::{NormalizedJob, NormalizedResume, RawJobPosting, ResumeOverrides};
use crate::normalization::text_extract::{decode_utf8_ignoring_errors, extract_pdf_text_from_mem};
use crate::otpm::engine::{breakdown, ScoreBreakdown, ScoreResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NormalizeResumeRequest {
    pub text: String,
    #[serde(default)]
    pub overrides: Option<ResumeOverrides>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub job: NormalizedJob,
    pub resume: NormalizedResume,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: ScoreResult,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub postings: Vec<RawJobPosting>,
    #[serde(default)]
    pub resume: Option<NormalizedResume>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/normalize
pub async fn handle_normalize_job(
    State(state): State<AppState>,
    Json(posting): Json<RawJobPosting>,
) -> Json<NormalizedJob> {
    Json(state.job_parser.parse(&posting))
}

/// POST /api/v1/resumes/normalize
pub async fn handle_normalize_resume(
    State(state): State<AppState>,
    Json(request): Json<NormalizeResumeRequest>,
) -> Result<Json<NormalizedResume>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let resume = state
        .resume_parser
        .parse_text(&request.text, request.overrides.as_ref())?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/upload
///
/// Multipart: `file` (PDF or text) plus optional `years_of_experience`,
/// `visa_status` and `role` fields. A PDF that cannot be read yields an empty
/// résumé rather than an error.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<NormalizedResume>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut overrides = ResumeOverrides::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, data));
            }
            "years_of_experience" | "visa_status" | "role" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                match name.as_str() {
                    "years_of_experience" => overrides.years_of_experience = Some(value),
                    "visa_status" => overrides.visa_status = Some(value),
                    _ => overrides.role = Some(value),
                }
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    info!("Resume upload: {} ({} bytes)", file_name, data.len());

    let text = upload_to_text(file_name, data).await?;
    let overrides = (!overrides.is_empty()).then_some(overrides);
    let resume = state.resume_parser.parse_text(&text, overrides.as_ref())?;
    Ok(Json(resume))
}

/// POST /api/v1/otpm/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    Json(ScoreResponse {
        score: state.scorer.score(&request.job, &request.resume),
        breakdown: breakdown(&request.job, &request.resume),
    })
}

/// POST /api/v1/otpm/batch
///
/// Normalizes and scores postings the caller already scraped.
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchScoreRequest>,
) -> Json<BatchReport> {
    let report = score_postings(
        Uuid::new_v4(),
        request.postings,
        request.resume.as_ref(),
        state.scorer.as_ref(),
    );
    Json(report)
}

/// PDF parsing is CPU-bound, so it runs on the blocking pool.
async fn upload_to_text(file_name: String, data: Bytes) -> Result<String, AppError> {
    if file_name.to_lowercase().ends_with(".pdf") {
        tokio::task::spawn_blocking(move || extract_pdf_text_from_mem(&data, &file_name))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in PDF extraction: {e}"
                ))
            })
    } else {
        Ok(decode_utf8_ignoring_errors(&data))
    }
}
