//! Axum route handlers for resume intake.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::bank;
use crate::models::profile::Profile;
use crate::models::question::QuestionBank;
use crate::resume::extractor::extract;
use crate::resume::ingest::{read_upload, Upload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractProfileRequest {
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub profile: Profile,
    pub questions: QuestionBank,
}

/// POST /api/v1/resume/profile
///
/// Extracts a profile from resume text the client already has.
pub async fn handle_extract_profile(
    Json(request): Json<ExtractProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text cannot be empty".to_string()));
    }
    Ok(Json(extract(&request.raw_text)))
}

/// POST /api/v1/resume/upload
///
/// Accepts a multipart `file` field (PDF, DOCX, TXT or MD) and returns the
/// extracted profile together with its question bank.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some(Upload { file_name, data });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("missing multipart field 'file'".to_string()))?;
    let text = read_upload(&upload, state.config.max_upload_bytes)?;
    let profile = extract(&text);
    let questions = bank::build(&profile);

    info!(
        "Processed resume {} as {} ({} skills, {} questions)",
        upload.file_name,
        profile.job_title,
        profile.skills.len(),
        questions.question_count()
    );

    Ok(Json(UploadResponse {
        file_name: upload.file_name,
        profile,
        questions,
    }))
}
