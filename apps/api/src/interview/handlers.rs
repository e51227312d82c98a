//! Axum route handlers for question banks and coaching sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::bank;
use crate::interview::script::{Script, ScriptKind};
use crate::interview::session::{Session, SessionSnapshot};
use crate::models::profile::Profile;
use crate::models::question::QuestionBank;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BuildQuestionsRequest {
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub profile: Profile,
    #[serde(default)]
    pub script: ScriptKind,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/questions
pub async fn handle_build_questions(
    Json(request): Json<BuildQuestionsRequest>,
) -> Result<Json<QuestionBank>, AppError> {
    validate_profile(&request.profile)?;
    Ok(Json(bank::build(&request.profile)))
}

/// POST /api/v1/sessions
///
/// Starts a coaching session. The transcript opens with the welcome message.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    validate_profile(&request.profile)?;

    let questions = bank::build(&request.profile);
    let script = Script::for_kind(request.script, &request.profile, &questions);
    let session = Session::start(
        script,
        state.config.evaluation_mode,
        state.config.reply_delay,
        state.speech.clone(),
    );
    let session = state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(session.snapshot().await)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(session.snapshot().await))
}

/// POST /api/v1/sessions/:id/messages
///
/// Returns the completed turn, or 204 when the text is blank (nothing recorded).
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    match session.submit(request.text).await? {
        Some(turn) => Ok(Json(turn).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /api/v1/sessions/:id/speech/stop
pub async fn handle_stop_speech(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    session.stop_speech();
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

fn validate_profile(profile: &Profile) -> Result<(), AppError> {
    if profile.job_title.trim().is_empty() {
        return Err(AppError::Validation("profile.job_title cannot be empty".to_string()));
    }
    if profile.skills.is_empty() {
        return Err(AppError::Validation("profile.skills cannot be empty".to_string()));
    }
    if profile.skills.iter().any(|skill| skill.trim().is_empty()) {
        return Err(AppError::Validation(
            "profile.skills cannot contain blank entries".to_string(),
        ));
    }
    Ok(())
}
