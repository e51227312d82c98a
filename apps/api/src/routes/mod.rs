pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Headroom for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume intake
        .route("/api/v1/resume/profile", post(resume::handle_extract_profile))
        .route("/api/v1/resume/upload", post(resume::handle_upload))
        .route("/api/v1/questions", post(interview::handle_build_questions))
        // Coaching sessions
        .route("/api/v1/sessions", post(interview::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(interview::handle_get_session).delete(interview::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(interview::handle_submit),
        )
        .route(
            "/api/v1/sessions/:id/speech/stop",
            post(interview::handle_stop_speech),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
