use std::sync::Arc;

use crate::config::Config;
use crate::interview::session::SessionStore;
use crate::interview::speech::SpeechSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Pluggable speech backend. Default: LogSpeech. Swap via SPEECH_WEBHOOK_URL.
    pub speech: Arc<dyn SpeechSink>,
}
