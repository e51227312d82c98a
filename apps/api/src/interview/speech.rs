//! Speech collaborator: vocalizes coach utterances outside the dialogue.
//!
//! Each session owns one worker task fed through a channel. The worker keeps at
//! most one utterance audible: before starting a new one it aborts the in-flight
//! speak call and asks the sink to stop. Sink failures are recorded as advisory
//! notices and never reach the dialogue state.
//!
//! Backends implement `SpeechSink`. `AppState` holds an `Arc<dyn SpeechSink>`,
//! chosen at startup from `SPEECH_WEBHOOK_URL`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech endpoint returned status {0}")]
    Status(u16),

    #[error("speech unavailable: {0}")]
    Unavailable(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Plays `text`; resolves when playback has finished.
    async fn speak(&self, session_id: Uuid, text: &str) -> Result<(), SpeechError>;

    /// Silences whatever is playing for the session.
    async fn stop(&self, session_id: Uuid) -> Result<(), SpeechError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

/// Default sink when no speech endpoint is configured: utterances go to the log.
pub struct LogSpeech;

#[async_trait]
impl SpeechSink for LogSpeech {
    async fn speak(&self, session_id: Uuid, text: &str) -> Result<(), SpeechError> {
        info!(%session_id, "coach says: {text}");
        Ok(())
    }

    async fn stop(&self, _session_id: Uuid) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Forwards utterances to an external text-to-speech service.
///
/// `speak` posts `{"session_id", "text"}`; `stop` posts `{"session_id", "action": "stop"}`.
pub struct WebhookSpeech {
    client: Client,
    url: String,
}

impl WebhookSpeech {
    pub fn new(url: impl Into<String>) -> Self {
        WebhookSpeech {
            client: Client::new(),
            url: url.into(),
        }
    }

    async fn post(&self, body: serde_json::Value) -> Result<(), SpeechError> {
        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechSink for WebhookSpeech {
    async fn speak(&self, session_id: Uuid, text: &str) -> Result<(), SpeechError> {
        self.post(json!({ "session_id": session_id, "text": text }))
            .await
    }

    async fn stop(&self, session_id: Uuid) -> Result<(), SpeechError> {
        self.post(json!({ "session_id": session_id, "action": "stop" }))
            .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-session worker
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SpeechStatus {
    Idle,
    /// `utterance` counts speak requests within the session, starting at 1.
    Speaking { utterance: u64 },
}

/// A non-fatal problem surfaced to the user alongside the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
enum SpeechCommand {
    Speak(String),
    Stop,
}

/// Sending side of a session's speech worker. Dropping it ends the worker.
pub struct SpeechHandle {
    commands: mpsc::UnboundedSender<SpeechCommand>,
    status: watch::Receiver<SpeechStatus>,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl SpeechHandle {
    /// Queues `text` for playback. Never blocks and never fails the caller.
    pub fn say(&self, text: impl Into<String>) {
        if self.commands.send(SpeechCommand::Speak(text.into())).is_err() {
            warn!("Speech worker has shut down; utterance dropped");
        }
    }

    pub fn stop(&self) {
        if self.commands.send(SpeechCommand::Stop).is_err() {
            warn!("Speech worker has shut down; stop ignored");
        }
    }

    pub fn status(&self) -> SpeechStatus {
        *self.status.borrow()
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.notices.lock().await.clone()
    }
}

/// Notices kept per session; older ones are dropped first.
const MAX_NOTICES: usize = 20;

async fn record_notice(notices: &Mutex<Vec<Notice>>, message: String) {
    warn!("{message}");
    let mut notices = notices.lock().await;
    if notices.len() >= MAX_NOTICES {
        let excess = notices.len() + 1 - MAX_NOTICES;
        notices.drain(..excess);
    }
    notices.push(Notice {
        message,
        at: Utc::now(),
    });
}

/// Spawns the speech worker for one session.
pub fn spawn_speech_worker(session_id: Uuid, sink: Arc<dyn SpeechSink>) -> SpeechHandle {
    let (commands, mut rx) = mpsc::unbounded_channel();
    let (status_tx, status) = watch::channel(SpeechStatus::Idle);
    let status_tx = Arc::new(status_tx);
    let notices = Arc::new(Mutex::new(Vec::new()));

    let worker_notices = Arc::clone(&notices);
    tokio::spawn(async move {
        let mut in_flight: Option<JoinHandle<()>> = None;
        let mut utterance = 0_u64;

        while let Some(command) = rx.recv().await {
            let interrupted = match in_flight.take() {
                Some(handle) if !handle.is_finished() => {
                    handle.abort();
                    true
                }
                _ => false,
            };
            if interrupted || matches!(command, SpeechCommand::Stop) {
                if let Err(e) = sink.stop(session_id).await {
                    record_notice(&worker_notices, format!("Could not stop speech: {e}")).await;
                }
                status_tx.send_replace(SpeechStatus::Idle);
            }

            let SpeechCommand::Speak(text) = command else {
                debug!(%session_id, "speech stopped on request");
                continue;
            };

            utterance += 1;
            let current = SpeechStatus::Speaking { utterance };
            status_tx.send_replace(current);

            let sink = Arc::clone(&sink);
            let status_tx = Arc::clone(&status_tx);
            let notices = Arc::clone(&worker_notices);
            in_flight = Some(tokio::spawn(async move {
                if let Err(e) = sink.speak(session_id, &text).await {
                    record_notice(&notices, format!("Speech unavailable: {e}")).await;
                }
                // A newer utterance may already own the status.
                status_tx.send_if_modified(|s| {
                    if *s == current {
                        *s = SpeechStatus::Idle;
                        true
                    } else {
                        false
                    }
                });
            }));
        }

        if let Some(handle) = in_flight.take() {
            if !handle.is_finished() {
                handle.abort();
                if let Err(e) = sink.stop(session_id).await {
                    warn!(%session_id, "Could not stop speech on shutdown: {e}");
                }
            }
        }
        debug!(%session_id, "speech worker finished");
    });

    SpeechHandle {
        commands,
        status,
        notices,
    }
}
