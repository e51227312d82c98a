//! Coaching sessions: one dialogue engine per session, serialized turns, and a
//! deferred coach reply.
//!
//! A turn holds the session's turn lock from the moment the user's message is
//! recorded until the coach reply is appended. A second submission waits on the
//! lock (FIFO), so transcript order and message ids are never interleaved. The
//! engine itself sits behind a separate short-lived lock so snapshots can be
//! read while the coach is "thinking".

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::engine::{CoachTurn, DialogueEngine, EvaluationMode};
use crate::interview::script::Script;
use crate::interview::speech::{spawn_speech_worker, Notice, SpeechHandle, SpeechSink, SpeechStatus};
use crate::models::message::Message;

pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    engine: Mutex<DialogueEngine>,
    turn_lock: Mutex<()>,
    reply_delay: Duration,
    speech: SpeechHandle,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub current_question_index: usize,
    pub question_count: usize,
    pub transcript: Vec<Message>,
    pub speech_status: SpeechStatus,
    pub notices: Vec<Notice>,
}

impl Session {
    /// Starts the engine and speaks the welcome message.
    pub fn start(
        script: Script,
        mode: EvaluationMode,
        reply_delay: Duration,
        sink: Arc<dyn SpeechSink>,
    ) -> Self {
        let id = Uuid::new_v4();
        let engine = DialogueEngine::start(Arc::new(script), mode);
        let speech = spawn_speech_worker(id, sink);
        if let Some(welcome) = engine.transcript().last() {
            speech.say(welcome.text.clone());
        }

        Session {
            id,
            created_at: Utc::now(),
            engine: Mutex::new(engine),
            turn_lock: Mutex::new(()),
            reply_delay,
            speech,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Submits a user answer and waits for the coach's reply.
    ///
    /// Blank input returns `Ok(None)` without touching the session. The turn
    /// runs on its own task so a caller that goes away mid-delay cannot leave
    /// a user message without its reply.
    pub async fn submit(self: &Arc<Self>, user_text: String) -> anyhow::Result<Option<CoachTurn>> {
        if user_text.trim().is_empty() {
            return Ok(None);
        }

        let session = Arc::clone(self);
        tokio::spawn(async move { session.run_turn(&user_text).await })
            .await
            .context("coaching turn task failed")
    }

    async fn run_turn(&self, user_text: &str) -> Option<CoachTurn> {
        let _turn = self.turn_lock.lock().await;

        let turn = if self.reply_delay.is_zero() {
            self.engine.lock().await.submit(user_text)?
        } else {
            let pending = self.engine.lock().await.begin_turn(user_text)?;
            debug!(
                session_id = %self.id,
                accepted = pending.accepted(),
                "answer judged; reply deferred"
            );
            tokio::time::sleep(self.reply_delay).await;
            self.engine.lock().await.finish_turn(pending)
        };

        let transcript_len = self.engine.lock().await.transcript().len();
        info!(
            session_id = %self.id,
            accepted = turn.accepted,
            question_index = turn.question_index,
            transcript_len,
            "coaching turn complete"
        );
        self.speech.say(turn.coach_message.text.clone());
        Some(turn)
    }

    pub fn stop_speech(&self) {
        self.speech.stop();
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let (current_question_index, question_count, transcript) = {
            let engine = self.engine.lock().await;
            (
                engine.current_question_index(),
                engine.question_count(),
                engine.state().transcript.messages().to_vec(),
            )
        };

        SessionSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            current_question_index,
            question_count,
            transcript,
            speech_status: self.speech.status(),
            notices: self.speech.notices().await,
        }
    }
}

/// In-memory registry of live sessions. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        self.sessions
            .write()
            .await
            .insert(session.id(), Arc::clone(&session));
        info!(session_id = %session.id(), "session started");
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Ends a session. Its speech worker shuts down once in-flight turns finish.
    pub async fn remove(&self, id: Uuid) -> Option<Arc<Session>> {
        let removed = self.sessions.write().await.remove(&id);
        if removed.is_some() {
            info!(session_id = %id, "session ended");
        }
        removed
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::speech::tests::{Call, RecordingSpeech};
    use crate::interview::speech::LogSpeech;
    use crate::models::message::Sender;

    fn session(delay: Duration, sink: Arc<dyn SpeechSink>) -> Arc<Session> {
        Arc::new(Session::start(
            Script::web_fundamentals("Software Engineer"),
            EvaluationMode::Rubric,
            delay,
            sink,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_after_the_delay() {
        let session = session(Duration::from_secs(1), Arc::new(LogSpeech));

        let submit = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.submit("yes".to_string()).await }
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        let midway = session.snapshot().await;
        assert_eq!(midway.transcript.len(), 2);
        assert_eq!(midway.transcript.last().unwrap().sender, Sender::User);
        assert_eq!(midway.current_question_index, 0);

        let turn = submit.await.unwrap().unwrap().unwrap();
        assert_eq!(turn.coach_message.id, 3);
        let done = session.snapshot().await;
        assert_eq!(done.transcript.len(), 3);
        assert_eq!(done.current_question_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submissions_are_serialized() {
        let session = session(Duration::from_secs(1), Arc::new(LogSpeech));

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.submit("yes".to_string()).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                session
                    .submit("HTTPS uses TLS encryption".to_string())
                    .await
            }
        });

        let first = first.await.unwrap().unwrap().unwrap();
        let second = second.await.unwrap().unwrap().unwrap();

        assert_eq!((first.user_message.id, first.coach_message.id), (2, 3));
        assert_eq!((second.user_message.id, second.coach_message.id), (4, 5));
        // The second answer was judged against the question the first turn revealed.
        assert!(second.accepted);
        assert_eq!(second.question_index, 2);

        let senders: Vec<Sender> = session
            .snapshot()
            .await
            .transcript
            .iter()
            .map(|m| m.sender)
            .collect();
        assert_eq!(
            senders,
            vec![Sender::Coach, Sender::User, Sender::Coach, Sender::User, Sender::Coach]
        );
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_turn_future_can_move_across_threads() {
        let session = session(Duration::ZERO, Arc::new(LogSpeech));
        let turn = session.run_turn("yes");
        assert_send(&turn);
        assert!(turn.await.unwrap().accepted);
    }

    #[tokio::test]
    async fn test_blank_submission_changes_nothing() {
        let session = session(Duration::ZERO, Arc::new(LogSpeech));
        assert!(session.submit("  ".to_string()).await.unwrap().is_none());
        assert_eq!(session.snapshot().await.transcript.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_welcome_and_replies_are_spoken() {
        let sink = RecordingSpeech::new(Duration::ZERO);
        let session = session(Duration::ZERO, sink.clone());
        tokio::time::sleep(Duration::from_millis(1)).await;

        let turn = session.submit("yes".to_string()).await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        let calls = sink.calls.lock().await.clone();
        let spoken: Vec<&Call> = calls
            .iter()
            .filter(|c| matches!(c, Call::Speak(_)))
            .collect();
        assert_eq!(spoken.len(), 2);
        assert_eq!(*spoken[1], Call::Speak(turn.coach_message.text));
    }

    #[tokio::test]
    async fn test_speech_failure_leaves_dialogue_untouched() {
        let session = session(
            Duration::ZERO,
            Arc::new(crate::interview::speech::tests::BrokenSpeech),
        );
        let turn = session.submit("yes".to_string()).await.unwrap().unwrap();
        assert!(turn.accepted);
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.current_question_index, 1);
        assert_eq!(snapshot.transcript.len(), 3);
        assert!(!snapshot.notices.is_empty());
    }

    #[tokio::test]
    async fn test_store_insert_get_remove() {
        let store = SessionStore::new();
        let session = store
            .insert(Session::start(
                Script::web_fundamentals("Software Engineer"),
                EvaluationMode::Rubric,
                Duration::ZERO,
                Arc::new(LogSpeech),
            ))
            .await;

        assert_eq!(store.count().await, 1);
        assert!(store.get(session.id()).await.is_some());
        assert!(store.remove(session.id()).await.is_some());
        assert!(store.get(session.id()).await.is_none());
        assert!(store.remove(session.id()).await.is_none());
    }
}
