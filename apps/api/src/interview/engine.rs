//! Dialogue engine: the turn-based state machine behind a coaching session.
//!
//! The engine is synchronous and infallible. It owns the transcript and the
//! current slot index; it never performs I/O. Delays, locking and speech are
//! the session layer's business.
//!
//! A turn runs in two phases so the reply can be deferred:
//! 1. `begin_turn` records the user's message and judges it.
//! 2. `finish_turn` applies the index transition and records the coach reply.
//!
//! `submit` runs both phases back to back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::interview::rubric;
use crate::interview::script::Script;
use crate::models::message::{Message, Sender, Transcript};

/// How answers are judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Keyword rubric per slot. The documented behavior.
    #[default]
    Rubric,
    /// Any non-blank answer advances. A simplified mode with no content check.
    Unconditional,
}

/// Conversation state: where we are in the script and what has been said.
#[derive(Debug, Clone, Serialize)]
pub struct DialogueState {
    /// Never decreases; saturates at the script's last index.
    pub current_question_index: usize,
    pub transcript: Transcript,
}

/// A judged answer whose coach reply has not been recorded yet.
#[derive(Debug)]
#[must_use = "a pending turn must be finished to record the coach reply"]
pub struct PendingTurn {
    user_message: Message,
    accepted: bool,
    matched_keywords: Vec<String>,
}

impl PendingTurn {
    pub fn accepted(&self) -> bool {
        self.accepted
    }
}

/// Result of one completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct CoachTurn {
    pub user_message: Message,
    pub coach_message: Message,
    pub accepted: bool,
    pub matched_keywords: Vec<String>,
    /// Index after the transition.
    pub question_index: usize,
    pub at_final_question: bool,
}

pub struct DialogueEngine {
    script: Arc<Script>,
    mode: EvaluationMode,
    state: DialogueState,
}

impl DialogueEngine {
    /// Starts at slot 0 with the welcome prompt as the only message.
    pub fn start(script: Arc<Script>, mode: EvaluationMode) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(script.slot(0).prompt.clone(), Sender::Coach);
        DialogueEngine {
            script,
            mode,
            state: DialogueState {
                current_question_index: 0,
                transcript,
            },
        }
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn current_question_index(&self) -> usize {
        self.state.current_question_index
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn question_count(&self) -> usize {
        self.script.slot_count()
    }

    /// Runs a complete turn. Blank input is ignored and returns `None`.
    pub fn submit(&mut self, user_text: &str) -> Option<CoachTurn> {
        let pending = self.begin_turn(user_text)?;
        Some(self.finish_turn(pending))
    }

    /// Records the user's message and judges it against the current slot.
    /// Blank input leaves the state untouched and returns `None`.
    pub fn begin_turn(&mut self, user_text: &str) -> Option<PendingTurn> {
        if user_text.trim().is_empty() {
            return None;
        }

        let user_message = self
            .state
            .transcript
            .push(user_text, Sender::User)
            .clone();

        let index = self.state.current_question_index;
        let slot_rubric = &self.script.slot(index).rubric;
        let matched_keywords = rubric::matched_keywords(user_text, slot_rubric);
        let accepted = match self.mode {
            EvaluationMode::Rubric => rubric::evaluate(user_text, slot_rubric),
            EvaluationMode::Unconditional => true,
        };

        debug!(
            "Slot {index}: {} of {} keywords matched (need {}) -> {}",
            matched_keywords.len(),
            slot_rubric.required_keywords.len(),
            slot_rubric.minimum_matches,
            if accepted { "accepted" } else { "rejected" }
        );

        Some(PendingTurn {
            user_message,
            accepted,
            matched_keywords,
        })
    }

    /// Applies the transition decided in `begin_turn` and records the coach reply.
    pub fn finish_turn(&mut self, pending: PendingTurn) -> CoachTurn {
        let index = self.state.current_question_index;
        let reply = if pending.accepted {
            let next = (index + 1).min(self.script.last_index());
            self.state.current_question_index = next;
            self.script.slot(next).prompt.clone()
        } else {
            self.script.slot(index).rubric.remediation()
        };

        let coach_message = self.state.transcript.push(reply, Sender::Coach).clone();
        let question_index = self.state.current_question_index;

        CoachTurn {
            user_message: pending.user_message,
            coach_message,
            accepted: pending.accepted,
            matched_keywords: pending.matched_keywords,
            question_index,
            at_final_question: question_index == self.script.last_index(),
        }
    }
}
