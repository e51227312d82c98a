//! Dialogue scripts: the ordered slots a session walks through.
//!
//! Slot 0 is always the welcome/consent turn. Every later slot pairs the text the
//! coach asks with the rubric the answer is judged against.

use serde::{Deserialize, Serialize};

use crate::interview::rubric::{self, Rubric};
use crate::models::profile::Profile;
use crate::models::question::QuestionBank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub prompt: String,
    pub rubric: Rubric,
}

/// Which script a new session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    /// Welcome followed by the questions generated from the candidate's resume.
    #[default]
    Resume,
    /// Welcome followed by a fixed set of web platform questions.
    WebFundamentals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    slots: Vec<Slot>,
}

pub fn welcome_message(job_title: &str) -> String {
    format!(
        "Hi! I'm your AI Interview Coach. I see you're preparing for a {job_title} position. \
         Would you like to start practicing interview questions?"
    )
}

impl Script {
    /// Welcome slot plus `questions`. Always non-empty.
    pub fn new(job_title: &str, questions: Vec<Slot>) -> Self {
        let mut slots = Vec::with_capacity(questions.len() + 1);
        slots.push(Slot {
            prompt: welcome_message(job_title),
            rubric: rubric::welcome_rubric(),
        });
        slots.extend(questions);
        Script { slots }
    }

    pub fn for_kind(kind: ScriptKind, profile: &Profile, bank: &QuestionBank) -> Self {
        match kind {
            ScriptKind::Resume => Self::from_bank(profile, bank),
            ScriptKind::WebFundamentals => Self::web_fundamentals(&profile.job_title),
        }
    }

    /// Technical questions first, then behavioral, each with its bank rubric.
    pub fn from_bank(profile: &Profile, bank: &QuestionBank) -> Self {
        let skill = profile.skill(0).unwrap_or_default();
        let questions = bank
            .flattened()
            .map(|(category, question)| Slot {
                prompt: question.prompt.clone(),
                rubric: rubric::for_question(category, question, skill),
            })
            .collect();
        Self::new(&profile.job_title, questions)
    }

    pub fn web_fundamentals(job_title: &str) -> Self {
        let slot = |prompt: &str, keywords: &[&str], feedback: &str, suggestion: &str| Slot {
            prompt: prompt.to_string(),
            rubric: Rubric::new(keywords.iter().copied(), 2, feedback, suggestion),
        };

        Self::new(
            job_title,
            vec![
                slot(
                    "Let's start with the basics. What does HTTPS add on top of HTTP?",
                    &["secure", "encryption", "ssl", "tls", "certificate"],
                    "That's not quite it.",
                    "Think about how the connection is protected and how the server proves who it is.",
                ),
                slot(
                    "What happens between the browser receiving HTML and pixels appearing on screen?",
                    &["dom", "css", "layout", "paint", "parse", "render"],
                    "You're missing some of the rendering pipeline.",
                    "Consider how markup and styles are turned into something the browser can draw.",
                ),
                slot(
                    "How do cookies differ from localStorage and sessionStorage?",
                    &["expir", "server", "request", "persist", "tab", "size"],
                    "Those storage options behave more differently than that.",
                    "Compare where each one is sent, how long it lives and how much it can hold.",
                ),
                slot(
                    "How would you compare a REST API with a GraphQL API?",
                    &["endpoint", "resource", "query", "schema", "fetch", "method"],
                    "I'd like a clearer contrast between the two styles.",
                    "Think about how clients ask for data and how much they get back.",
                ),
                slot(
                    "What is CORS and why do browsers enforce it?",
                    &["origin", "header", "preflight", "browser", "security"],
                    "That doesn't quite explain CORS.",
                    "Think about which requests a page may make to other sites and who decides.",
                ),
            ],
        )
    }

    /// Slot at `index`, saturating at the last slot.
    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index.min(self.last_index())]
    }

    pub fn last_index(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
