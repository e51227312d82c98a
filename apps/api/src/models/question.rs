use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Technical,
    Behavioral,
}

/// A generated interview question with a model answer and a coaching tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within its category, starting at 1.
    pub id: u32,
    pub prompt: String,
    pub ideal_answer: String,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub technical: Vec<Question>,
    pub behavioral: Vec<Question>,
}

impl QuestionBank {
    /// Technical questions followed by behavioral ones, tagged with their category.
    pub fn flattened(&self) -> impl Iterator<Item = (QuestionCategory, &Question)> {
        self.technical
            .iter()
            .map(|q| (QuestionCategory::Technical, q))
            .chain(
                self.behavioral
                    .iter()
                    .map(|q| (QuestionCategory::Behavioral, q)),
            )
    }

    pub fn question_count(&self) -> usize {
        self.technical.len() + self.behavioral.len()
    }
}
