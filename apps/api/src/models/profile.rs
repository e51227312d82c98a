use serde::{Deserialize, Serialize};

/// Structured facts inferred from a resume. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub job_title: String,
    /// Never empty: the extractor substitutes a default set when nothing matches.
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

impl Profile {
    /// The skill at `index`, if the resume yielded that many.
    pub fn skill(&self, index: usize) -> Option<&str> {
        self.skills.get(index).map(String::as_str)
    }
}
