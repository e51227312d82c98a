//! Answer rubrics and the keyword evaluator.
//!
//! Matching is plain substring containment on the lowercased utterance, not
//! token matching: "ssl" is found inside "grassland". Callers that want
//! word-boundary semantics must not rely on this module.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::question::{Question, QuestionCategory};

/// Appended to every remediation so the user knows the same question is still open.
pub const RETRY_PROMPT: &str = "Whenever you're ready, give it another try.";

const CONTENT_MINIMUM_MATCHES: usize = 2;

const AFFIRMATIVE_KEYWORDS: &[&str] = &[
    "yes", "yeah", "yep", "sure", "ok", "ready", "start", "let's", "go ahead",
];

/// Acceptance criteria for one dialogue slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    /// Stored lowercased.
    pub required_keywords: BTreeSet<String>,
    pub minimum_matches: usize,
    pub remediation_feedback: String,
    pub remediation_suggestion: String,
}

impl Rubric {
    pub fn new<I, S>(
        keywords: I,
        minimum_matches: usize,
        feedback: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Rubric {
            required_keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            minimum_matches,
            remediation_feedback: feedback.into(),
            remediation_suggestion: suggestion.into(),
        }
    }

    /// Coach reply for an answer that failed this rubric.
    pub fn remediation(&self) -> String {
        format!(
            "{} {} {RETRY_PROMPT}",
            self.remediation_feedback, self.remediation_suggestion
        )
    }
}

/// Keywords from `rubric` that occur anywhere in `utterance`, in rubric order.
pub fn matched_keywords(utterance: &str, rubric: &Rubric) -> Vec<String> {
    let normalized = utterance.to_lowercase();
    rubric
        .required_keywords
        .iter()
        .filter(|keyword| normalized.contains(keyword.as_str()))
        .cloned()
        .collect()
}

/// True when at least `minimum_matches` distinct keywords occur in the utterance.
pub fn evaluate(utterance: &str, rubric: &Rubric) -> bool {
    matched_keywords(utterance, rubric).len() >= rubric.minimum_matches
}

/// The consent gate in front of the first question: a single affirmative word is enough.
pub fn welcome_rubric() -> Rubric {
    Rubric::new(
        AFFIRMATIVE_KEYWORDS.iter().copied(),
        1,
        "No problem, we can start whenever you like.",
        "Just say \"yes\" or \"ready\" when you want the first question.",
    )
}

/// Rubric for a generated bank question, keyed by its category and id.
///
/// The question's own tip becomes the remediation suggestion. Technical
/// question 1 also listens for the skill it asks about.
pub fn for_question(category: QuestionCategory, question: &Question, skill: &str) -> Rubric {
    let (keywords, feedback): (&[&str], &str) = match (category, question.id) {
        (QuestionCategory::Technical, 1) => (
            &["project", "built", "result", "impact", "improv", "used"],
            "I'd like to hear about a concrete project and what came out of it.",
        ),
        (QuestionCategory::Technical, 2) => (
            &["documentation", "tutorial", "practice", "project", "course", "communit", "build"],
            "Walk me through how you actually go about learning something new.",
        ),
        (QuestionCategory::Technical, 3) => (
            &["problem", "root cause", "debug", "solution", "approach", "result", "investigat"],
            "That answer doesn't yet show how you worked through the problem.",
        ),
        (QuestionCategory::Technical, 4) => (
            &["test", "review", "lint", "static analysis", "standard", "refactor", "document"],
            "I didn't hear the practices you rely on to keep quality high.",
        ),
        (QuestionCategory::Technical, 5) => (
            &["metric", "coverage", "performance", "kpi", "satisfaction", "adoption", "bug"],
            "Try naming the concrete measures you use to judge success.",
        ),
        (QuestionCategory::Behavioral, 1) => (
            &["priorit", "deadline", "plan", "communicat", "team", "deliver"],
            "Tell me more about how you organised the work under pressure.",
        ),
        (QuestionCategory::Behavioral, 2) => (
            &["listen", "communicat", "common ground", "compromise", "perspective", "resolv", "discuss"],
            "I'd like to hear how you actually brought the people in the conflict together.",
        ),
        (QuestionCategory::Behavioral, 3) => (
            &["adapt", "change", "learn", "positive", "stakeholder", "transition"],
            "Describe what you did to adjust when things changed.",
        ),
        (QuestionCategory::Behavioral, 4) => (
            &["priorit", "urgen", "importan", "stakeholder", "organiz", "deadline"],
            "Explain how you decide what gets done first.",
        ),
        (QuestionCategory::Behavioral, _) => (
            &["grow", "lead", "learn", "expert", "mentor", "skill", "goal"],
            "Give me a clearer picture of where you want your career to go.",
        ),
        (QuestionCategory::Technical, _) => (
            &["example", "approach", "result", "because"],
            "That answer is a little thin on specifics.",
        ),
    };

    let mut rubric = Rubric::new(
        keywords.iter().copied(),
        CONTENT_MINIMUM_MATCHES,
        feedback,
        question.tip.clone(),
    );
    let skill = skill.trim();
    if category == QuestionCategory::Technical && question.id == 1 && !skill.is_empty() {
        rubric.required_keywords.insert(skill.to_lowercase());
    }
    rubric
}

#[cfg(test)]
mod tests {
    use super::*;

    fn https_rubric() -> Rubric {
        Rubric::new(
            ["secure", "encryption", "ssl", "tls", "certificate"],
            2,
            "Not quite.",
            "Think about what the S stands for.",
        )
    }

    fn question(id: u32) -> Question {
        Question {
            id,
            prompt: "prompt".to_string(),
            ideal_answer: "answer".to_string(),
            tip: "Use the STAR method.".to_string(),
        }
    }

    #[test]
    fn test_zero_matches_rejected() {
        assert!(!evaluate("it's just a protocol", &https_rubric()));
    }

    #[test]
    fn test_one_match_rejected_like_zero() {
        assert!(!evaluate("it uses TLS", &https_rubric()));
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let utterance = "HTTPS uses TLS encryption and certificates for security";
        assert!(evaluate(utterance, &https_rubric()));
        assert_eq!(
            matched_keywords(utterance, &https_rubric()),
            vec!["certificate", "encryption", "tls"]
        );
    }

    #[test]
    fn test_substring_matches_inside_unrelated_words() {
        // "ssl" inside "grassland", "secure" inside "insecure"
        assert!(evaluate("insecure grassland", &https_rubric()));
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        assert!(!evaluate("tls tls tls", &https_rubric()));
    }

    #[test]
    fn test_empty_utterance_rejected_unless_minimum_is_zero() {
        assert!(!evaluate("", &https_rubric()));
        let lenient = Rubric::new(["anything"], 0, "", "");
        assert!(evaluate("", &lenient));
    }

    #[test]
    fn test_keywords_are_lowercased_on_construction() {
        let rubric = Rubric::new(["TLS", "Certificate"], 1, "", "");
        assert!(rubric.required_keywords.contains("tls"));
        assert!(rubric.required_keywords.contains("certificate"));
    }

    #[test]
    fn test_remediation_concatenates_feedback_suggestion_and_retry_prompt() {
        assert_eq!(
            https_rubric().remediation(),
            format!("Not quite. Think about what the S stands for. {RETRY_PROMPT}")
        );
    }

    #[test]
    fn test_welcome_rubric_accepts_single_affirmative() {
        let rubric = welcome_rubric();
        assert_eq!(rubric.minimum_matches, 1);
        assert!(evaluate("Yes", &rubric));
        assert!(evaluate("sure, let's do it", &rubric));
        assert!(!evaluate("maybe later", &rubric));
    }

    #[test]
    fn test_bank_rubrics_require_two_matches_and_use_tip() {
        let rubric = for_question(QuestionCategory::Behavioral, &question(2), "Python");
        assert_eq!(rubric.minimum_matches, 2);
        assert_eq!(rubric.remediation_suggestion, "Use the STAR method.");
        assert!(evaluate(
            "I listen to each perspective and we discuss until we find common ground",
            &rubric
        ));
    }

    #[test]
    fn test_first_technical_rubric_listens_for_the_skill() {
        let rubric = for_question(QuestionCategory::Technical, &question(1), "Node.js");
        assert!(rubric.required_keywords.contains("node.js"));
        assert!(evaluate("I used Node.js heavily", &rubric));
    }

    #[test]
    fn test_blank_skill_is_not_a_keyword() {
        for skill in ["", "   "] {
            let rubric = for_question(QuestionCategory::Technical, &question(1), skill);
            assert!(rubric.required_keywords.iter().all(|k| !k.trim().is_empty()));
            assert!(!evaluate("I used it", &rubric));
        }
    }
}
