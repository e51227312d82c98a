//! Profile extraction: pattern-based inference of title, skills, experience and
//! education from raw resume text. Never fails: every field has a fallback.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::profile::Profile;

pub const FALLBACK_JOB_TITLE: &str = "Software Professional";
pub const FALLBACK_SKILLS: &[&str] = &["JavaScript", "React", "Communication"];
pub const FALLBACK_EXPERIENCE: &str = "Previous work experience in software development";
pub const FALLBACK_EDUCATION: &str = "Bachelor's Degree";

const MAX_EXPERIENCE_LINES: usize = 3;
const MAX_EDUCATION_LINES: usize = 2;

/// Known roles, most specific first. First match wins.
const ROLE_TITLES: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "Product Manager",
    "UX Designer",
    "Marketing Manager",
    "Business Analyst",
];

/// Skill catalog. Output preserves this order, not resume order.
const SKILL_CATALOG: &[&str] = &[
    "JavaScript",
    "Python",
    "React",
    "Node.js",
    "SQL",
    "Java",
    "C++",
    "Machine Learning",
    "Data Analysis",
    "Project Management",
    "UI/UX",
    "Figma",
    "Adobe",
    "Marketing",
    "SEO",
    "Content Creation",
];

static ROLE_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| ROLE_TITLES.iter().map(|t| phrase_pattern(t)).collect());

static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_CATALOG
        .iter()
        .map(|s| (*s, phrase_pattern(s)))
        .collect()
});

static EXPERIENCE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)experience|work|job|position|role").expect("experience pattern is valid")
});

static EDUCATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)education|university|college|degree|bachelor|master|phd")
        .expect("education pattern is valid")
});

/// Builds a case-insensitive matcher for a literal phrase.
///
/// Word boundaries are only asserted on sides where the phrase begins or ends
/// with a word character, so "C++" still matches "C++," while "Java" does not
/// match inside "JavaScript".
fn phrase_pattern(phrase: &str) -> Regex {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if phrase.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let tail = if phrase.chars().last().is_some_and(is_word) { r"\b" } else { "" };
    Regex::new(&format!("(?i){lead}{}{tail}", regex::escape(phrase)))
        .expect("escaped literal is always a valid pattern")
}

/// Maps raw resume text to a `Profile`.
pub fn extract(raw_text: &str) -> Profile {
    Profile {
        job_title: extract_job_title(raw_text),
        skills: extract_skills(raw_text),
        experience: extract_lines(
            raw_text,
            &EXPERIENCE_LINE,
            MAX_EXPERIENCE_LINES,
            FALLBACK_EXPERIENCE,
        ),
        education: extract_lines(
            raw_text,
            &EDUCATION_LINE,
            MAX_EDUCATION_LINES,
            FALLBACK_EDUCATION,
        ),
    }
}

fn extract_job_title(text: &str) -> String {
    ROLE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_JOB_TITLE.to_string())
}

fn extract_skills(text: &str) -> Vec<String> {
    let found: Vec<String> = SKILL_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect();

    if found.is_empty() {
        FALLBACK_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        found
    }
}

fn extract_lines(text: &str, pattern: &Regex, limit: usize, fallback: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| pattern.is_match(line))
        .take(limit)
        .collect();

    if lines.is_empty() {
        fallback.to_string()
    } else {
        lines.join("\n")
    }
}
