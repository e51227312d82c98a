use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::interview::engine::EvaluationMode;

const DEFAULT_REPLY_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Artificial "thinking" pause between a user's message and the coach's reply.
    pub reply_delay: Duration,
    pub evaluation_mode: EvaluationMode,
    /// When set, coach utterances are forwarded to this endpoint for speech synthesis.
    pub speech_webhook_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            evaluation_mode: EvaluationMode::Rubric,
            speech_webhook_url: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            reply_delay: Duration::from_millis(
                optional_env("COACH_REPLY_DELAY_MS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("COACH_REPLY_DELAY_MS must be a whole number of milliseconds")?
                    .unwrap_or(DEFAULT_REPLY_DELAY_MS),
            ),
            evaluation_mode: match optional_env("COACH_EVALUATION_MODE") {
                Some(raw) => parse_evaluation_mode(&raw)?,
                None => EvaluationMode::Rubric,
            },
            speech_webhook_url: optional_env("SPEECH_WEBHOOK_URL"),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a positive integer")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_evaluation_mode(raw: &str) -> Result<EvaluationMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "rubric" => Ok(EvaluationMode::Rubric),
        "unconditional" => Ok(EvaluationMode::Unconditional),
        other => bail!("COACH_EVALUATION_MODE must be 'rubric' or 'unconditional', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_mode_parses_case_insensitively() {
        assert_eq!(parse_evaluation_mode("Rubric").unwrap(), EvaluationMode::Rubric);
        assert_eq!(
            parse_evaluation_mode(" UNCONDITIONAL ").unwrap(),
            EvaluationMode::Unconditional
        );
    }

    #[test]
    fn test_unknown_evaluation_mode_is_rejected() {
        let err = parse_evaluation_mode("llm").unwrap_err();
        assert!(err.to_string().contains("llm"));
    }

    #[test]
    fn test_default_config_uses_rubric_and_one_second_delay() {
        let config = Config::default();
        assert_eq!(config.evaluation_mode, EvaluationMode::Rubric);
        assert_eq!(config.reply_delay, Duration::from_millis(1000));
        assert!(config.speech_webhook_url.is_none());
    }
}
