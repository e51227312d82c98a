use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Coach,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u32,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation log.
///
/// Ids are derived from the current length at append time, so they start at 1
/// and increase by exactly one per message.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, sender: Sender) -> &Message {
        let id = self.messages.len() as u32 + 1;
        self.messages.push(Message {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut transcript = Transcript::new();
        transcript.push("hello", Sender::Coach);
        transcript.push("hi", Sender::User);
        transcript.push("question", Sender::Coach);

        let ids: Vec<u32> = transcript.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Coach).unwrap(), r#""coach""#);
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), r#""user""#);
    }

    #[test]
    fn test_transcript_serializes_as_plain_array() {
        let mut transcript = Transcript::new();
        transcript.push("hello", Sender::Coach);
        let value = serde_json::to_value(&transcript).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["text"], "hello");
    }
}
