//! Chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hello! I'm TrustBot. I can analyze your spending, help you budget, or search for specific transaction details. How can I help you today?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// What the chat screen shows. Messages are only ever appended.
#[derive(Clone, Debug)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::model(GREETING)],
        }
    }
}

impl ChatLog {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_starts_with_greeting() {
        let mut log = ChatLog::default();
        assert_eq!(log.messages()[0].role, Role::Model);
        assert_eq!(log.messages()[0].text, GREETING);

        log.push(ChatMessage::user("How much did I spend on travel?"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[1].role, Role::User);
    }
}
