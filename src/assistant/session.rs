use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "Hi, I'm your loan assistant. Ask about eligibility, documents, or loan types.";

/// Oldest messages are dropped past this point; the greeting is dropped with them.
const MAX_TRANSCRIPT_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Transcript of the single interactive session. Lives only in memory.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::now(ChatRole::Assistant, GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::now(ChatRole::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::now(ChatRole::Assistant, text));
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_TRANSCRIPT_MESSAGES {
            let excess = self.messages.len() - MAX_TRANSCRIPT_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}
