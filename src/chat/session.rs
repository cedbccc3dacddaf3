use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::fixtures::ChartKind;
use crate::sequencer::ThinkingStep;

pub const UNTITLED_SESSION: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ChatMessage {
    User {
        content: String,
        sent_at: DateTime<Utc>,
    },
    Agent {
        content: String,
        /// Thinking steps as they stood when the turn ended. Kept after
        /// the execution store moves on.
        steps: Vec<ThinkingStep>,
        chart: Option<ChartKind>,
        follow_ups: Vec<String>,
        complete: bool,
        sent_at: DateTime<Utc>,
    },
}

impl ChatMessage {
    pub fn content(&self) -> &str {
        match self {
            Self::User { content, .. } | Self::Agent { content, .. } => content,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: UNTITLED_SESSION.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Record a user query. The first one names the session.
    pub fn push_user(&mut self, query: &str, title_max_chars: usize) {
        if self.messages.is_empty() {
            self.title = session_title(query, title_max_chars);
        }
        self.messages.push(ChatMessage::User {
            content: query.to_string(),
            sent_at: Utc::now(),
        });
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Query truncated to `max_chars` characters, with an ellipsis when cut.
pub fn session_title(query: &str, max_chars: usize) -> String {
    let query = query.trim();
    if query.chars().count() > max_chars {
        let head: String = query.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        query.to_string()
    }
}
