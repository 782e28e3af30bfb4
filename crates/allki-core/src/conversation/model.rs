//! Conversation and message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::{ChatMessage, Completion};

/// Number of trailing messages sent to the model with every request.
pub const HISTORY_WINDOW: usize = 10;

/// Maximum length of a conversation title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System-generated message.
    System,
}

/// Provider details attached to assistant messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub model: Option<String>,
    pub finish_reason: Option<String>,
    pub response_time_ms: Option<u64>,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            tokens: None,
            metadata: None,
        }
    }
}

/// Aggregated statistics of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub total_tokens: u64,
    pub model: String,
    /// Running mean over assistant replies
    pub avg_response_time_ms: f64,
}

/// A conversation between a user and one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub profile_id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub metadata: ConversationMetadata,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates an empty conversation. The title is truncated to [`MAX_TITLE_CHARS`].
    pub fn new(
        user_id: impl Into<String>,
        profile_id: impl Into<String>,
        title: &str,
        model: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            profile_id: profile_id.into(),
            title: title.trim().chars().take(MAX_TITLE_CHARS).collect(),
            messages: Vec::new(),
            metadata: ConversationMetadata {
                total_tokens: 0,
                model: model.into(),
                avg_response_time_ms: 0.0,
            },
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a user message.
    pub fn push_user_message(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::new(MessageRole::User, content))
    }

    /// Appends the assistant reply and folds its usage into the metadata.
    pub fn push_assistant_reply(&mut self, completion: &Completion, response_time_ms: u64) -> &Message {
        let mut message = Message::new(MessageRole::Assistant, completion.text.clone());
        message.tokens = Some(completion.token_count);
        message.metadata = Some(MessageMetadata {
            model: Some(completion.model.clone()),
            finish_reason: Some(completion.finish_reason.clone()),
            response_time_ms: Some(response_time_ms),
        });

        self.metadata.total_tokens += completion.token_count;
        let replies = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count() as f64
            + 1.0;
        self.metadata.avg_response_time_ms =
            (self.metadata.avg_response_time_ms * (replies - 1.0) + response_time_ms as f64) / replies;

        self.push(message)
    }

    /// The last `window` user/assistant messages, oldest first, ready for the model.
    pub fn recent_history(&self, window: usize) -> Vec<ChatMessage> {
        let start = self.messages.len().saturating_sub(window);
        self.messages[start..]
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| ChatMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    fn push(&mut self, message: Message) -> &Message {
        self.updated_at = message.timestamp;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(text: &str, tokens: u64) -> Completion {
        Completion {
            text: text.to_string(),
            token_count: tokens,
            model: "gpt-4".to_string(),
            finish_reason: "stop".to_string(),
        }
    }

    #[test]
    fn test_title_is_truncated() {
        let long_title = "x".repeat(150);
        let conversation = Conversation::new("u", "p", &long_title, "gpt-4");
        assert_eq!(conversation.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_recent_history_window() {
        let mut conversation = Conversation::new("u", "p", "Test", "gpt-4");
        for i in 0..15 {
            conversation.push_user_message(format!("message {i}"));
        }

        let history = conversation.recent_history(HISTORY_WINDOW);
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].content, "message 5");
        assert_eq!(history[9].content, "message 14");
    }

    #[test]
    fn test_assistant_reply_updates_metadata() {
        let mut conversation = Conversation::new("u", "p", "Test", "gpt-4");
        conversation.push_user_message("hi");
        conversation.push_assistant_reply(&completion("hello", 12), 100);
        conversation.push_user_message("again");
        conversation.push_assistant_reply(&completion("hello again", 8), 300);

        assert_eq!(conversation.metadata.total_tokens, 20);
        assert!((conversation.metadata.avg_response_time_ms - 200.0).abs() < f64::EPSILON);
        assert_eq!(conversation.messages.len(), 4);
        assert_eq!(conversation.messages[3].tokens, Some(8));
    }
}
