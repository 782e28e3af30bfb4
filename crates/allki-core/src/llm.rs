//! LLM collaborator contract.
//!
//! The core never talks to a provider directly. It builds a
//! [`CompletionRequest`] and hands it to whatever [`LlmClient`] the caller
//! wired in (the OpenAI adapter in `allki-interaction`, or a mock in tests).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::MessageRole;

/// One message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Everything the provider needs for a single completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Persona instructions built by the prompt builder
    pub system_prompt: String,
    /// Trailing history window followed by the new user message
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature in `[0.1, 1.0]`
    pub temperature: f64,
    /// Upper bound for generated tokens
    pub max_tokens: u32,
}

/// Provider reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    /// Total tokens billed for the request (prompt + completion)
    pub token_count: u64,
    pub model: String,
    pub finish_reason: String,
}

/// Typed failures of the LLM collaborator.
///
/// These are surfaced to the caller as-is; the core does not retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Invalid or missing API key
    #[error("LLM authentication failed: {0}")]
    Unauthorized(String),

    /// Provider rate limit hit
    #[error("LLM rate limit reached: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Provider unreachable or returning server errors
    #[error("LLM service unavailable: {0}")]
    Unavailable(String),

    /// Request rejected for another reason (bad parameters, ...)
    #[error("LLM request rejected: {0}")]
    Request(String),

    /// Response could not be interpreted
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Whether the caller may reasonably try again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Unavailable(_))
    }
}

/// Chat-completion provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the request and returns the generated text and token usage.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;

    /// Model identifier used for new conversations.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Unavailable("down".into()).is_transient());
        assert!(
            LlmError::RateLimited {
                message: "slow down".into(),
                retry_after: Some(Duration::from_secs(3)),
            }
            .is_transient()
        );
        assert!(!LlmError::Unauthorized("bad key".into()).is_transient());
        assert!(!LlmError::InvalidResponse("empty".into()).is_transient());
    }

    #[test]
    fn test_chat_message_role_serialization() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
