//! OpenAI Chat Completions client.
//!
//! Implements the core [`LlmClient`] contract over `POST /chat/completions`.
//! HTTP failures are mapped onto typed [`LlmError`]s and never retried here.

use std::time::{Duration, Instant};

use allki_core::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmSettings};
use allki_core::conversation::MessageRole;
use allki_core::llm::{Completion, CompletionRequest, LlmClient, LlmError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Reply used when the provider returns no content.
pub const EMPTY_REPLY_FALLBACK: &str = "Entschuldigung, ich konnte keine Antwort generieren.";

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    presence_penalty: f64,
    frequency_penalty: f64,
}

impl OpenAiChatClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
        }
    }

    /// Builds a client from the `[llm]` config section.
    ///
    /// The API key must already be resolved (file or `OPENAI_API_KEY`).
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Unauthorized(
                    "No API key configured (set [llm].api_key or OPENAI_API_KEY)".to_string(),
                )
            })?;
        let model = if settings.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            settings.model.clone()
        };

        Ok(Self::new(api_key, model)
            .with_base_url(settings.base_url.clone())
            .with_penalties(settings.presence_penalty, settings.frequency_penalty))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_penalties(mut self, presence: f64, frequency: f64) -> Self {
        self.presence_penalty = presence;
        self.frequency_penalty = frequency;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_body(&self, request: &CompletionRequest) -> ChatCompletionBody {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system_prompt.trim().is_empty() {
            messages.push(WireMessage {
                role: "system",
                content: request.system_prompt.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: role_name(m.role),
            content: m.content.clone(),
        }));

        ChatCompletionBody {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
        }
    }

    async fn send_request(&self, body: &ChatCompletionBody) -> Result<ChatCompletionResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() || err.is_timeout() {
                    LlmError::Unavailable(format!("OpenAI API unreachable: {err}"))
                } else {
                    LlmError::Request(format!("OpenAI API request failed: {err}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text, retry_after));
        }

        response
            .json()
            .await
            .map_err(|err| LlmError::InvalidResponse(format!("Failed to parse OpenAI response: {err}")))
    }
}

#[async_trait]
impl LlmClient for OpenAiChatClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let body = self.build_body(&request);
        let started = Instant::now();
        info!(
            model = %self.model,
            temperature = request.temperature,
            messages = body.messages.len(),
            "Requesting chat completion"
        );

        match self.send_request(&body).await {
            Ok(response) => {
                let completion = into_completion(response, &self.model);
                info!(
                    tokens = completion.token_count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Chat completion received"
                );
                Ok(completion)
            }
            Err(err) => {
                warn!(error = %err, "Chat completion failed");
                Err(err)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f64,
    presence_penalty: f64,
    frequency_penalty: f64,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// First choice's text (or the fallback reply) plus total token usage.
fn into_completion(response: ChatCompletionResponse, requested_model: &str) -> Completion {
    let token_count = response.usage.map(|u| u.total_tokens).unwrap_or(0);
    let model = response
        .model
        .unwrap_or_else(|| requested_model.to_string());
    let (text, finish_reason) = match response.choices.into_iter().next() {
        Some(choice) => (
            choice.message.content.filter(|c| !c.trim().is_empty()),
            choice.finish_reason,
        ),
        None => (None, None),
    };

    Completion {
        text: text.unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()),
        token_count,
        model,
        finish_reason: finish_reason.unwrap_or_else(|| "unknown".to_string()),
    }
}

fn map_http_error(status: StatusCode, body: &str, retry_after: Option<Duration>) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    let message = format!("{} {}", status.as_u16(), message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            message,
            retry_after,
        },
        s if s.is_server_error() => LlmError::Unavailable(message),
        _ => LlmError::Request(message),
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
