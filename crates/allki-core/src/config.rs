//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing file or a partial file is valid.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub memory: MemorySettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Falls back to `OPENAI_API_KEY` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    /// Ask the model for a conversation title instead of cutting the first message
    pub generate_titles: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
            generate_titles: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MemorySettings {
    pub max_memories_per_profile: usize,
    /// Trailing messages sent with each request
    pub history_window: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            max_memories_per_profile: crate::memory::MAX_MEMORIES_PER_PROFILE,
            history_window: crate::conversation::HISTORY_WINDOW,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LimitSettings {
    pub max_profiles_per_user: usize,
    pub max_message_chars: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_profiles_per_user: 10,
            max_message_chars: 4000,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
