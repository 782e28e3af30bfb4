//! Profile domain model.
//!
//! A profile is a persona configuration describing how the assistant should
//! behave: base instructions, tone, response style and expertise tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Default avatar for profiles created without one.
pub const DEFAULT_AVATAR: &str = "🤖";

/// Closed set of profile categories.
///
/// Unknown values deserialize to [`ProfileCategory::General`], which is also
/// the fallback row of every category-keyed lookup table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProfileCategory {
    Developer,
    Student,
    Business,
    Creative,
    Personal,
    #[serde(other)]
    General,
}

impl Default for ProfileCategory {
    fn default() -> Self {
        ProfileCategory::General
    }
}

/// Conversational tone of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tone {
    Professional,
    Casual,
    Friendly,
    Expert,
    Inspiring,
    Encouraging,
    Empathetic,
    Confident,
    /// Any value outside the known vocabulary
    #[serde(other)]
    Unspecified,
}

/// Preferred shape of the assistant's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResponseStyle {
    Concise,
    Balanced,
    Detailed,
    Supportive,
    Strategic,
    Creative,
    Caring,
    /// Any value outside the known vocabulary
    #[serde(other)]
    Unspecified,
}

/// Personality traits of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personality {
    #[serde(default)]
    pub tone: Option<Tone>,
    /// Ordered expertise tags (at most 10)
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Ordered interest tags (at most 10)
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub response_style: Option<ResponseStyle>,
}

/// Usage counters maintained by the chat use case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUsage {
    pub total_chats: u64,
    pub total_tokens: u64,
    pub last_used: Option<DateTime<Utc>>,
}

/// An AI profile (persona) owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Short description shown in listings
    pub description: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub category: ProfileCategory,
    #[serde(default)]
    pub personality: Personality,
    /// Base instructions; an empty prompt falls back to the category default
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub usage: ProfileUsage,
    /// Soft-delete flag; inactive profiles are kept for their conversations
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

fn default_true() -> bool {
    true
}

impl Profile {
    /// Base instructions if the profile carries any.
    pub fn base_prompt(&self) -> Option<&str> {
        let trimmed = self.system_prompt.trim();
        (!trimmed.is_empty()).then_some(self.system_prompt.as_str())
    }

    /// Counts one completed chat exchange.
    pub fn record_usage(&mut self, tokens: u64) {
        let now = Utc::now();
        self.usage.total_chats += 1;
        self.usage.total_tokens += tokens;
        self.usage.last_used = Some(now);
        self.updated_at = now;
    }

    /// Marks the profile inactive. Profiles are never hard-deleted.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
