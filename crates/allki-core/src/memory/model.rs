//! Context memory domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Well-known memory keys. The vocabulary is open; these are the keys the
/// analyzer, the interview and the prompt builder agree on.
pub mod keys {
    pub const GOALS: &str = "goals";
    pub const PREFERENCES: &str = "preferences";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const CHALLENGES: &str = "challenges";
    pub const USER_INTERESTS: &str = "user_interests";
    pub const EXPERTISE: &str = "expertise";
    pub const COMMUNICATION_STYLE: &str = "communication_style";
    pub const RESPONSE_STYLE: &str = "response_style";
    pub const LAST_INTERACTION: &str = "last_interaction";
    pub const PROFILE_NAME: &str = "profile_name";
    pub const CATEGORY: &str = "category";
    pub const INTERVIEW_COMPLETED: &str = "interview_completed";
    pub const CREATION_CONTEXT: &str = "creation_context";
}

/// Confidence used when the caller does not supply one.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Provenance of a memory. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemorySource {
    Chat,
    Profile,
    UserInput,
    Interview,
}

/// A single inferred fact about the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMemory {
    pub id: String,
    pub profile_id: String,
    pub key: String,
    /// Arbitrary payload; its shape depends on `key`
    pub value: Value,
    pub source: MemorySource,
    /// In `[0, 1]`
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub is_active: bool,
}

impl ContextMemory {
    /// Creates a fresh, active memory stamped with the current time.
    pub fn new(
        profile_id: impl Into<String>,
        key: impl Into<String>,
        value: Value,
        source: MemorySource,
        confidence: f64,
    ) -> Self {
        let now = Utc::now();
        let profile_id = profile_id.into();
        let key = key.into();
        Self {
            id: memory_id(&profile_id, &key, now),
            profile_id,
            key,
            value,
            source,
            confidence: normalize_confidence(confidence),
            created_at: now,
            updated_at: now,
            last_accessed_at: now,
            is_active: true,
        }
    }

    /// Copy of this memory re-homed under `profile_id` with a fresh id.
    pub(crate) fn copied_to(&self, profile_id: &str, source: MemorySource, now: DateTime<Utc>) -> Self {
        Self {
            id: memory_id(profile_id, &self.key, now),
            profile_id: profile_id.to_string(),
            source,
            updated_at: now,
            last_accessed_at: now,
            ..self.clone()
        }
    }

    /// Human-readable fragments of the value, flattened one level.
    ///
    /// Strings render verbatim, list elements render individually and
    /// objects render as a single `key: value, ...` fragment.
    pub fn display_values(&self) -> Vec<String> {
        match &self.value {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
            other => scalar_text(other).into_iter().collect(),
        }
    }
}

/// Clamps into `[0, 1]`; non-finite input falls back to
/// [`DEFAULT_CONFIDENCE`] so stored contexts stay loadable.
pub(crate) fn normalize_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        DEFAULT_CONFIDENCE
    }
}

fn memory_id(profile_id: &str, key: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}-{}",
        profile_id,
        key,
        at.timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, v)| match v {
                    Value::String(s) => format!("{k}: {s}"),
                    other => format!("{k}: {other}"),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

/// Partial update applied by `ContextMemoryService::update_memory`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryUpdate {
    pub value: Option<Value>,
    pub confidence: Option<f64>,
    pub is_active: Option<bool>,
}

/// All memories of one profile plus interaction counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContext {
    pub profile_id: String,
    /// Insertion order, oldest first
    pub memories: Vec<ContextMemory>,
    pub last_updated: DateTime<Utc>,
    pub conversation_count: u64,
    pub total_interactions: u64,
}

impl ProfileContext {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            memories: Vec::new(),
            last_updated: Utc::now(),
            conversation_count: 0,
            total_interactions: 0,
        }
    }

    /// Active memories in insertion order.
    pub fn active_memories(&self) -> impl Iterator<Item = &ContextMemory> {
        self.memories.iter().filter(|m| m.is_active)
    }
}
