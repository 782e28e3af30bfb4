//! Structured extraction from free text.
//!
//! Unlike [`super::analyze`], these helpers return normalized values
//! (goal phrases, preference flags, skill names) rather than raw snippets.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

/// Confidence the interview and chat learners attach to extracted goals.
pub const GOAL_CONFIDENCE: f64 = 0.7;
/// Confidence attached to extracted preferences and expertise.
pub const HINT_CONFIDENCE: f64 = 0.6;

static GOAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        "ich möchte",
        "ich will",
        "mein ziel ist",
        "ich plane",
        "ich arbeite an",
        "ich lerne",
        "ich entwickle",
        "ich baue",
        "ich schreibe",
    ]
    .iter()
    .map(|lead| Regex::new(&format!(r"{lead}\s+(.+)")).expect("goal pattern is a valid regex"))
    .collect()
});

/// Skill vocabulary, in reporting order.
const EXPERTISE_VOCABULARY: &[&str] = &[
    // languages and frameworks
    "javascript",
    "python",
    "java",
    "typescript",
    "react",
    "node.js",
    "php",
    "c++",
    "go",
    "rust",
    // technologies
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "mongodb",
    "postgresql",
    "redis",
    "graphql",
    // design tools
    "figma",
    "photoshop",
    "illustrator",
    "sketch",
    "canva",
    // skills
    "marketing",
    "seo",
    "projektmanagement",
    "leadership",
    "design",
    "fotografie",
    "schreiben",
];

/// Goal phrases following a first-person intent ("ich möchte ...").
///
/// Captures run to the end of the line, are lower-cased and must be longer
/// than three characters.
pub fn extract_goals(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    GOAL_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(&lowered))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|goal| goal.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseLength {
    Short,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommunicationStyle {
    Professional,
    Casual,
    Friendly,
}

/// Answer-shape preferences mentioned in a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_length: Option<ResponseLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_style: Option<CommunicationStyle>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_examples: bool,
}

impl PreferenceHints {
    pub fn is_empty(&self) -> bool {
        self.response_length.is_none() && self.communication_style.is_none() && !self.include_examples
    }

    /// JSON object form used as a memory value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Response length, communication style and example preferences.
pub fn extract_preferences(message: &str) -> PreferenceHints {
    let lowered = message.to_lowercase();

    let response_length = if contains_any(&lowered, &["kurz", "knapp", "prägnant"]) {
        Some(ResponseLength::Short)
    } else if contains_any(&lowered, &["ausführlich", "detailliert", "genau"]) {
        Some(ResponseLength::Detailed)
    } else {
        None
    };

    let communication_style = if contains_any(&lowered, &["formal", "professionell"]) {
        Some(CommunicationStyle::Professional)
    } else if contains_any(&lowered, &["locker", "entspannt", "casual"]) {
        Some(CommunicationStyle::Casual)
    } else if contains_any(&lowered, &["freundlich", "warm"]) {
        Some(CommunicationStyle::Friendly)
    } else {
        None
    };

    PreferenceHints {
        response_length,
        communication_style,
        include_examples: contains_any(&lowered, &["beispiel", "zeig mir"]),
    }
}

/// Known skills mentioned anywhere in the message (substring match).
pub fn extract_expertise(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    EXPERTISE_VOCABULARY
        .iter()
        .filter(|skill| lowered.contains(*skill))
        .map(|skill| skill.to_string())
        .collect()
}
