//! Profile creation and update request models.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{DEFAULT_AVATAR, Personality, Profile, ProfileCategory, ProfileUsage};
use crate::error::{AllkiError, Result};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const SYSTEM_PROMPT_MIN_CHARS: usize = 20;
pub const MAX_TAGS: usize = 10;

/// Request to create a new profile.
///
/// Used by both template selection and interview completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// Display name (2-50 chars)
    pub name: String,
    /// Description (10-200 chars)
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub category: ProfileCategory,
    pub personality: Personality,
    /// Base instructions (at least 20 chars)
    pub system_prompt: String,
}

impl CreateProfileRequest {
    /// Validate the request and return the first violated rule.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_tags("expertise", &self.personality.expertise)?;
        validate_tags("interests", &self.personality.interests)?;
        validate_system_prompt(&self.system_prompt)?;
        Ok(())
    }

    /// Convert this request into an active profile owned by `user_id`,
    /// always generating a new UUID.
    pub fn into_profile(self, user_id: impl Into<String>) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            avatar: self.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            category: self.category,
            personality: self.personality,
            system_prompt: self.system_prompt,
            usage: ProfileUsage::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of an existing profile. The category is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub personality: Option<Personality>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(personality) = &self.personality {
            validate_tags("expertise", &personality.expertise)?;
            validate_tags("interests", &personality.interests)?;
        }
        if let Some(system_prompt) = &self.system_prompt {
            validate_system_prompt(system_prompt)?;
        }
        Ok(())
    }

    /// Applies the present fields to `profile` and bumps `updated_at`.
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            profile.description = description.trim().to_string();
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = avatar;
        }
        if let Some(personality) = self.personality {
            profile.personality = personality;
        }
        if let Some(system_prompt) = self.system_prompt {
            profile.system_prompt = system_prompt;
        }
        profile.updated_at = Utc::now();
    }
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(AllkiError::validation(format!(
            "Name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    let len = description.trim().chars().count();
    if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&len) {
        return Err(AllkiError::validation(format!(
            "Description must be between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_system_prompt(system_prompt: &str) -> Result<()> {
    if system_prompt.trim().chars().count() < SYSTEM_PROMPT_MIN_CHARS {
        return Err(AllkiError::validation(format!(
            "System prompt must be at least {SYSTEM_PROMPT_MIN_CHARS} characters long"
        )));
    }
    Ok(())
}

fn validate_tags(field: &str, tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(AllkiError::validation(format!(
            "At most {MAX_TAGS} {field} entries are allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ResponseStyle, Tone};

    fn valid_request() -> CreateProfileRequest {
        CreateProfileRequest {
            name: "Code Buddy".to_string(),
            description: "Hilft bei Rust und Architekturfragen".to_string(),
            avatar: None,
            category: ProfileCategory::Developer,
            personality: Personality {
                tone: Some(Tone::Professional),
                expertise: vec!["Rust".to_string(), "Tokio".to_string()],
                interests: vec!["Performance".to_string()],
                response_style: Some(ResponseStyle::Concise),
            },
            system_prompt: "Du bist ein erfahrener Rust-Entwickler.".to_string(),
        }
    }

    #[test]
    fn test_validate_success() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_validate_short_name() {
        let mut req = valid_request();
        req.name = "X".to_string();
        assert!(req.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_validate_short_description() {
        let mut req = valid_request();
        req.description = "Kurz".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_too_many_expertise_tags() {
        let mut req = valid_request();
        req.personality.expertise = (0..11).map(|i| format!("skill-{i}")).collect();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_short_system_prompt() {
        let mut req = valid_request();
        req.system_prompt = "Sei nett.".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_into_profile_generates_uuid() {
        let profile = valid_request().into_profile("user-1");
        assert!(Uuid::parse_str(&profile.id).is_ok());
        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.avatar, DEFAULT_AVATAR);
        assert!(profile.is_active);
        assert_eq!(profile.usage, ProfileUsage::default());
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let mut profile = valid_request().into_profile("user-1");
        let update = UpdateProfileRequest {
            name: Some("Rust Buddy".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        update.apply_to(&mut profile);

        assert_eq!(profile.name, "Rust Buddy");
        assert_eq!(profile.description, "Hilft bei Rust und Architekturfragen");
    }
}
