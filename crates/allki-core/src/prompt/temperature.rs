//! Sampling temperature per profile.

use crate::profile::{Profile, ProfileCategory, ResponseStyle};

pub const MIN_TEMPERATURE: f64 = 0.1;
pub const MAX_TEMPERATURE: f64 = 1.0;

fn base_temperature(category: ProfileCategory) -> f64 {
    match category {
        ProfileCategory::Developer => 0.3,
        ProfileCategory::Student => 0.5,
        ProfileCategory::Business => 0.4,
        ProfileCategory::Creative => 0.8,
        ProfileCategory::Personal => 0.6,
        ProfileCategory::General => 0.5,
    }
}

fn style_delta(style: ResponseStyle) -> f64 {
    match style {
        ResponseStyle::Creative => 0.2,
        ResponseStyle::Detailed => -0.1,
        ResponseStyle::Concise => -0.2,
        _ => 0.0,
    }
}

/// Category base plus response-style adjustment, clamped to `[0.1, 1.0]`.
pub fn temperature_for(profile: &Profile) -> f64 {
    let delta = profile.personality.response_style.map(style_delta).unwrap_or(0.0);
    (base_temperature(profile.category) + delta).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Personality, ProfileUsage};
    use chrono::Utc;

    fn profile(category: ProfileCategory, style: Option<ResponseStyle>) -> Profile {
        let now = Utc::now();
        Profile {
            id: "p".into(),
            user_id: "u".into(),
            name: "Test".into(),
            description: "Profil für Tests".into(),
            avatar: "🤖".into(),
            category,
            personality: Personality {
                response_style: style,
                ..Default::default()
            },
            system_prompt: String::new(),
            usage: ProfileUsage::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_creative_creative_clamps_to_max() {
        let t = temperature_for(&profile(ProfileCategory::Creative, Some(ResponseStyle::Creative)));
        assert!(approx(t, 1.0));
    }

    #[test]
    fn test_developer_concise_clamps_to_min() {
        let t = temperature_for(&profile(ProfileCategory::Developer, Some(ResponseStyle::Concise)));
        assert!(approx(t, 0.1));
    }

    #[test]
    fn test_base_values_without_style() {
        assert!(approx(temperature_for(&profile(ProfileCategory::Business, None)), 0.4));
        assert!(approx(temperature_for(&profile(ProfileCategory::Personal, None)), 0.6));
        assert!(approx(temperature_for(&profile(ProfileCategory::General, None)), 0.5));
    }

    #[test]
    fn test_detailed_and_neutral_styles() {
        assert!(approx(
            temperature_for(&profile(ProfileCategory::Student, Some(ResponseStyle::Detailed))),
            0.4
        ));
        assert!(approx(
            temperature_for(&profile(ProfileCategory::Student, Some(ResponseStyle::Caring))),
            0.5
        ));
        assert!(approx(
            temperature_for(&profile(ProfileCategory::Student, Some(ResponseStyle::Unspecified))),
            0.5
        ));
    }

    #[test]
    fn test_always_within_bounds() {
        use strum::IntoEnumIterator;
        for category in ProfileCategory::iter() {
            for style in [ResponseStyle::Creative, ResponseStyle::Concise, ResponseStyle::Detailed] {
                let t = temperature_for(&profile(category, Some(style)));
                assert!((MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t));
            }
        }
    }
}
