//! System prompt assembly.

use super::tables::{
    FINAL_INSTRUCTION, MEMORY_CLOSING, MEMORY_GROUPS, MEMORY_HEADER, category_closing,
    category_default, style_sentence, tone_sentence,
};
use crate::memory::ContextMemory;
use crate::profile::Profile;

/// Builds the system prompt for `profile` from its persona attributes and
/// the given memories.
///
/// Order: base instructions (or the category default), tone sentence, style
/// sentence, expertise clause, interests clause, category closing, memory
/// block, final language instruction. Inactive memories are ignored; memory
/// keys outside the known groups are not rendered.
pub fn build_system_prompt(profile: &Profile, memories: &[ContextMemory]) -> String {
    let mut prompt = profile
        .base_prompt()
        .unwrap_or_else(|| category_default(profile.category))
        .to_string();

    let personality = &profile.personality;
    if let Some(sentence) = personality.tone.and_then(tone_sentence) {
        append_sentence(&mut prompt, sentence);
    }
    if let Some(sentence) = personality.response_style.and_then(style_sentence) {
        append_sentence(&mut prompt, sentence);
    }
    if !personality.expertise.is_empty() {
        append_sentence(
            &mut prompt,
            &format!("Du hast besondere Expertise in: {}.", personality.expertise.join(", ")),
        );
    }
    if !personality.interests.is_empty() {
        append_sentence(
            &mut prompt,
            &format!("Deine Interessensgebiete umfassen: {}.", personality.interests.join(", ")),
        );
    }
    append_sentence(&mut prompt, category_closing(profile.category));

    let active: Vec<&ContextMemory> = memories.iter().filter(|m| m.is_active).collect();
    if !active.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(MEMORY_HEADER);
        prompt.push('\n');
        for (key, label) in MEMORY_GROUPS {
            let values: Vec<String> = active
                .iter()
                .filter(|m| m.key == *key)
                .flat_map(|m| m.display_values())
                .collect();
            if !values.is_empty() {
                prompt.push_str(&format!("- {label}: {}\n", values.join(", ")));
            }
        }
        prompt.push('\n');
        prompt.push_str(MEMORY_CLOSING);
    }

    prompt.push_str("\n\n");
    prompt.push_str(FINAL_INSTRUCTION);
    prompt
}

fn append_sentence(prompt: &mut String, sentence: &str) {
    prompt.push(' ');
    prompt.push_str(sentence);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, keys};
    use crate::profile::{
        Personality, ProfileCategory, ProfileUsage, ResponseStyle, Tone, DEFAULT_AVATAR,
    };
    use chrono::Utc;
    use serde_json::json;

    fn profile(category: ProfileCategory, tone: Option<Tone>, style: Option<ResponseStyle>) -> Profile {
        let now = Utc::now();
        Profile {
            id: "p1".into(),
            user_id: "u1".into(),
            name: "Test".into(),
            description: "Profil für Tests".into(),
            avatar: DEFAULT_AVATAR.into(),
            category,
            personality: Personality {
                tone,
                expertise: Vec::new(),
                interests: Vec::new(),
                response_style: style,
            },
            system_prompt: String::new(),
            usage: ProfileUsage::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn memory(key: &str, value: serde_json::Value) -> ContextMemory {
        ContextMemory::new("p1", key, value, MemorySource::Chat, 0.7)
    }

    #[test]
    fn test_developer_professional_concise_without_memories() {
        let p = profile(
            ProfileCategory::Developer,
            Some(Tone::Professional),
            Some(ResponseStyle::Concise),
        );
        let prompt = build_system_prompt(&p, &[]);

        assert_eq!(
            prompt,
            "Du bist ein erfahrener Senior Developer mit tiefem technischen Wissen. \
             Antworte präzise, sachlich und professionell. \
             Halte deine Antworten kurz und prägnant. \
             Nutze Code-Beispiele, erkläre Best Practices und gib konkrete technische Lösungen.\
             \n\nAntworte auf Deutsch, es sei denn, der Nutzer fragt explizit in einer anderen Sprache. \
             Sei hilfsbereit, aber ehrlich, wenn du etwas nicht weißt."
        );
        assert!(!prompt.contains("KONTEXTINFORMATIONEN"));
    }

    #[test]
    fn test_base_prompt_replaces_category_default() {
        let mut p = profile(ProfileCategory::Student, None, None);
        p.system_prompt = "Du bist mein Mathe-Tutor.".into();
        let prompt = build_system_prompt(&p, &[]);

        assert!(prompt.starts_with("Du bist mein Mathe-Tutor. Verwende Lernmethoden"));
        assert!(!prompt.contains("Lern-Coach"));
    }

    #[test]
    fn test_unknown_tone_and_expert_are_skipped() {
        let p = profile(ProfileCategory::General, Some(Tone::Expert), Some(ResponseStyle::Unspecified));
        let prompt = build_system_prompt(&p, &[]);
        assert!(prompt.starts_with(
            "Du bist ein hilfreicher und vielseitiger AI-Assistent. Sei flexibel und passe"
        ));
    }

    #[test]
    fn test_expertise_and_interests_clauses() {
        let mut p = profile(ProfileCategory::Creative, Some(Tone::Inspiring), None);
        p.personality.expertise = vec!["Figma".into(), "Fotografie".into()];
        p.personality.interests = vec!["Kunst".into()];
        let prompt = build_system_prompt(&p, &[]);

        assert!(prompt.contains(
            " Du hast besondere Expertise in: Figma, Fotografie. Deine Interessensgebiete umfassen: Kunst. Bringe visuelle"
        ));
    }

    #[test]
    fn test_goals_memory_block() {
        let p = profile(ProfileCategory::Personal, None, None);
        let memories = vec![
            memory(keys::GOALS, json!(["Marathon laufen", "Früher aufstehen"])),
            memory(keys::GOALS, json!("10 kg abnehmen")),
            memory(keys::ACHIEVEMENTS, json!("Halbmarathon geschafft")),
            memory("last_interaction", json!({"userMessage": "hi"})),
        ];
        let prompt = build_system_prompt(&p, &memories);

        assert!(prompt.contains(
            "\n\nWICHTIGE KONTEXTINFORMATIONEN (aus vorherigen Gesprächen):\n\
             - Benutzer-Ziele: Marathon laufen, Früher aufstehen, 10 kg abnehmen\n\
             - Erreichte Erfolge: Halbmarathon geschafft\n\
             \nNutze diese Informationen"
        ));
        assert!(!prompt.contains("userMessage"));
        assert!(prompt.ends_with("wenn du etwas nicht weißt."));
    }

    #[test]
    fn test_preferences_object_renders_pairs() {
        let p = profile(ProfileCategory::General, None, None);
        let memories = vec![memory(keys::PREFERENCES, json!({"responseLength": "short"}))];
        let prompt = build_system_prompt(&p, &memories);
        assert!(prompt.contains("- Präferenzen: responseLength: short\n"));
    }

    #[test]
    fn test_only_unknown_keys_still_emit_block_frame() {
        let p = profile(ProfileCategory::General, None, None);
        let memories = vec![memory("favorite_color", json!("blau"))];
        let prompt = build_system_prompt(&p, &memories);

        assert!(prompt.contains("(aus vorherigen Gesprächen):\n\nNutze diese Informationen"));
        assert!(!prompt.contains("blau"));
    }

    #[test]
    fn test_inactive_memories_are_ignored() {
        let p = profile(ProfileCategory::General, None, None);
        let mut hidden = memory(keys::GOALS, json!("geheim"));
        hidden.is_active = false;
        let prompt = build_system_prompt(&p, &[hidden]);
        assert!(!prompt.contains("KONTEXTINFORMATIONEN"));
    }

    #[test]
    fn test_deterministic() {
        let p = profile(ProfileCategory::Business, Some(Tone::Confident), Some(ResponseStyle::Strategic));
        let memories = vec![memory(keys::CHALLENGES, json!("Zeitmanagement"))];
        assert_eq!(build_system_prompt(&p, &memories), build_system_prompt(&p, &memories));
    }
}
