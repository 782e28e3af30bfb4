//! Turning interview answers into a profile creation request.
//!
//! Keyword detection works on the lowercased free-text answers; anything
//! unrecognized falls back to a general, friendly, detailed assistant.

use allki_core::analyzer::extract::extract_expertise;
use allki_core::profile::request::{
    DESCRIPTION_MAX_CHARS, DESCRIPTION_MIN_CHARS, MAX_TAGS, NAME_MAX_CHARS, NAME_MIN_CHARS,
};
use allki_core::profile::{CreateProfileRequest, Personality, ProfileCategory, ResponseStyle, Tone};

use super::session::InterviewAnswers;

const DEFAULT_NAME: &str = "Mein Assistent";

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Category and avatar implied by the category answer.
pub fn detect_category(answer: &str) -> (ProfileCategory, &'static str) {
    let text = answer.to_lowercase();
    if contains_any(&text, &["sport", "lauf", "fitness", "training"]) {
        (ProfileCategory::Personal, "🏃‍♂️")
    } else if contains_any(&text, &["code", "programming", "entwickl", "javascript", "python"]) {
        (ProfileCategory::Developer, "👨‍💻")
    } else if contains_any(&text, &["learn", "stud", "math", "sprach"]) {
        (ProfileCategory::Student, "🎓")
    } else if contains_any(&text, &["business", "marketing", "verkauf"]) {
        (ProfileCategory::Business, "💼")
    } else if contains_any(&text, &["design", "kunst", "kreativ"]) {
        (ProfileCategory::Creative, "🎨")
    } else {
        (ProfileCategory::General, "🤖")
    }
}

pub fn detect_tone(answer: &str) -> Tone {
    let text = answer.to_lowercase();
    if contains_any(&text, &["motivier", "anfeur"]) {
        Tone::Friendly
    } else if contains_any(&text, &["ruhig", "sachlich"]) {
        Tone::Professional
    } else if contains_any(&text, &["locker", "entspannt"]) {
        Tone::Casual
    } else if contains_any(&text, &["technisch", "präzise", "expert"]) {
        Tone::Expert
    } else {
        Tone::Friendly
    }
}

pub fn detect_response_style(answer: &str) -> ResponseStyle {
    let text = answer.to_lowercase();
    if contains_any(&text, &["kurz", "direkt", "knapp"]) {
        ResponseStyle::Concise
    } else if contains_any(&text, &["ausführlich", "detail", "erklär"]) {
        ResponseStyle::Detailed
    } else if contains_any(&text, &["kreativ", "inspirier"]) {
        ResponseStyle::Creative
    } else {
        ResponseStyle::Detailed
    }
}

fn derive_expertise(answers: &InterviewAnswers, category_answer: &str) -> Vec<String> {
    let text = category_answer.to_lowercase();
    let expertise = if text.contains("lauf") {
        tags(&["Laufen", "Ausdauertraining", "Motivation", "Trainingspläne"])
    } else if contains_any(&text, &["sport", "fitness"]) {
        tags(&["Fitness", "Training", "Ernährung", "Motivation"])
    } else if text.contains("javascript") {
        tags(&["JavaScript", "Web Development", "Frontend", "React"])
    } else if text.contains("python") {
        tags(&["Python", "Data Science", "Backend", "Automation"])
    } else if contains_any(&text, &["programming", "code"]) {
        tags(&["Programming", "Software Development", "Problem Solving", "Debugging"])
    } else if !answers.expertise.is_empty() {
        answers.expertise.clone()
    } else {
        let mentioned = extract_expertise(&format!(
            "{} {}",
            category_answer,
            answers.goals.as_deref().unwrap_or_default()
        ));
        if mentioned.is_empty() {
            vec![category_answer.to_string()]
        } else {
            mentioned
        }
    };
    expertise.into_iter().take(MAX_TAGS).collect()
}

fn derive_interests(goals: &str) -> Vec<String> {
    let text = goals.to_lowercase();
    if contains_any(&text, &["marathon", "wettkampf"]) {
        tags(&["Wettkampf", "Leistung", "Ausdauer", "Disziplin"])
    } else if contains_any(&text, &["abnehm", "gesund"]) {
        tags(&["Gesundheit", "Ernährung", "Lifestyle", "Wohlbefinden"])
    } else if contains_any(&text, &["app", "projekt"]) {
        tags(&["Innovation", "Projekte", "Technologie", "Problemlösung"])
    } else {
        tags(&["Lernen", "Verbesserung", "Effizienz", "Erfolg"])
    }
}

fn tone_phrase(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "professioneller und sachlicher",
        Tone::Casual => "lockerer und entspannter",
        Tone::Expert => "technisch präziser",
        _ => "freundlicher und motivierender",
    }
}

fn style_phrase(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Concise => "Kurz und direkt",
        ResponseStyle::Creative => "Kreativ und inspirierend",
        _ => "Ausführlich und erklärend",
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect::<String>().trim().to_string()
}

fn profile_name(answer: &str) -> String {
    let name = truncate(answer.trim(), NAME_MAX_CHARS);
    if name.chars().count() < NAME_MIN_CHARS {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

fn description(goals: Option<&str>, category: &str) -> String {
    if let Some(goals) = goals.map(str::trim) {
        if goals.chars().count() >= DESCRIPTION_MIN_CHARS {
            return truncate(goals, DESCRIPTION_MAX_CHARS);
        }
    }
    truncate(
        &format!("Ein personalisierter Assistent für {category}"),
        DESCRIPTION_MAX_CHARS,
    )
}

/// Builds a request that always passes profile validation.
pub fn to_create_request(answers: &InterviewAnswers) -> CreateProfileRequest {
    let finals = answers.finalized();
    let (category, avatar) = detect_category(&finals.category);
    let tone = detect_tone(&finals.tone);
    let response_style = detect_response_style(&finals.response_style);
    let expertise = derive_expertise(answers, &finals.category);
    let interests = derive_interests(&finals.goals);
    let name = profile_name(&finals.name);

    let system_prompt = format!(
        "Du bist {name}, ein {tone_text} Assistent für {category_answer}.\n\n\
         Deine Expertise: {expertise}\n\
         Benutzer-Ziele: {goals}\n\
         Kommunikationsstil: {style_answer}\n\
         Antwort-Stil: {style_text}\n\n\
         Antworte immer im Kontext dieser Informationen und erinnere dich an die Präferenzen des Benutzers.",
        tone_text = tone_phrase(tone),
        category_answer = finals.category,
        expertise = expertise.join(", "),
        goals = finals.goals,
        style_answer = finals.tone.to_lowercase(),
        style_text = style_phrase(response_style),
    );

    CreateProfileRequest {
        description: description(answers.goals.as_deref(), answers.category.as_deref().unwrap_or("verschiedene Bereiche")),
        name,
        avatar: Some(avatar.to_string()),
        category,
        personality: Personality {
            tone: Some(tone),
            expertise,
            interests,
            response_style: Some(response_style),
        },
        system_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> InterviewAnswers {
        InterviewAnswers {
            name: Some("Coach Max".into()),
            category: Some("Laufen und Fitness".into()),
            tone: Some("motivierend anfeuern".into()),
            goals: Some("Ich will einen Marathon unter 4 Stunden laufen".into()),
            response_style: Some("kurz und direkt".into()),
            expertise: vec!["Intervalle".into(), "Ernährung".into()],
        }
    }

    #[test]
    fn test_category_detection() {
        assert_eq!(detect_category("Lauftraining"), (ProfileCategory::Personal, "🏃‍♂️"));
        assert_eq!(detect_category("Python Skripte").0, ProfileCategory::Developer);
        assert_eq!(detect_category("Mathe studieren").0, ProfileCategory::Student);
        assert_eq!(detect_category("Online Marketing").0, ProfileCategory::Business);
        assert_eq!(detect_category("Kunst und Malerei").0, ProfileCategory::Creative);
        assert_eq!(detect_category("Kochen"), (ProfileCategory::General, "🤖"));
    }

    #[test]
    fn test_tone_and_style_detection() {
        assert_eq!(detect_tone("ruhig beraten"), Tone::Professional);
        assert_eq!(detect_tone("eher locker"), Tone::Casual);
        assert_eq!(detect_tone("technisch-präzise"), Tone::Expert);
        assert_eq!(detect_tone("egal"), Tone::Friendly);
        assert_eq!(detect_response_style("knapp bitte"), ResponseStyle::Concise);
        assert_eq!(detect_response_style("kreativ"), ResponseStyle::Creative);
        assert_eq!(detect_response_style("ausgewogen"), ResponseStyle::Detailed);
    }

    #[test]
    fn test_runner_profile() {
        let request = to_create_request(&runner());
        assert!(request.validate().is_ok());
        assert_eq!(request.category, ProfileCategory::Personal);
        assert_eq!(request.avatar.as_deref(), Some("🏃‍♂️"));
        assert_eq!(request.personality.tone, Some(Tone::Friendly));
        assert_eq!(request.personality.response_style, Some(ResponseStyle::Concise));
        assert_eq!(
            request.personality.expertise,
            vec!["Laufen", "Ausdauertraining", "Motivation", "Trainingspläne"]
        );
        assert_eq!(
            request.personality.interests,
            vec!["Wettkampf", "Leistung", "Ausdauer", "Disziplin"]
        );
        assert_eq!(request.description, "Ich will einen Marathon unter 4 Stunden laufen");
        assert!(request.system_prompt.starts_with(
            "Du bist Coach Max, ein freundlicher und motivierender Assistent für Laufen und Fitness.\n\n"
        ));
        assert!(request.system_prompt.contains("Antwort-Stil: Kurz und direkt\n"));
    }

    #[test]
    fn test_answered_expertise_used_for_unknown_category() {
        let answers = InterviewAnswers {
            category: Some("Kochen".into()),
            ..runner()
        };
        assert_eq!(to_create_request(&answers).personality.expertise, vec!["Intervalle", "Ernährung"]);
    }

    #[test]
    fn test_sparse_answers_still_validate() {
        let answers = InterviewAnswers {
            name: Some("X".into()),
            category: Some("Kochen".into()),
            ..Default::default()
        };
        let request = to_create_request(&answers);
        assert!(request.validate().is_ok());
        assert_eq!(request.name, "Mein Assistent");
        assert_eq!(request.description, "Ein personalisierter Assistent für Kochen");
        assert_eq!(request.personality.interests, vec!["Lernen", "Verbesserung", "Effizienz", "Erfolg"]);
    }

    #[test]
    fn test_expertise_falls_back_to_mentioned_topics() {
        let answers = InterviewAnswers {
            name: Some("Pixel".into()),
            category: Some("Fotografie".into()),
            goals: Some("Bessere Fotografie lernen".into()),
            ..Default::default()
        };
        let expertise = to_create_request(&answers).personality.expertise;
        assert!(!expertise.is_empty());
    }

    #[test]
    fn test_long_goals_are_truncated() {
        let answers = InterviewAnswers {
            goals: Some("a".repeat(260)),
            ..runner()
        };
        let request = to_create_request(&answers);
        assert_eq!(request.description.chars().count(), DESCRIPTION_MAX_CHARS);
        assert!(request.validate().is_ok());
    }
}
