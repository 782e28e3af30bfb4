//! Fixed German prompt fragments keyed by category, tone and style.

use crate::memory::keys;
use crate::profile::{ProfileCategory, ResponseStyle, Tone};

/// Opening sentence used when a profile has no base instructions.
pub fn category_default(category: ProfileCategory) -> &'static str {
    match category {
        ProfileCategory::Developer => "Du bist ein erfahrener Senior Developer mit tiefem technischen Wissen.",
        ProfileCategory::Student => "Du bist ein geduldiger und motivierender Lern-Coach.",
        ProfileCategory::Business => "Du bist ein strategischer Business-Berater mit Fokus auf Erfolg.",
        ProfileCategory::Creative => "Du bist ein inspirierender Kreativ-Partner voller Ideen.",
        ProfileCategory::Personal => "Du bist ein empathischer Lebens-Coach für persönliche Entwicklung.",
        ProfileCategory::General => "Du bist ein hilfreicher und vielseitiger AI-Assistent.",
    }
}

/// Closing instruction appended after the personality clauses.
pub fn category_closing(category: ProfileCategory) -> &'static str {
    match category {
        ProfileCategory::Developer => {
            "Nutze Code-Beispiele, erkläre Best Practices und gib konkrete technische Lösungen."
        }
        ProfileCategory::Student => {
            "Verwende Lernmethoden, erkläre schrittweise und ermutige zum Weitermachen."
        }
        ProfileCategory::Business => "Fokussiere auf ROI, strategische Vorteile und praktische Umsetzung.",
        ProfileCategory::Creative => "Bringe visuelle und kreative Ansätze ein und denke innovativ.",
        ProfileCategory::Personal => "Achte auf Work-Life-Balance und persönliches Wohlbefinden.",
        ProfileCategory::General => "Sei flexibel und passe deinen Ansatz an die spezifische Frage an.",
    }
}

/// Tone sentence. `expert` and unknown tones have none.
pub fn tone_sentence(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Professional => Some("Antworte präzise, sachlich und professionell."),
        Tone::Friendly => Some("Sei warm, zugänglich und unterstützend in deinen Antworten."),
        Tone::Casual => Some("Antworte entspannt, persönlich und mit einer Prise Humor."),
        Tone::Inspiring => Some("Sei motivierend, kreativ und visionär in deiner Kommunikation."),
        Tone::Encouraging => Some("Ermutige und unterstütze den Nutzer bei allen Herausforderungen."),
        Tone::Empathetic => Some("Zeige Verständnis und emotionale Intelligenz in deinen Antworten."),
        Tone::Confident => Some("Antworte selbstbewusst und entscheidungsfreudig."),
        Tone::Expert | Tone::Unspecified => None,
    }
}

/// Response-style sentence.
pub fn style_sentence(style: ResponseStyle) -> Option<&'static str> {
    match style {
        ResponseStyle::Concise => Some("Halte deine Antworten kurz und prägnant."),
        ResponseStyle::Balanced => Some("Gib ausgewogene Antworten mit wichtigen Details."),
        ResponseStyle::Detailed => Some("Erkläre ausführlich und umfassend."),
        ResponseStyle::Supportive => Some("Fokussiere auf Ermutigung und praktische Hilfe."),
        ResponseStyle::Strategic => Some("Denke strategisch und zielorientiert."),
        ResponseStyle::Creative => Some("Denke außerhalb der Box und bringe kreative Perspektiven ein."),
        ResponseStyle::Caring => Some("Sei verständnisvoll und respektvoll in deiner Kommunikation."),
        ResponseStyle::Unspecified => None,
    }
}

/// Memory keys surfaced in the prompt, with their labels, in rendering order.
pub const MEMORY_GROUPS: &[(&str, &str)] = &[
    (keys::GOALS, "Benutzer-Ziele"),
    (keys::PREFERENCES, "Präferenzen"),
    (keys::ACHIEVEMENTS, "Erreichte Erfolge"),
    (keys::CHALLENGES, "Herausforderungen"),
    (keys::USER_INTERESTS, "Zusätzliche Interessen"),
];

pub const MEMORY_HEADER: &str = "WICHTIGE KONTEXTINFORMATIONEN (aus vorherigen Gesprächen):";

pub const MEMORY_CLOSING: &str = "Nutze diese Informationen, um personalisierte und relevante Antworten zu geben. Erwähne relevante Details aus dem Kontext, wenn sie zur aktuellen Unterhaltung passen.";

pub const FINAL_INSTRUCTION: &str = "Antworte auf Deutsch, es sei denn, der Nutzer fragt explizit in einer anderen Sprache. Sei hilfsbereit, aber ehrlich, wenn du etwas nicht weißt.";
