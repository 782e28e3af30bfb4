//! Message analyzer.
//!
//! Scans a user message for German trigger words and proposes candidate
//! memories. Detection is deliberately shallow: a table of category patterns,
//! first match per category, and a short text window around the match.
//!
//! The deeper extractors in [`extract`] pull structured goals, preferences and
//! expertise out of free text; they are used by the interview flow.

pub mod extract;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::memory::keys;

/// Characters kept before the match start.
const SNIPPET_BEFORE: usize = 20;
/// Characters kept after the match start.
const SNIPPET_AFTER: usize = 50;

/// Category of a detected fact. Doubles as the memory key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CandidateKind {
    Goals,
    Achievements,
    Challenges,
    Preferences,
}

impl CandidateKind {
    pub fn key(self) -> &'static str {
        match self {
            Self::Goals => keys::GOALS,
            Self::Achievements => keys::ACHIEVEMENTS,
            Self::Challenges => keys::CHALLENGES,
            Self::Preferences => keys::PREFERENCES,
        }
    }
}

/// A proposed memory produced by [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMemory {
    pub kind: CandidateKind,
    /// Trimmed text window around the trigger word, in original casing
    pub value: String,
    pub confidence: f64,
}

impl CandidateMemory {
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }
}

struct Rule {
    kind: CandidateKind,
    pattern: Regex,
    confidence: f64,
}

fn rule(kind: CandidateKind, pattern: &str, confidence: f64) -> Rule {
    Rule {
        kind,
        pattern: Regex::new(pattern).expect("analyzer pattern is a valid regex"),
        confidence,
    }
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(
            CandidateKind::Goals,
            r"(will|möchte|plane|ziel|vorhaben|schaffen|erreichen|trainieren für|lernen|verbessern|entwickeln)",
            0.7,
        ),
        rule(
            CandidateKind::Achievements,
            r"(geschafft|erreicht|erfolgreich|bestanden|gewonnen|abgeschlossen|fertiggestellt)",
            0.9,
        ),
        rule(
            CandidateKind::Challenges,
            r"(problem|schwierigkeit|herausforderung|kämpfe|struggle|schwer|nicht gut|versagt|fehler)",
            0.7,
        ),
        rule(
            CandidateKind::Preferences,
            r"(mag|liebe|bevorzuge|gefällt|am liebsten|favorit)",
            0.7,
        ),
    ]
});

/// Proposes at most one candidate per category, in table order.
///
/// Matching runs on the lower-cased message; the snippet is cut from the
/// original text using the match's character position, spanning 20 characters
/// before to 50 characters after the match start.
pub fn analyze(message: &str) -> Vec<CandidateMemory> {
    let lowered = message.to_lowercase();
    let original: Vec<char> = message.chars().collect();

    RULES
        .iter()
        .filter_map(|rule| {
            let found = rule.pattern.find(&lowered)?;
            let char_index = lowered[..found.start()].chars().count();
            Some(CandidateMemory {
                kind: rule.kind,
                value: snippet(&original, char_index),
                confidence: rule.confidence,
            })
        })
        .collect()
}

fn snippet(chars: &[char], index: usize) -> String {
    let start = index.saturating_sub(SNIPPET_BEFORE).min(chars.len());
    let end = (index + SNIPPET_AFTER).min(chars.len());
    chars[start..end].iter().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_detection() {
        let candidates = analyze("Ich möchte einen Marathon laufen");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::Goals);
        assert_eq!(candidates[0].key(), "goals");
        assert_eq!(candidates[0].confidence, 0.7);
        assert_eq!(candidates[0].value, "Ich möchte einen Marathon laufen");
    }

    #[test]
    fn test_achievement_confidence() {
        let candidates = analyze("Ich habe es endlich geschafft!");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::Achievements);
        assert_eq!(candidates[0].confidence, 0.9);
    }

    #[test]
    fn test_case_insensitive_matching_keeps_original_casing() {
        let candidates = analyze("MEIN PROBLEM IST DIE ZEIT");
        let challenge = candidates
            .iter()
            .find(|c| c.kind == CandidateKind::Challenges)
            .unwrap();
        assert_eq!(challenge.value, "MEIN PROBLEM IST DIE ZEIT");
    }

    #[test]
    fn test_multiple_categories_in_table_order() {
        let candidates = analyze("Ich liebe Python, aber Rust fällt mir schwer. Ich will besser werden.");
        let kinds: Vec<_> = candidates.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CandidateKind::Goals,
                CandidateKind::Challenges,
                CandidateKind::Preferences
            ]
        );
    }

    #[test]
    fn test_only_first_match_per_category() {
        let candidates = analyze("Ich will lernen und ich plane viel");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::Goals);
    }

    #[test]
    fn test_snippet_window_is_clamped() {
        let prefix = "a".repeat(30);
        let suffix = "b".repeat(80);
        let message = format!("{prefix} mag {suffix}");
        let candidates = analyze(&message);

        assert_eq!(candidates.len(), 1);
        // match starts at char 31: window [11, 81)
        let expected: String = message.chars().skip(11).take(70).collect();
        assert_eq!(candidates[0].value, expected.trim());
        assert_eq!(candidates[0].value.chars().count(), 70);
    }

    #[test]
    fn test_snippet_with_multibyte_prefix() {
        let candidates = analyze("Äöü größte Herausforderung");
        assert_eq!(candidates[0].kind, CandidateKind::Challenges);
        assert_eq!(candidates[0].value, "Äöü größte Herausforderung");
    }

    #[test]
    fn test_substring_matches_count() {
        // "mag" inside "Magazin" still counts; detection is not word-bounded.
        let candidates = analyze("Das Magazin liegt auf dem Tisch");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::Preferences);
    }

    #[test]
    fn test_no_match() {
        assert!(analyze("Wie spät ist es?").is_empty());
        assert!(analyze("").is_empty());
    }
}
