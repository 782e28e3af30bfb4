//! Interview session state: the six questions and the collected answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use allki_core::memory::keys;
use allki_core::{AllkiError, Result};

pub const TOTAL_QUESTIONS: usize = 6;

/// Answers needed before a profile may be created early.
pub const MIN_ANSWERS_FOR_PROFILE: usize = 3;

const NAME_PLACEHOLDER: &str = "dein Assistent";
const FALLBACK_QUESTION: &str = "Erzähl mir mehr über deine Bedürfnisse!";

/// The questions in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStep {
    Name,
    Category,
    Tone,
    Goals,
    ResponseStyle,
    Expertise,
}

impl InterviewStep {
    const ORDER: [InterviewStep; TOTAL_QUESTIONS] = [
        InterviewStep::Name,
        InterviewStep::Category,
        InterviewStep::Tone,
        InterviewStep::Goals,
        InterviewStep::ResponseStyle,
        InterviewStep::Expertise,
    ];

    pub fn nth(index: usize) -> Option<Self> {
        Self::ORDER.get(index).copied()
    }

    /// Memory key the answer is recorded under.
    pub fn memory_key(self) -> &'static str {
        match self {
            InterviewStep::Name => keys::PROFILE_NAME,
            InterviewStep::Category => keys::CATEGORY,
            InterviewStep::Tone => keys::COMMUNICATION_STYLE,
            InterviewStep::Goals => keys::GOALS,
            InterviewStep::ResponseStyle => keys::RESPONSE_STYLE,
            InterviewStep::Expertise => keys::EXPERTISE,
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            InterviewStep::Name => 1.0,
            _ => 0.9,
        }
    }
}

/// Raw answers, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnswers {
    pub name: Option<String>,
    pub category: Option<String>,
    pub tone: Option<String>,
    pub goals: Option<String>,
    pub response_style: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
}

/// Answers with every gap filled, as handed to profile conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAnswers {
    pub name: String,
    pub category: String,
    pub tone: String,
    pub goals: String,
    pub response_style: String,
    pub expertise: Vec<String>,
}

impl InterviewAnswers {
    pub fn finalized(&self) -> FinalAnswers {
        let or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        FinalAnswers {
            name: or(&self.name, "Mein Assistent"),
            category: or(&self.category, "Allgemein"),
            tone: or(&self.tone, "freundlich"),
            goals: or(&self.goals, "Hilfe und Unterstützung"),
            response_style: or(&self.response_style, "ausgewogen"),
            expertise: if self.expertise.is_empty() {
                vec!["Allgemeinwissen".to_string()]
            } else {
                self.expertise.clone()
            },
        }
    }
}

/// What an answer contributes to the session's context memory.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAnswer {
    pub step: InterviewStep,
    pub value: Value,
}

impl RecordedAnswer {
    pub fn key(&self) -> &'static str {
        self.step.memory_key()
    }

    pub fn confidence(&self) -> f64 {
        self.step.confidence()
    }
}

/// One guided interview. Memories are recorded under [`InterviewSession::id`]
/// until the profile exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    id: String,
    answers: InterviewAnswers,
    answered: usize,
    started_at: DateTime<Utc>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        let started_at = Utc::now();
        Self {
            id: format!("interview-{}", started_at.timestamp_millis()),
            answers: InterviewAnswers::default(),
            answered: 0,
            started_at,
        }
    }

    /// Temporary profile id the answers are remembered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn answers(&self) -> &InterviewAnswers {
        &self.answers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn current_step(&self) -> Option<InterviewStep> {
        InterviewStep::nth(self.answered)
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= TOTAL_QUESTIONS
    }

    /// Number of the question on screen, 1-based, capped at the last one.
    pub fn question_number(&self) -> usize {
        (self.answered + 1).min(TOTAL_QUESTIONS)
    }

    /// Rounded percentage shown in the progress bar.
    pub fn progress(&self) -> u8 {
        let ratio = self.question_number() as f64 / TOTAL_QUESTIONS as f64;
        (ratio.min(1.0) * 100.0).round() as u8
    }

    pub fn can_create_profile(&self) -> bool {
        self.answered >= MIN_ANSWERS_FOR_PROFILE
            && self.answers.name.is_some()
            && self.answers.category.is_some()
    }

    /// Text of the question awaiting an answer. Wording adapts to the
    /// name and category given so far.
    pub fn current_question(&self) -> String {
        let name = self.answers.name.as_deref().unwrap_or(NAME_PLACEHOLDER);
        match self.current_step() {
            Some(InterviewStep::Name) => "Hi! 👋 Wie soll dein AI-Assistent heißen?".to_string(),
            Some(InterviewStep::Category) => {
                let lower = name.to_lowercase();
                if lower.contains("sport") || lower.contains("fit") {
                    format!("{name} für Sport! Welche Sportart oder Fitness-Ziele hast du? (z.B. Laufen, Krafttraining, Yoga)")
                } else if lower.contains("dev") || lower.contains("code") {
                    format!("{name} für Entwicklung! Welche Programmiersprachen oder Technologien interessieren dich?")
                } else if lower.contains("learn") || lower.contains("study") {
                    format!("{name} als Lern-Buddy! Was möchtest du lernen oder in welchem Bereich brauchst du Hilfe?")
                } else {
                    format!("{name} ist ein schöner Name! In welchem Bereich soll er dir hauptsächlich helfen?")
                }
            }
            Some(InterviewStep::Tone) => {
                let category = self.answers.category.as_deref().unwrap_or_default().to_lowercase();
                if ["sport", "lauf", "fitness"].iter().any(|k| category.contains(k)) {
                    format!("Perfekt! Soll {name} dich motivierend anfeuern oder eher ruhig und sachlich beraten?")
                } else if ["programming", "code", "entwickl"].iter().any(|k| category.contains(k)) {
                    format!("Super! Soll {name} technisch-präzise antworten oder eher locker und erklärend?")
                } else {
                    format!("Wie soll {name} mit dir kommunizieren? Eher freundlich-motivierend oder sachlich-professionell?")
                }
            }
            Some(InterviewStep::Goals) => {
                format!("Was ist dein Hauptziel mit {name}? Was möchtest du konkret erreichen oder verbessern?")
            }
            Some(InterviewStep::ResponseStyle) => {
                format!("Fast fertig! Soll {name} dir lieber kurze, direkte Antworten geben oder ausführlich erklären?")
            }
            Some(InterviewStep::Expertise) => {
                "Noch eine letzte Frage: Welche spezifischen Themen oder Fähigkeiten sind dir besonders wichtig?".to_string()
            }
            None => FALLBACK_QUESTION.to_string(),
        }
    }

    /// Stores the answer to the current question and advances.
    ///
    /// Blank answers and answers after the last question are rejected.
    pub fn record_answer(&mut self, answer: &str) -> Result<RecordedAnswer> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AllkiError::validation("Answer must not be empty"));
        }
        let step = self
            .current_step()
            .ok_or_else(|| AllkiError::validation("Interview already answered completely"))?;

        let text = answer.to_string();
        let value = match step {
            InterviewStep::Name => {
                self.answers.name = Some(text.clone());
                json!(text)
            }
            InterviewStep::Category => {
                self.answers.category = Some(text.clone());
                json!(text)
            }
            InterviewStep::Tone => {
                self.answers.tone = Some(text.clone());
                json!(text)
            }
            InterviewStep::Goals => {
                self.answers.goals = Some(text.clone());
                json!([text])
            }
            InterviewStep::ResponseStyle => {
                self.answers.response_style = Some(text.clone());
                json!(text)
            }
            InterviewStep::Expertise => {
                let items = split_expertise(answer);
                self.answers.expertise = items.clone();
                json!(items)
            }
        };

        self.answered += 1;
        Ok(RecordedAnswer { step, value })
    }

    /// Recap shown after the last answer.
    pub fn summary(&self) -> String {
        let a = self.answers.finalized();
        format!(
            "Perfekt! 🎉 {name} ist bereit!\n\n**Dein personalisierter Assistent:**\n• **Name:** {name}\n• **Bereich:** {category}\n• **Stil:** {tone}\n• **Expertise:** {expertise}\n• **Ziele:** {goals}\n• **Antwort-Stil:** {style}\n\nBereit zum Erstellen?",
            name = a.name,
            category = a.category,
            tone = a.tone,
            expertise = a.expertise.join(", "),
            goals = a.goals,
            style = a.response_style,
        )
    }
}

/// Splits a free-text list on commas, newlines, bullets, dashes and asterisks.
pub fn split_expertise(answer: &str) -> Vec<String> {
    answer
        .split([',', '\n', '•', '·', '-', '*'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(answers: &[&str]) -> InterviewSession {
        let mut session = InterviewSession::new();
        for answer in answers {
            session.record_answer(answer).unwrap();
        }
        session
    }

    #[test]
    fn test_session_id_is_temporary_interview_id() {
        let session = InterviewSession::new();
        assert!(session.id().starts_with("interview-"));
        assert_eq!(session.current_step(), Some(InterviewStep::Name));
        assert_eq!(session.current_question(), "Hi! 👋 Wie soll dein AI-Assistent heißen?");
    }

    #[test]
    fn test_questions_adapt_to_name_and_category() {
        let session = answered(&["FitBot"]);
        assert!(session.current_question().starts_with("FitBot für Sport!"));

        let session = answered(&["Luna"]);
        assert_eq!(
            session.current_question(),
            "Luna ist ein schöner Name! In welchem Bereich soll er dir hauptsächlich helfen?"
        );

        let session = answered(&["Luna", "Lauftraining für den Halbmarathon"]);
        assert!(session.current_question().starts_with("Perfekt! Soll Luna dich motivierend"));

        let session = answered(&["Luna", "Rust Programming"]);
        assert!(session.current_question().starts_with("Super! Soll Luna technisch-präzise"));
    }

    #[test]
    fn test_answers_map_to_memory_values() {
        let mut session = InterviewSession::new();
        let name = session.record_answer("  Coach Max ").unwrap();
        assert_eq!(name.key(), keys::PROFILE_NAME);
        assert_eq!(name.confidence(), 1.0);
        assert_eq!(name.value, json!("Coach Max"));

        session.record_answer("Laufen").unwrap();
        session.record_answer("motivierend").unwrap();
        let goals = session.record_answer("Marathon unter 4 Stunden").unwrap();
        assert_eq!(goals.key(), keys::GOALS);
        assert_eq!(goals.value, json!(["Marathon unter 4 Stunden"]));
        assert_eq!(goals.confidence(), 0.9);

        session.record_answer("kurz").unwrap();
        let expertise = session.record_answer("Intervalle, Ernährung\n• Regeneration").unwrap();
        assert_eq!(expertise.key(), keys::EXPERTISE);
        assert_eq!(expertise.value, json!(["Intervalle", "Ernährung", "Regeneration"]));
        assert!(session.is_complete());
    }

    #[test]
    fn test_blank_and_surplus_answers_are_rejected() {
        let mut session = InterviewSession::new();
        assert!(session.record_answer("   ").unwrap_err().is_validation());
        assert_eq!(session.answered(), 0);

        let mut session = answered(&["a", "b", "c", "d", "e", "f"]);
        assert!(session.record_answer("g").is_err());
        assert_eq!(session.current_question(), FALLBACK_QUESTION);
    }

    #[test]
    fn test_can_create_after_three_answers() {
        assert!(!answered(&["Luna", "Design"]).can_create_profile());
        assert!(answered(&["Luna", "Design", "locker"]).can_create_profile());
    }

    #[test]
    fn test_progress() {
        assert_eq!(InterviewSession::new().progress(), 17);
        assert_eq!(answered(&["a", "b"]).progress(), 50);
        assert_eq!(answered(&["a", "b", "c", "d", "e", "f"]).progress(), 100);
    }

    #[test]
    fn test_split_expertise_splits_on_dashes_too() {
        assert_eq!(split_expertise("E-Commerce * SEO"), vec!["E", "Commerce", "SEO"]);
        assert!(split_expertise(" , - ").is_empty());
    }

    #[test]
    fn test_finalized_fills_defaults() {
        let final_answers = answered(&["Luna", "Design", "locker"]).answers().finalized();
        assert_eq!(final_answers.goals, "Hilfe und Unterstützung");
        assert_eq!(final_answers.response_style, "ausgewogen");
        assert_eq!(final_answers.expertise, vec!["Allgemeinwissen"]);
        assert_eq!(final_answers.tone, "locker");
    }

    #[test]
    fn test_summary() {
        let summary = answered(&["Luna", "Design", "locker"]).summary();
        assert!(summary.starts_with("Perfekt! 🎉 Luna ist bereit!"));
        assert!(summary.contains("• **Expertise:** Allgemeinwissen"));
        assert!(summary.ends_with("Bereit zum Erstellen?"));
    }
}
