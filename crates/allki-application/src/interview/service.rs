use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use allki_core::memory::{ContextMemoryService, MemorySource, keys};
use allki_core::profile::Profile;
use allki_core::{AllkiError, Result};

use super::convert::to_create_request;
use super::session::InterviewSession;
use crate::profile_service::ProfileService;

/// What the user sees after answering a question.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewTurn {
    /// Next question, `None` once all questions are answered
    pub next_question: Option<String>,
    /// Recap, present once all questions are answered
    pub summary: Option<String>,
    pub can_create_profile: bool,
    pub progress: u8,
}

#[derive(Debug, Clone)]
pub struct CompletedInterview {
    pub profile: Profile,
    /// Memories copied from the interview onto the profile
    pub transferred: usize,
}

/// Drives a guided interview and turns it into a profile.
pub struct InterviewService {
    profiles: Arc<ProfileService>,
    memory: Arc<ContextMemoryService>,
}

impl InterviewService {
    pub fn new(profiles: Arc<ProfileService>, memory: Arc<ContextMemoryService>) -> Self {
        Self { profiles, memory }
    }

    pub fn start(&self) -> InterviewSession {
        let session = InterviewSession::new();
        info!(session_id = session.id(), "Interview started");
        session
    }

    /// Records the answer as an interview memory under the session id.
    pub async fn answer(&self, session: &mut InterviewSession, answer: &str) -> Result<InterviewTurn> {
        let recorded = session.record_answer(answer)?;
        self.memory
            .add_memory(
                session.id(),
                recorded.key(),
                recorded.value.clone(),
                MemorySource::Interview,
                Some(recorded.confidence()),
            )
            .await?;

        let complete = session.is_complete();
        Ok(InterviewTurn {
            next_question: (!complete).then(|| session.current_question()),
            summary: complete.then(|| session.summary()),
            can_create_profile: session.can_create_profile(),
            progress: session.progress(),
        })
    }

    /// Creates the profile for `user_id` and moves the interview memories onto it.
    pub async fn complete(&self, session: &InterviewSession, user_id: &str) -> Result<CompletedInterview> {
        if !session.can_create_profile() {
            return Err(AllkiError::validation(
                "Name, category and at least three answers are required",
            ));
        }

        let finals = session.answers().finalized();
        self.memory
            .add_memory(
                session.id(),
                keys::INTERVIEW_COMPLETED,
                json!({
                    "name": finals.name,
                    "category": finals.category,
                    "tone": finals.tone,
                    "goals": finals.goals,
                    "responseStyle": finals.response_style,
                    "expertise": finals.expertise,
                    "completedAt": Utc::now().to_rfc3339(),
                }),
                MemorySource::Interview,
                Some(1.0),
            )
            .await?;

        let profile = self
            .profiles
            .create(user_id, to_create_request(session.answers()))
            .await?;

        let transferred = self
            .memory
            .transfer_memories_to_profile(session.id(), &profile.id)
            .await?;

        self.memory
            .add_memory(
                &profile.id,
                keys::CREATION_CONTEXT,
                json!({
                    "createdVia": "ai-interview",
                    "timestamp": Utc::now().to_rfc3339(),
                    "initialGoals": session.answers().goals,
                    "expectedUse": "Als personalisierter Assistent basierend auf Interview-Antworten",
                }),
                MemorySource::Profile,
                Some(1.0),
            )
            .await?;

        info!(
            session_id = session.id(),
            profile_id = %profile.id,
            transferred,
            "Interview completed"
        );
        Ok(CompletedInterview { profile, transferred })
    }
}
