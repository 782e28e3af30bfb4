//! Application layer of ALL-KI.
//!
//! Use cases that combine the core domain with injected storage and LLM
//! collaborators: profile management, chat turns and the guided interview.

pub mod chat_usecase;
pub mod interview;
pub mod profile_service;

pub use chat_usecase::{ChatReply, ChatSettings, ChatUseCase};
pub use interview::{CompletedInterview, InterviewService, InterviewSession, InterviewTurn};
pub use profile_service::{DEFAULT_MAX_PROFILES_PER_USER, ProfileService};
