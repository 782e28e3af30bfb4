//! Guided profile-creation interview.
//!
//! Six questions whose answers are remembered under a temporary
//! `interview-{millis}` id, converted into a profile on completion and then
//! transferred onto the new profile's context.

mod convert;
mod service;
mod session;

pub use convert::{detect_category, detect_response_style, detect_tone, to_create_request};
pub use service::{CompletedInterview, InterviewService, InterviewTurn};
pub use session::{
    FinalAnswers, InterviewAnswers, InterviewSession, InterviewStep, MIN_ANSWERS_FOR_PROFILE,
    RecordedAnswer, TOTAL_QUESTIONS, split_expertise,
};
