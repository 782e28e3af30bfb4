//! Domain layer of ALL-KI.
//!
//! Profiles (personas), per-profile context memory, the message analyzer,
//! system prompt construction and the LLM collaborator contract. Storage and
//! the LLM provider are injected through the traits defined here.

pub mod analyzer;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod memory;
pub mod profile;
pub mod prompt;

pub use error::{AllkiError, Result};
