//! Conversation domain module.
//!
//! Conversations are owned by the storage collaborator. The core only reads a
//! bounded trailing window of messages for prompt construction and appends
//! new exchanges.
//!
//! # Module Structure
//!
//! - `model`: `Conversation`, `Message`, `MessageRole` and metadata types
//! - `repository`: Repository trait for conversation persistence

mod model;
mod repository;

pub use model::{
    Conversation, ConversationMetadata, HISTORY_WINDOW, MAX_TITLE_CHARS, Message,
    MessageMetadata, MessageRole,
};
pub use repository::ConversationRepository;
