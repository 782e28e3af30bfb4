//! Storage adapters and configuration loading for ALL-KI.

mod blocking;
pub mod config_loader;
pub mod file_context_store;
pub mod in_memory;
pub mod json_conversation_repository;
pub mod paths;
pub mod storage;
pub mod toml_profile_repository;

pub use crate::config_loader::load_config;
pub use crate::file_context_store::FileContextStore;
pub use crate::in_memory::{
    InMemoryContextStore, InMemoryConversationRepository, InMemoryProfileRepository,
};
pub use crate::json_conversation_repository::JsonConversationRepository;
pub use crate::paths::AllkiPaths;
pub use crate::toml_profile_repository::TomlProfileRepository;
