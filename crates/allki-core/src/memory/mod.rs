//! Per-profile context memory.
//!
//! Memories are small inferred facts about the user (goals, preferences,
//! achievements, ...) stored per profile and fed back into the system prompt.
//!
//! # Module Structure
//!
//! - `model`: `ContextMemory`, `ProfileContext` and the well-known keys
//! - `store`: `ContextStore` persistence trait and an in-memory store
//! - `service`: lifecycle rules (supersession, cap, summary)
//! - `transfer`: copying memories between profiles

mod model;
mod service;
mod store;
mod transfer;

pub use model::{
    ContextMemory, DEFAULT_CONFIDENCE, MemorySource, MemoryUpdate, ProfileContext, keys,
};
pub use service::{ContextMemoryService, MAX_MEMORIES_PER_PROFILE};
pub use store::{ContextStore, InMemoryContextStore};
