//! Conversation repository trait.

use async_trait::async_trait;

use super::model::Conversation;
use crate::error::Result;

/// An abstract repository for conversation persistence.
///
/// Decouples the chat use case from the concrete document store.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Finds a conversation by its ID.
    ///
    /// - `Ok(Some(Conversation))`: found
    /// - `Ok(None)`: no conversation with that ID
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>>;

    /// Inserts or replaces a conversation.
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    /// Lists non-archived conversations of a user for one profile, newest first.
    async fn list_for_profile(&self, user_id: &str, profile_id: &str) -> Result<Vec<Conversation>>;
}
