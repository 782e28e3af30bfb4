//! Volatile repositories for tests and ephemeral sessions.

use std::collections::HashMap;

use allki_core::Result;
use allki_core::conversation::{Conversation, ConversationRepository};
use allki_core::profile::{Profile, ProfileRepository};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub use allki_core::memory::InMemoryContextStore;

#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, profile_id: &str) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.id == profile_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile.clone(),
            None => profiles.push(profile.clone()),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversations.read().await.get(conversation_id).cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation.clone());
        Ok(())
    }

    async fn list_for_profile(&self, user_id: &str, profile_id: &str) -> Result<Vec<Conversation>> {
        let mut conversations: Vec<Conversation> = self
            .conversations
            .read()
            .await
            .values()
            .filter(|c| c.user_id == user_id && c.profile_id == profile_id && !c.is_archived)
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }
}
