//! Context store trait and an in-process implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::ProfileContext;
use crate::error::Result;

/// Persistence seam for per-profile context.
///
/// The whole [`ProfileContext`] is loaded and written back as one unit, so
/// implementations only need whole-document semantics.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Loads the context of a profile.
    ///
    /// - `Ok(None)`: nothing recorded for that profile yet
    async fn load(&self, profile_id: &str) -> Result<Option<ProfileContext>>;

    /// Inserts or replaces the context of `context.profile_id`.
    async fn save(&self, context: &ProfileContext) -> Result<()>;

    /// Removes the context of a profile. Unknown ids are a no-op.
    async fn delete(&self, profile_id: &str) -> Result<()>;

    /// Ids of every profile with a recorded context.
    async fn profile_ids(&self) -> Result<Vec<String>>;
}

/// Volatile store backed by a map. Used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryContextStore {
    contexts: RwLock<HashMap<String, ProfileContext>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn load(&self, profile_id: &str) -> Result<Option<ProfileContext>> {
        Ok(self.contexts.read().await.get(profile_id).cloned())
    }

    async fn save(&self, context: &ProfileContext) -> Result<()> {
        self.contexts
            .write()
            .await
            .insert(context.profile_id.clone(), context.clone());
        Ok(())
    }

    async fn delete(&self, profile_id: &str) -> Result<()> {
        self.contexts.write().await.remove(profile_id);
        Ok(())
    }

    async fn profile_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.contexts.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
