//! Copying memories from one profile to another.
//!
//! Used when an interview session (recorded under a temporary profile id)
//! turns into a real profile.

use chrono::Utc;
use tracing::info;

use super::model::{MemorySource, ProfileContext};
use super::service::ContextMemoryService;
use crate::error::Result;

impl ContextMemoryService {
    /// Copies every active memory of `source_profile_id` onto
    /// `target_profile_id` with fresh ids, source `interview` and refreshed
    /// timestamps. The source is left untouched.
    ///
    /// Returns the number of copied memories. If the source has no recorded
    /// context nothing happens and no target context is created.
    pub async fn transfer_memories_to_profile(
        &self,
        source_profile_id: &str,
        target_profile_id: &str,
    ) -> Result<usize> {
        let _guard = self.lock().await;
        let Some(source) = self.store().load(source_profile_id).await? else {
            return Ok(0);
        };

        let mut target = self
            .store()
            .load(target_profile_id)
            .await?
            .unwrap_or_else(|| ProfileContext::new(target_profile_id));

        let now = Utc::now();
        let copies: Vec<_> = source
            .active_memories()
            .map(|m| m.copied_to(target_profile_id, MemorySource::Interview, now))
            .collect();
        let copied = copies.len();

        target.memories.extend(copies);
        self.evict_oldest(&mut target);
        target.last_updated = now;
        self.store().save(&target).await?;

        info!(
            source = source_profile_id,
            target = target_profile_id,
            copied,
            "Transferred memories"
        );
        Ok(copied)
    }
}
