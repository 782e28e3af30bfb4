//! Context memory lifecycle: add, supersede, evict, read and summarize.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::model::{
    ContextMemory, DEFAULT_CONFIDENCE, MemorySource, MemoryUpdate, ProfileContext, keys,
    normalize_confidence,
};
use super::store::ContextStore;
use crate::analyzer::CandidateMemory;
use crate::error::Result;

/// Default per-profile memory cap.
pub const MAX_MEMORIES_PER_PROFILE: usize = 50;

/// Characters of each message kept in the `last_interaction` memory.
const INTERACTION_EXCERPT_CHARS: usize = 100;

/// Owns the memory rules on top of a [`ContextStore`].
///
/// Every mutation is a load-modify-save of the whole profile context. The
/// internal lock serializes those cycles so concurrent requests inside one
/// process cannot lose each other's writes.
pub struct ContextMemoryService {
    store: Arc<dyn ContextStore>,
    max_memories: usize,
    write_lock: Mutex<()>,
}

impl ContextMemoryService {
    pub fn new(store: Arc<dyn ContextStore>) -> Self {
        Self {
            store,
            max_memories: MAX_MEMORIES_PER_PROFILE,
            write_lock: Mutex::new(()),
        }
    }

    /// Overrides the per-profile cap (at least one memory is always kept).
    pub fn with_max_memories(mut self, max_memories: usize) -> Self {
        self.max_memories = max_memories.max(1);
        self
    }

    pub fn max_memories(&self) -> usize {
        self.max_memories
    }

    pub(crate) fn store(&self) -> &Arc<dyn ContextStore> {
        &self.store
    }

    pub(crate) async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Ids of all profiles with a recorded context, interview sessions included.
    pub async fn profile_ids(&self) -> Result<Vec<String>> {
        self.store.profile_ids().await
    }

    /// Full context of a profile, if any was recorded.
    pub async fn context(&self, profile_id: &str) -> Result<Option<ProfileContext>> {
        self.store.load(profile_id).await
    }

    /// Records a memory.
    ///
    /// Existing memories with the same key and a strictly lower confidence are
    /// removed first. Equal or higher confidence entries stay, so repeated
    /// observations at the same confidence accumulate. Once the profile holds
    /// more than the cap, the oldest entries are dropped.
    pub async fn add_memory(
        &self,
        profile_id: &str,
        key: &str,
        value: Value,
        source: MemorySource,
        confidence: Option<f64>,
    ) -> Result<ContextMemory> {
        let _guard = self.lock().await;
        let mut context = self
            .store
            .load(profile_id)
            .await?
            .unwrap_or_else(|| ProfileContext::new(profile_id));

        let memory = ContextMemory::new(
            profile_id,
            key,
            value,
            source,
            confidence.unwrap_or(DEFAULT_CONFIDENCE),
        );

        let before = context.memories.len();
        context
            .memories
            .retain(|m| !(m.key == key && m.confidence < memory.confidence));
        let superseded = before - context.memories.len();
        if superseded > 0 {
            debug!(profile_id, key, superseded, "Superseded lower-confidence memories");
        }

        context.memories.push(memory.clone());
        self.evict_oldest(&mut context);
        context.last_updated = memory.created_at;
        context.total_interactions += 1;

        self.store.save(&context).await?;
        debug!(profile_id, key, confidence = memory.confidence, "Memory added");
        Ok(memory)
    }

    pub(crate) fn evict_oldest(&self, context: &mut ProfileContext) {
        if context.memories.len() > self.max_memories {
            let excess = context.memories.len() - self.max_memories;
            context.memories.drain(..excess);
            debug!(
                profile_id = %context.profile_id,
                evicted = excess,
                "Evicted oldest memories over cap"
            );
        }
    }

    /// Best active memory for `key`: highest confidence, then most recently
    /// updated, then earliest inserted. Marks it as accessed.
    pub async fn get_memory(&self, profile_id: &str, key: &str) -> Result<Option<ContextMemory>> {
        let _guard = self.lock().await;
        let Some(mut context) = self.store.load(profile_id).await? else {
            return Ok(None);
        };

        let mut best: Option<usize> = None;
        for (index, memory) in context.memories.iter().enumerate() {
            if !memory.is_active || memory.key != key {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let current = &context.memories[current];
                    memory.confidence > current.confidence
                        || (memory.confidence == current.confidence
                            && memory.updated_at > current.updated_at)
                }
            };
            if better {
                best = Some(index);
            }
        }

        let Some(index) = best else {
            return Ok(None);
        };
        context.memories[index].last_accessed_at = Utc::now();
        let memory = context.memories[index].clone();
        self.store.save(&context).await?;
        Ok(Some(memory))
    }

    /// Active memories in insertion order.
    pub async fn get_memories(&self, profile_id: &str) -> Result<Vec<ContextMemory>> {
        Ok(self
            .store
            .load(profile_id)
            .await?
            .map(|context| context.active_memories().cloned().collect())
            .unwrap_or_default())
    }

    /// Applies a partial update to one memory. Returns the updated memory, or
    /// `None` if the id is unknown.
    pub async fn update_memory(
        &self,
        profile_id: &str,
        memory_id: &str,
        update: MemoryUpdate,
    ) -> Result<Option<ContextMemory>> {
        let _guard = self.lock().await;
        let Some(mut context) = self.store.load(profile_id).await? else {
            return Ok(None);
        };
        let Some(memory) = context.memories.iter_mut().find(|m| m.id == memory_id) else {
            return Ok(None);
        };

        let now = Utc::now();
        if let Some(value) = update.value {
            memory.value = value;
        }
        if let Some(confidence) = update.confidence {
            memory.confidence = normalize_confidence(confidence);
        }
        if let Some(is_active) = update.is_active {
            memory.is_active = is_active;
        }
        memory.updated_at = now;
        let updated = memory.clone();

        context.last_updated = now;
        self.store.save(&context).await?;
        Ok(Some(updated))
    }

    /// Deletes one memory. Unknown ids are a no-op.
    pub async fn remove_memory(&self, profile_id: &str, memory_id: &str) -> Result<()> {
        let _guard = self.lock().await;
        let Some(mut context) = self.store.load(profile_id).await? else {
            return Ok(());
        };
        let before = context.memories.len();
        context.memories.retain(|m| m.id != memory_id);
        if context.memories.len() != before {
            context.last_updated = Utc::now();
            self.store.save(&context).await?;
        }
        Ok(())
    }

    /// Removes the whole context of a profile, counters included.
    pub async fn clear_context(&self, profile_id: &str) -> Result<()> {
        let _guard = self.lock().await;
        self.store.delete(profile_id).await?;
        info!(profile_id, "Cleared profile context");
        Ok(())
    }

    /// One-line summary of goals, preferences, expertise and communication
    /// style. Empty when nothing relevant is known.
    pub async fn context_summary(&self, profile_id: &str) -> Result<String> {
        let memories = self.get_memories(profile_id).await?;
        let collect = |key: &str| -> Vec<String> {
            memories
                .iter()
                .filter(|m| m.key == key)
                .flat_map(ContextMemory::display_values)
                .collect()
        };

        let mut parts = Vec::new();
        for (key, label) in [
            (keys::GOALS, "Ziele"),
            (keys::PREFERENCES, "Präferenzen"),
            (keys::EXPERTISE, "Expertise-Bereiche"),
            (keys::COMMUNICATION_STYLE, "Kommunikationsstil"),
        ] {
            let values = collect(key);
            if !values.is_empty() {
                parts.push(format!("{label}: {}.", values.join(", ")));
            }
        }
        Ok(parts.join(" "))
    }

    /// Stores the analyzer's candidates as chat memories. Returns how many
    /// were recorded.
    pub async fn record_candidates(
        &self,
        profile_id: &str,
        candidates: &[CandidateMemory],
    ) -> Result<usize> {
        for candidate in candidates {
            self.add_memory(
                profile_id,
                candidate.key(),
                Value::String(candidate.value.clone()),
                MemorySource::Chat,
                Some(candidate.confidence),
            )
            .await?;
        }
        Ok(candidates.len())
    }

    /// Stores an excerpt of a completed exchange and counts the conversation
    /// turn.
    pub async fn record_exchange(
        &self,
        profile_id: &str,
        user_message: &str,
        ai_response: &str,
    ) -> Result<()> {
        self.add_memory(
            profile_id,
            keys::LAST_INTERACTION,
            json!({
                "timestamp": Utc::now().to_rfc3339(),
                "userMessage": excerpt(user_message),
                "aiResponse": excerpt(ai_response),
            }),
            MemorySource::Chat,
            Some(1.0),
        )
        .await?;

        let _guard = self.lock().await;
        if let Some(mut context) = self.store.load(profile_id).await? {
            context.conversation_count += 1;
            self.store.save(&context).await?;
        }
        debug!(profile_id, "Recorded exchange");
        Ok(())
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(INTERACTION_EXCERPT_CHARS).collect()
}
