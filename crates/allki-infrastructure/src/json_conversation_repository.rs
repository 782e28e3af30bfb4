//! File-backed `ConversationRepository`: one JSON document per conversation.

use std::path::PathBuf;

use allki_core::Result;
use allki_core::conversation::{Conversation, ConversationRepository};
use async_trait::async_trait;

use crate::blocking::run_blocking;
use crate::paths::{AllkiPaths, file_stem_for};
use crate::storage::AtomicFile;

pub struct JsonConversationRepository {
    dir: PathBuf,
}

impl JsonConversationRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_paths(paths: &AllkiPaths) -> Self {
        Self::new(paths.conversations_dir())
    }

    fn file(&self, conversation_id: &str) -> AtomicFile<Conversation> {
        AtomicFile::json(self.dir.join(format!("{}.json", file_stem_for(conversation_id))))
    }
}

#[async_trait]
impl ConversationRepository for JsonConversationRepository {
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        let file = self.file(conversation_id);
        let loaded = run_blocking(move || Ok(file.load()?)).await?;
        Ok(loaded.filter(|conversation| conversation.id == conversation_id))
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let file = self.file(&conversation.id);
        let conversation = conversation.clone();
        run_blocking(move || Ok(file.save(&conversation)?)).await
    }

    async fn list_for_profile(&self, user_id: &str, profile_id: &str) -> Result<Vec<Conversation>> {
        let dir = self.dir.clone();
        let user_id = user_id.to_string();
        let profile_id = profile_id.to_string();
        run_blocking(move || {
            if !dir.exists() {
                return Ok(Vec::new());
            }
            let mut conversations = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Some(conversation) = AtomicFile::<Conversation>::json(path).load()? {
                    if conversation.user_id == user_id
                        && conversation.profile_id == profile_id
                        && !conversation.is_archived
                    {
                        conversations.push(conversation);
                    }
                }
            }
            conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(conversations)
        })
        .await
    }
}
