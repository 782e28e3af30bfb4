//! File-backed `ContextStore`: one JSON document per profile.
//!
//! JSON rather than TOML because memory values are arbitrary JSON and may
//! contain nulls.

use std::path::{Path, PathBuf};

use allki_core::Result;
use allki_core::memory::{ContextStore, ProfileContext};
use async_trait::async_trait;
use tracing::debug;

use crate::blocking::run_blocking;
use crate::paths::{AllkiPaths, file_stem_for};
use crate::storage::{AtomicFile, DocumentFormat};

pub struct FileContextStore {
    dir: PathBuf,
}

impl FileContextStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_paths(paths: &AllkiPaths) -> Self {
        Self::new(paths.contexts_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, profile_id: &str) -> AtomicFile<ProfileContext> {
        let name = format!("{}.{}", file_stem_for(profile_id), DocumentFormat::Json.extension());
        AtomicFile::json(self.dir.join(name))
    }
}

#[async_trait]
impl ContextStore for FileContextStore {
    async fn load(&self, profile_id: &str) -> Result<Option<ProfileContext>> {
        let file = self.file(profile_id);
        let loaded = run_blocking(move || Ok(file.load()?)).await?;
        Ok(loaded.filter(|context| context.profile_id == profile_id))
    }

    async fn save(&self, context: &ProfileContext) -> Result<()> {
        let file = self.file(&context.profile_id);
        let snapshot = context.clone();
        run_blocking(move || Ok(file.save(&snapshot)?)).await?;
        debug!(
            profile_id = %context.profile_id,
            memories = context.memories.len(),
            "Context saved"
        );
        Ok(())
    }

    async fn delete(&self, profile_id: &str) -> Result<()> {
        let file = self.file(profile_id);
        run_blocking(move || Ok(file.remove()?)).await
    }

    async fn profile_ids(&self) -> Result<Vec<String>> {
        let dir = self.dir.clone();
        run_blocking(move || {
            if !dir.exists() {
                return Ok(Vec::new());
            }
            let mut ids = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Some(context) = AtomicFile::<ProfileContext>::json(path).load()? {
                    ids.push(context.profile_id);
                }
            }
            ids.sort();
            Ok(ids)
        })
        .await
    }
}
