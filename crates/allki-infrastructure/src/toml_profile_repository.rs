//! TOML-backed `ProfileRepository`.
//!
//! All profiles live in one `profiles.toml` as an array of `[[profile]]`
//! tables. Saves are locked read-modify-write upserts.

use std::path::PathBuf;

use allki_core::Result;
use allki_core::profile::{Profile, ProfileRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::blocking::run_blocking;
use crate::paths::AllkiPaths;
use crate::storage::AtomicFile;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(rename = "profile", default)]
    profiles: Vec<Profile>,
}

pub struct TomlProfileRepository {
    path: PathBuf,
}

impl TomlProfileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &AllkiPaths) -> Self {
        Self::new(paths.profiles_file())
    }

    fn file(&self) -> AtomicFile<ProfileDocument> {
        AtomicFile::toml(self.path.clone())
    }

    async fn load_all(&self) -> Result<Vec<Profile>> {
        let file = self.file();
        run_blocking(move || Ok(file.load()?.unwrap_or_default().profiles)).await
    }
}

#[async_trait]
impl ProfileRepository for TomlProfileRepository {
    async fn find_by_id(&self, profile_id: &str) -> Result<Option<Profile>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|p| p.id == profile_id))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Profile>> {
        let mut profiles: Vec<Profile> = self
            .load_all()
            .await?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }

    async fn save(&self, profile: &Profile) -> Result<()> {
        let file = self.file();
        let profile = profile.clone();
        run_blocking(move || {
            file.update(ProfileDocument::default(), |doc| {
                match doc.profiles.iter_mut().find(|p| p.id == profile.id) {
                    Some(existing) => *existing = profile,
                    None => doc.profiles.push(profile),
                }
            })?;
            Ok(())
        })
        .await
    }
}
