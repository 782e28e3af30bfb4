//! Profile management use cases.

use std::sync::Arc;

use allki_core::profile::{
    CreateProfileRequest, Profile, ProfileCategory, ProfileRepository, UpdateProfileRequest,
    template_for,
};
use allki_core::{AllkiError, Result};
use tracing::info;

/// Default number of active profiles a user may own.
pub const DEFAULT_MAX_PROFILES_PER_USER: usize = 10;

pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
    max_profiles_per_user: usize,
}

impl ProfileService {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self {
            repository,
            max_profiles_per_user: DEFAULT_MAX_PROFILES_PER_USER,
        }
    }

    pub fn with_max_profiles_per_user(mut self, max: usize) -> Self {
        self.max_profiles_per_user = max;
        self
    }

    /// Validates and stores a new profile for `user_id`.
    pub async fn create(&self, user_id: &str, request: CreateProfileRequest) -> Result<Profile> {
        request.validate()?;

        let active = self.list_active(user_id).await?.len();
        if active >= self.max_profiles_per_user {
            return Err(AllkiError::LimitExceeded(format!(
                "Maximal {} Profile pro Benutzer erlaubt",
                self.max_profiles_per_user
            )));
        }

        let profile = request.into_profile(user_id);
        self.repository.save(&profile).await?;
        info!(
            profile_id = %profile.id,
            user_id,
            category = %profile.category,
            "Profile created"
        );
        Ok(profile)
    }

    pub async fn create_from_template(&self, user_id: &str, category: ProfileCategory) -> Result<Profile> {
        self.create(user_id, template_for(category)).await
    }

    /// An active profile owned by `user_id`.
    pub async fn get(&self, profile_id: &str, user_id: &str) -> Result<Profile> {
        self.repository
            .find_by_id(profile_id)
            .await?
            .filter(|p| p.user_id == user_id && p.is_active)
            .ok_or_else(|| AllkiError::not_found("profile", profile_id))
    }

    /// Active profiles of a user, in creation order.
    pub async fn list_active(&self, user_id: &str) -> Result<Vec<Profile>> {
        Ok(self
            .repository
            .list_by_user(user_id)
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .collect())
    }

    pub async fn update(
        &self,
        profile_id: &str,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<Profile> {
        request.validate()?;
        let mut profile = self.get(profile_id, user_id).await?;
        request.apply_to(&mut profile);
        self.repository.save(&profile).await?;
        Ok(profile)
    }

    /// Soft delete: the profile stays stored but is no longer listed.
    pub async fn delete(&self, profile_id: &str, user_id: &str) -> Result<()> {
        let mut profile = self.get(profile_id, user_id).await?;
        profile.deactivate();
        self.repository.save(&profile).await?;
        info!(profile_id, user_id, "Profile deactivated");
        Ok(())
    }

    /// Adds one chat and `tokens` to the usage counters.
    pub async fn record_usage(&self, profile_id: &str, tokens: u64) -> Result<Profile> {
        let mut profile = self
            .repository
            .find_by_id(profile_id)
            .await?
            .ok_or_else(|| AllkiError::not_found("profile", profile_id))?;
        profile.record_usage(tokens);
        self.repository.save(&profile).await?;
        Ok(profile)
    }
}
