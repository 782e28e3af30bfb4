//! Profile repository trait.
//!
//! Defines the interface for profile persistence operations.

use async_trait::async_trait;

use super::model::Profile;
use crate::error::Result;

/// An abstract repository for managing profile persistence.
///
/// This trait decouples the application's core logic from the specific
/// storage mechanism (TOML file, document store, in-memory map).
///
/// # Implementation Notes
///
/// Implementations return inactive (soft-deleted) profiles too; filtering by
/// `is_active` is the caller's decision.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: Profile found
    /// - `Ok(None)`: Profile not found
    /// - `Err(AllkiError)`: Error occurred during retrieval
    async fn find_by_id(&self, profile_id: &str) -> Result<Option<Profile>>;

    /// Lists all profiles owned by a user, in creation order.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Profile>>;

    /// Inserts or replaces a profile.
    async fn save(&self, profile: &Profile) -> Result<()>;
}
