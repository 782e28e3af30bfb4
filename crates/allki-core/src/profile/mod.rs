//! Profile (persona) domain module.
//!
//! # Module Structure
//!
//! - `model`: `Profile`, `ProfileCategory`, `Tone`, `ResponseStyle`, `Personality`
//! - `request`: Create/update request models with validation
//! - `preset`: Built-in templates, one per category
//! - `repository`: Repository trait for profile persistence

mod model;
mod preset;
mod repository;
pub mod request;

pub use model::{
    DEFAULT_AVATAR, Personality, Profile, ProfileCategory, ProfileUsage, ResponseStyle, Tone,
};
pub use preset::{template_for, templates};
pub use repository::ProfileRepository;
pub use request::{CreateProfileRequest, UpdateProfileRequest};
