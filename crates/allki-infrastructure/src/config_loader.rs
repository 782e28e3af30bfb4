//! Loads [`AppConfig`] from disk and applies environment fallbacks.

use std::path::Path;

use allki_core::config::AppConfig;
use allki_core::{AllkiError, Result};
use tracing::{debug, info};

use crate::paths::AllkiPaths;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL_NAME";

/// Loads configuration.
///
/// An explicit `path` must exist. Without one, the default
/// `~/.config/allki/config.toml` is used and a missing file yields defaults.
/// Environment variables fill in the API key and model when the file leaves
/// them unset.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(AllkiError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            read_config(path)?
        }
        None => {
            let default_path = AllkiPaths::default_location()?.config_file();
            if default_path.exists() {
                read_config(&default_path)?
            } else {
                debug!(path = %default_path.display(), "No config file, using defaults");
                AppConfig::default()
            }
        }
    };

    apply_env_fallbacks(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = AppConfig::from_toml_str(&content)?;
    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Fills `api_key` from `OPENAI_API_KEY` when unset and overrides the model
/// with `OPENAI_MODEL_NAME` when present.
pub fn apply_env_fallbacks<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.llm.api_key.as_deref().is_none_or(str::is_empty) {
        config.llm.api_key = lookup(API_KEY_ENV).filter(|v| !v.is_empty());
    }
    if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.is_empty()) {
        config.llm.model = model;
    }
}
