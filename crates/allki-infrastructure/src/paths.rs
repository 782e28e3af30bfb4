//! Platform paths for ALL-KI files.
//!
//! ```text
//! ~/.config/allki/             # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/allki/        # Data directory
//! ├── profiles.toml            # All profiles
//! ├── contexts/                # One JSON document per profile context
//! └── conversations/           # One JSON document per conversation
//! ```

use std::path::{Path, PathBuf};

use allki_core::{AllkiError, Result};

const APP_DIR: &str = "allki";

/// Resolved config and data directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllkiPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AllkiPaths {
    /// Platform defaults (XDG on Linux, the native locations elsewhere).
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AllkiError::config("Cannot find config directory"))?
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .ok_or_else(|| AllkiError::config("Cannot find data directory"))?
            .join(APP_DIR);
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Everything below one base directory (tests, portable installs).
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            config_dir: base.join("config"),
            data_dir: base.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn profiles_file(&self) -> PathBuf {
        self.data_dir.join("profiles.toml")
    }

    pub fn contexts_dir(&self) -> PathBuf {
        self.data_dir.join("contexts")
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.data_dir.join("conversations")
    }
}

/// Maps an id onto a safe, reversible file stem. ASCII alphanumerics and
/// `-` pass through; every other byte, `_` included, becomes `_XX` (hex).
pub fn file_stem_for(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{byte:02X}"));
        }
    }
    stem
}
