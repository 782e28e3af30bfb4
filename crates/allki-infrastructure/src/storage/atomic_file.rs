//! Atomic document files.
//!
//! A document is one serde value persisted as a whole in TOML or JSON.
//! Writes go to a temporary sibling first and are renamed into place;
//! read-modify-write cycles hold an exclusive lock file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use allki_core::AllkiError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Errors that can occur during atomic file operations.
#[derive(Debug, Error)]
pub enum AtomicFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{format} parse error: {message}")]
    Parse { format: &'static str, message: String },

    #[error("{format} serialization error: {message}")]
    Serialize { format: &'static str, message: String },

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicFileError> for AllkiError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => e.into(),
            AtomicFileError::Parse { format, message }
            | AtomicFileError::Serialize { format, message } => AllkiError::Serialization {
                format: format.to_string(),
                message,
            },
            AtomicFileError::Lock(message) => AllkiError::data_access(message),
        }
    }
}

/// A handle to a document file with atomic replace semantics.
pub struct AtomicFile<T> {
    path: PathBuf,
    format: DocumentFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: DocumentFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, DocumentFormat::Toml)
    }

    pub fn json(path: PathBuf) -> Self {
        Self::new(path, DocumentFormat::Json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// - `Ok(None)`: the file doesn't exist or is blank
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let parsed = match self.format {
            DocumentFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map(Some).map_err(|message| AtomicFileError::Parse {
            format: self.format.name(),
            message,
        })
    }

    /// Writes the document via tmp file + fsync + rename.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let encoded = match self.format {
            DocumentFormat::Toml => toml::to_string_pretty(data).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        }
        .map_err(|message| AtomicFileError::Serialize {
            format: self.format.name(),
            message,
        })?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Locked read-modify-write. `f` sees the current document (or
    /// `default_value` when there is none); its result is written back.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R, AtomicFileError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data);
        self.save(&data)?;
        Ok(result)
    }

    /// Removes the file. Missing files are fine.
    pub fn remove(&self) -> Result<(), AtomicFileError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let invalid = |what: &str| {
            AtomicFileError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path has no {what}"),
            ))
        };
        let parent = self.path.parent().ok_or_else(|| invalid("parent directory"))?;
        let file_name = self.path.file_name().ok_or_else(|| invalid("file name"))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on `<file>.lock`, released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicFileError::Lock(format!("Failed to acquire lock: {e}")))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
