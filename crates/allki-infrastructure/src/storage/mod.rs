//! Storage primitives for file-backed repositories.

mod atomic_file;

pub use atomic_file::{AtomicFile, AtomicFileError, DocumentFormat};
