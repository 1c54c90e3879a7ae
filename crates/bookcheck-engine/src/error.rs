//! Engine error type.
//!
//! Findings about config contents are never errors here; they are returned
//! as [`bookcheck_core::ConfigError`] values. [`EngineError`] covers the
//! failures that stop a run.

use std::path::PathBuf;

use bookcheck_core::ReleaseError;
use bookcheck_schema::SchemaValidationError;
use thiserror::Error;

use crate::enumerate::EnumerationError;

/// A failure that aborts a validation run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Auto-update needed a release but the branch ref did not name one.
    #[error("cannot determine release: {0}")]
    Release(#[from] ReleaseError),

    /// A matched config file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An updated config file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An updated config could not be rebuilt or serialized back to YAML.
    #[error("failed to serialize {}: {reason}", .path.display())]
    Serialize {
        /// The file being rewritten.
        path: PathBuf,
        /// Serializer message.
        reason: String,
    },

    /// Include patterns could not be expanded.
    #[error(transparent)]
    Enumerate(#[from] EnumerationError),

    /// The book schema could not be compiled.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}
