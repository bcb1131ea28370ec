//! Error types for the change-tracking engine.

use std::path::PathBuf;

use regen_store::StoreError;

/// Errors produced by the engine itself.
///
/// The user action's failure is deliberately absent from this enum: when the
/// action fails, no fingerprint is persisted and the next evaluation fires
/// the action again. `Err` here always means the engine could not complete
/// an evaluation.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// A declared tracked input file does not exist.
    #[error("tracked file not found: {path}")]
    NotFound {
        /// The missing tracked file.
        path: PathBuf,
    },

    /// A path that must be a regular file is a directory. Applies to tracked
    /// files, sidecar fingerprint locations, and must-exist paths.
    #[error("expected a file, found a directory: {path}")]
    Directory {
        /// The offending directory path.
        path: PathBuf,
    },

    /// An I/O error occurred while reading a tracked file or reading or
    /// writing a sidecar fingerprint file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The attached fingerprint store rejected a read, write, or sync.
    #[error("fingerprint store error: {0}")]
    Store(#[from] StoreError),

    /// A store-keyed pair was declared but no store was attached to the
    /// tracker.
    #[error("no fingerprint store attached for key '{key}'")]
    NoStore {
        /// The key whose pair could not be evaluated.
        key: String,
    },
}
