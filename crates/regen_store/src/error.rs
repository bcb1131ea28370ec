//! Error types for fingerprint store operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing a fingerprint store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred against the backing file.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An in-place update was attempted with a value whose encoded length
    /// differs from the stored value's length.
    ///
    /// The line-record format relies on fixed-size values for in-place
    /// overwrites; a different length would corrupt neighboring records.
    #[error("value for key '{key}' must stay {expected} bytes, got {actual}")]
    ValueSize {
        /// The key being updated.
        key: String,
        /// Byte length of the currently stored value.
        expected: usize,
        /// Byte length of the rejected replacement value.
        actual: usize,
    },

    /// A key or value contains a line break, which the line-oriented record
    /// format cannot represent.
    #[error("key or value contains a line break: {text:?}")]
    InvalidRecord {
        /// The offending key or value.
        text: String,
    },

    /// The store has already been closed.
    #[error("store is closed: {path}")]
    Closed {
        /// Path of the closed store's backing file.
        path: PathBuf,
    },
}
