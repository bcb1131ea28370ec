//! Fingerprint persistence backends.
//!
//! This crate defines the [`FingerprintStore`] capability interface the
//! change-tracking engine consumes, together with two implementations: a
//! flat-file [`LineRecordStore`] that needs no external database, and a
//! map-backed [`MemoryStore`] for tests and process-local use. Any other
//! persistent key/value backend can be substituted by implementing the trait.

#![warn(missing_docs)]

pub mod error;
pub mod line_record;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use line_record::LineRecordStore;
pub use memory::MemoryStore;
pub use store::FingerprintStore;
