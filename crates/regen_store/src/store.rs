//! The capability interface consumed by the change-tracking engine.

use crate::error::StoreError;

/// A minimal key/value capability for persisting fingerprints.
///
/// The change-tracking engine only ever needs these five operations, so any
/// persistent backend (flat file, embedded store, relational table, remote
/// service) can be plugged in by implementing them. All operations are
/// blocking and synchronous; implementations are not required to be safe for
/// concurrent use, and callers sharing one store across conceptual workers
/// must serialize access themselves.
///
/// The trait is object-safe: the engine holds a `&mut dyn FingerprintStore`.
pub trait FingerprintStore {
    /// Inserts or updates the value stored under `key`.
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns `true` if `key` has a stored value.
    ///
    /// Never fails: any ambiguity (unreadable backend, closed store) reads
    /// as `false`.
    fn has(&mut self, key: &str) -> bool;

    /// Returns the value stored under `key`, or `Ok(None)` if absent.
    ///
    /// A missing key is not an error; `Err` is reserved for real read
    /// failures against the backend.
    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError>;

    /// Forces durability of all prior writes.
    fn sync(&mut self) -> Result<(), StoreError>;

    /// Releases underlying resources. Idempotent.
    fn close(&mut self) -> Result<(), StoreError>;
}
