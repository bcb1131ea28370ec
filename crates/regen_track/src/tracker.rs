//! The change-detection and fingerprint-persistence engine.
//!
//! [`ChangeTracker`] accumulates (tracked file, fingerprint location) pairs
//! and must-exist paths through chained builder calls, then evaluates them
//! with [`execute`](ChangeTracker::execute): compute fresh fingerprints,
//! compare against stored ones, run the action exactly once if anything
//! changed or any declared output is absent, and persist the new
//! fingerprints only when the action succeeds.

use std::path::PathBuf;

use regen_common::Fingerprint;
use regen_store::FingerprintStore;

use crate::error::TrackError;
use crate::{hasher, sidecar};

/// Where a pair's fingerprint is persisted.
#[derive(Debug, Clone)]
enum Location {
    /// A sidecar file holding the bare hex digest.
    Sidecar(PathBuf),
    /// A key in the attached fingerprint store.
    StoreKey(String),
}

/// One (tracked file, fingerprint location) declaration.
#[derive(Debug, Clone)]
struct Pair {
    tracked: PathBuf,
    location: Location,
}

/// Result of a single [`ChangeTracker::execute`] evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No tracked input changed and no declared output was missing; the
    /// action did not run.
    Unchanged,
    /// The action ran and succeeded; new fingerprints were persisted.
    Executed,
    /// The action ran and failed; no fingerprint was persisted, so the next
    /// evaluation will fire the action again.
    ActionFailed,
}

impl Outcome {
    /// Returns `true` if the action was invoked, successfully or not.
    pub fn fired(&self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }
}

/// Accumulates change-detection declarations, then runs an action when any
/// of them signals work to do.
///
/// Pairs are evaluated in declaration order, and declaring the same pair
/// twice evaluates it twice; the tracker performs no deduplication. An
/// evaluation does not consume the tracker, so the same accumulated state
/// can be reused or extended for a later evaluation.
///
/// Store-keyed pairs need a [`FingerprintStore`] attached via
/// [`store`](ChangeTracker::store) before `execute` is called.
pub struct ChangeTracker<'s> {
    pairs: Vec<Pair>,
    required: Vec<PathBuf>,
    store: Option<&'s mut dyn FingerprintStore>,
}

impl<'s> ChangeTracker<'s> {
    /// Creates a tracker with no declarations.
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            required: Vec::new(),
            store: None,
        }
    }

    /// Declares a tracked file whose fingerprint lives in a sidecar file.
    pub fn changed(mut self, tracked: impl Into<PathBuf>, sidecar: impl Into<PathBuf>) -> Self {
        self.pairs.push(Pair {
            tracked: tracked.into(),
            location: Location::Sidecar(sidecar.into()),
        });
        self
    }

    /// Declares a tracked file whose fingerprint lives under `key` in the
    /// attached store.
    pub fn changed_in_store(
        mut self,
        tracked: impl Into<PathBuf>,
        key: impl Into<String>,
    ) -> Self {
        self.pairs.push(Pair {
            tracked: tracked.into(),
            location: Location::StoreKey(key.into()),
        });
        self
    }

    /// Declares a path whose absence alone triggers the action, typically an
    /// expected build output.
    pub fn missing(mut self, path: impl Into<PathBuf>) -> Self {
        self.required.push(path.into());
        self
    }

    /// Attaches the store backing the tracker's store-keyed pairs.
    pub fn store(mut self, store: &'s mut dyn FingerprintStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Evaluates all declarations and runs `action` exactly once if any
    /// tracked file changed or any must-exist path is absent.
    ///
    /// New fingerprints are persisted only when the action returns `Ok`; on
    /// failure nothing is written, so the next evaluation fires the action
    /// again. The action's own error value is never propagated — `Err` from
    /// this method always means the engine itself failed (absent tracked
    /// input, directory where a file was expected, or a persistence-layer
    /// fault).
    pub fn execute<F, E>(&mut self, action: F) -> Result<Outcome, TrackError>
    where
        F: FnOnce() -> Result<(), E>,
        E: std::fmt::Display,
    {
        let mut missing_detected = false;
        for path in &self.required {
            match std::fs::metadata(path) {
                Ok(meta) if meta.is_dir() => {
                    return Err(TrackError::Directory { path: path.clone() });
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "required file is missing");
                    missing_detected = true;
                    // One absence already forces the action.
                    break;
                }
                Err(e) => {
                    return Err(TrackError::Io {
                        path: path.clone(),
                        source: e,
                    });
                }
            }
        }

        let mut change_detected = false;
        let mut computed = Vec::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            let fresh = hasher::hash_file(&pair.tracked)?;
            // Once a missing file has forced regeneration there is no point
            // reading stored fingerprints; the fresh ones are still kept for
            // persistence.
            if !missing_detected {
                let stored = match &pair.location {
                    Location::Sidecar(path) => sidecar::read_fingerprint(path)?,
                    Location::StoreKey(key) => self
                        .store
                        .as_deref_mut()
                        .ok_or_else(|| TrackError::NoStore { key: key.clone() })?
                        .get(key)?,
                };
                let fresh_hex = fresh.to_string();
                let changed = match stored.as_deref() {
                    None | Some("") => true,
                    Some(prev) => prev != fresh_hex.as_str(),
                };
                if changed {
                    tracing::debug!(path = %pair.tracked.display(), "tracked file changed");
                    change_detected = true;
                }
            }
            computed.push(fresh);
        }

        if !missing_detected && !change_detected {
            return Ok(Outcome::Unchanged);
        }

        if let Err(e) = action() {
            // Nothing is persisted, so the next evaluation retries. The
            // error value itself belongs to the caller, not the engine.
            tracing::warn!(error = %e, "action failed; fingerprints left untouched");
            return Ok(Outcome::ActionFailed);
        }

        let mut store_dirty = false;
        for (pair, fingerprint) in self.pairs.iter().zip(&computed) {
            match &pair.location {
                Location::Sidecar(path) => sidecar::write_fingerprint(path, fingerprint)?,
                Location::StoreKey(key) => {
                    self.store
                        .as_deref_mut()
                        .ok_or_else(|| TrackError::NoStore { key: key.clone() })?
                        .put(key, &fingerprint.to_string())?;
                    store_dirty = true;
                }
            }
        }
        if store_dirty {
            if let Some(store) = self.store.as_deref_mut() {
                store.sync()?;
            }
        }
        tracing::debug!(pairs = self.pairs.len(), "fingerprints persisted");
        Ok(Outcome::Executed)
    }
}

impl Default for ChangeTracker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `action` if `tracked` changed relative to the fingerprint in the
/// `sidecar` file, persisting the new fingerprint on success.
pub fn run_if_changed<F, E>(
    tracked: impl Into<PathBuf>,
    sidecar: impl Into<PathBuf>,
    action: F,
) -> Result<Outcome, TrackError>
where
    F: FnOnce() -> Result<(), E>,
    E: std::fmt::Display,
{
    ChangeTracker::new().changed(tracked, sidecar).execute(action)
}

/// Runs `action` if `tracked` changed relative to the fingerprint stored
/// under `key`, persisting the new fingerprint on success.
pub fn run_if_changed_in_store<F, E>(
    tracked: impl Into<PathBuf>,
    store: &mut dyn FingerprintStore,
    key: impl Into<String>,
    action: F,
) -> Result<Outcome, TrackError>
where
    F: FnOnce() -> Result<(), E>,
    E: std::fmt::Display,
{
    ChangeTracker::new()
        .changed_in_store(tracked, key)
        .store(store)
        .execute(action)
}
