//! Run an action when tracked files change or expected outputs go missing.
//!
//! This crate answers one question cheaply and correctly: "has this set of
//! inputs changed since the last time I did the expensive work, or is an
//! expected output missing?" If so, it runs a supplied action exactly once
//! and persists new content fingerprints only when that action succeeds, so
//! a failed action is retried on the next evaluation.
//!
//! The classic use case is regenerating a derived file (compiled CSS, say)
//! only when its source changed or the derived file itself is absent:
//!
//! ```no_run
//! use regen_track::{run_command, ChangeTracker};
//!
//! # fn main() -> Result<(), regen_track::TrackError> {
//! ChangeTracker::new()
//!     .changed("style.scss", "style.scss.sha256")
//!     .missing("style.css")
//!     .execute(|| run_command("sassc", &["style.scss", "style.css"]))?;
//! # Ok(())
//! # }
//! ```
//!
//! Fingerprints live either in sidecar files next to the tracked inputs or
//! under keys of any [`FingerprintStore`](regen_store::FingerprintStore)
//! attached to the tracker.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod hasher;
pub mod sidecar;
pub mod tracker;

pub use command::{run_command, CommandError};
pub use error::TrackError;
pub use hasher::hash_file;
pub use tracker::{run_if_changed, run_if_changed_in_store, ChangeTracker, Outcome};
