//! Shared foundational types for the regen build-cache primitive.
//!
//! This crate provides the content fingerprint type used as the cheap
//! equality proxy for "did this file change" across the workspace.

#![warn(missing_docs)]

pub mod fingerprint;

pub use fingerprint::Fingerprint;
