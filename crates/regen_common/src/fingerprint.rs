//! Content fingerprinting for change detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit content fingerprint computed using SHA-256.
///
/// Two files with the same `Fingerprint` are assumed to have identical
/// content. Used to detect when a tracked input has changed since the last
/// time an expensive action ran. `Display` renders the digest as 64
/// lowercase hexadecimal characters, which is also the form persisted to
/// sidecar files and stores.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes a fingerprint from a byte slice using SHA-256.
    pub fn from_bytes(data: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(data);
        Self(digest.into())
    }

    /// Returns the fingerprint as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
