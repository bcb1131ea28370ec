//! Tracked-file fingerprinting.

use std::path::Path;

use regen_common::Fingerprint;

use crate::error::TrackError;

/// Computes the content fingerprint of a tracked file.
///
/// A tracked file is an input and must exist: an absent path is
/// [`TrackError::NotFound`] and a directory is [`TrackError::Directory`].
/// The fingerprint covers the file's full byte content.
pub fn hash_file(path: &Path) -> Result<Fingerprint, TrackError> {
    let meta = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TrackError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TrackError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if meta.is_dir() {
        return Err(TrackError::Directory {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read(path).map_err(|e| TrackError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Fingerprint::from_bytes(&content))
}
