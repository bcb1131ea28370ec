//! Sidecar fingerprint files.
//!
//! A sidecar file is a plain-text file whose entire content is one hex
//! fingerprint, conventionally stored next to the tracked input (for
//! `style.scss`, say, `style.scss.sha256`). It is fully overwritten on each
//! update and carries no trailing newline.

use std::path::Path;

use regen_common::Fingerprint;

use crate::error::TrackError;

/// Reads the fingerprint stored in a sidecar file.
///
/// Returns `Ok(None)` when the sidecar does not exist yet. A directory at
/// the sidecar path is [`TrackError::Directory`]. Surrounding whitespace is
/// trimmed so a hand-edited sidecar with a trailing newline still compares
/// equal.
pub fn read_fingerprint(path: &Path) -> Result<Option<String>, TrackError> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(TrackError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Ok(meta) if meta.is_dir() => {
            return Err(TrackError::Directory {
                path: path.to_path_buf(),
            })
        }
        Ok(_) => {}
    }
    let content = std::fs::read_to_string(path).map_err(|e| TrackError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(content.trim().to_string()))
}

/// Writes a fingerprint to a sidecar file, replacing any previous content.
///
/// Creates missing parent directories; a sidecar commonly lives next to a
/// generated output whose directory may not exist yet.
pub fn write_fingerprint(path: &Path, fingerprint: &Fingerprint) -> Result<(), TrackError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| TrackError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    std::fs::write(path, fingerprint.to_string()).map_err(|e| TrackError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
