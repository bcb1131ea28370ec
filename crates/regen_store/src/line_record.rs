//! Flat-file fingerprint store with alternating key/value lines.
//!
//! The on-disk format is a plain text file of newline-terminated lines:
//! even-indexed lines are keys, the immediately following odd line is the
//! associated value.
//!
//! ```text
//! 0  key
//! 1  value
//! 2  key
//! 3  value
//! ```
//!
//! Lookups scan from the start of the file and the earliest occurrence of a
//! key wins. Updates overwrite the value's byte span in place, which only
//! works because values for a given key keep a fixed encoded length; a
//! different length is rejected rather than allowed to corrupt neighboring
//! records. New pairs are appended, restoring key/value line parity first if
//! a partial prior write left an odd number of lines.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::store::FingerprintStore;

/// File-backed [`FingerprintStore`] holding alternating key/value lines.
///
/// Owns an exclusive handle to one file for its lifetime. The store assumes
/// single-writer, single-process use; it takes no locks.
pub struct LineRecordStore {
    /// Path of the backing file.
    path: PathBuf,

    /// Open handle; `None` once the store has been closed.
    file: Option<File>,
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl LineRecordStore {
    /// Opens the store at `path`, creating the file and any missing parent
    /// directories on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file from the beginning.
    fn read_all(&mut self) -> Result<String, StoreError> {
        let path = self.path.clone();
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Closed { path: path.clone() })?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| io_err(&path, e))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| io_err(&path, e))?;
        Ok(content)
    }

    /// Writes `data` at byte offset `start`, leaving the rest of the file
    /// untouched.
    fn write_at(&mut self, start: u64, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path.clone();
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Closed { path: path.clone() })?;
        file.seek(SeekFrom::Start(start))
            .map_err(|e| io_err(&path, e))?;
        file.write_all(data).map_err(|e| io_err(&path, e))
    }

    /// Appends `data` at the end of the file.
    fn append(&mut self, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path.clone();
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Closed { path: path.clone() })?;
        file.seek(SeekFrom::End(0)).map_err(|e| io_err(&path, e))?;
        file.write_all(data).map_err(|e| io_err(&path, e))
    }
}

/// Returns the byte span of the value line for the first occurrence of
/// `key`, excluding the terminating newline.
///
/// A key on the final line with no following value line yields `None`.
fn value_span(content: &str, key: &str) -> Option<Range<usize>> {
    let mut offset = 0;
    let mut index = 0usize;
    let mut next_is_value = false;
    while offset < content.len() {
        let rest = &content[offset..];
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_end];
        if next_is_value {
            return Some(offset..offset + line.len());
        }
        if index % 2 == 0 && line == key {
            next_is_value = true;
        }
        offset += line_end + 1;
        index += 1;
    }
    None
}

/// Rejects text the line format cannot hold on a single line.
fn check_line(text: &str) -> Result<(), StoreError> {
    if text.contains('\n') || text.contains('\r') {
        return Err(StoreError::InvalidRecord {
            text: text.to_string(),
        });
    }
    Ok(())
}

impl FingerprintStore for LineRecordStore {
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_line(key)?;
        check_line(value)?;

        let content = self.read_all()?;
        if let Some(span) = value_span(&content, key) {
            let existing = &content[span.clone()];
            if existing == value {
                return Ok(());
            }
            if existing.len() != value.len() {
                return Err(StoreError::ValueSize {
                    key: key.to_string(),
                    expected: existing.len(),
                    actual: value.len(),
                });
            }
            self.write_at(span.start as u64, value.as_bytes())?;
        } else {
            let mut record = String::new();
            if !content.is_empty() && !content.ends_with('\n') {
                // Terminate a final line left without a newline.
                record.push('\n');
            }
            if content.lines().count() % 2 == 1 {
                // Blank filler line so the new key lands on an even index.
                record.push('\n');
            }
            record.push_str(key);
            record.push('\n');
            record.push_str(value);
            record.push('\n');
            self.append(record.as_bytes())?;
        }
        self.sync()
    }

    fn has(&mut self, key: &str) -> bool {
        // The value line may be empty; only a missing value line counts
        // as absent.
        match self.read_all() {
            Ok(content) => value_span(&content, key).is_some(),
            Err(_) => false,
        }
    }

    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let content = self.read_all()?;
        Ok(value_span(&content, key).map(|span| content[span].to_string()))
    }

    fn sync(&mut self) -> Result<(), StoreError> {
        let path = self.path.clone();
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Closed { path: path.clone() })?;
        file.sync_all().map_err(|e| io_err(&path, e))
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(|e| io_err(&self.path, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_in(dir: &tempfile::TempDir, name: &str) -> LineRecordStore {
        LineRecordStore::open(dir.path().join(name)).unwrap()
    }

    #[test]
    fn open_creates_file_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deeply").join("nested").join("db.txt");
        let store = LineRecordStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path);
    }

    #[test]
    fn put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        store.put("testKey", "TESTValue").unwrap();
        store.put("testKey2", "TESTValue2").unwrap();
        store.put("testKey3", "TESTValue3").unwrap();

        assert_eq!(store.get("testKey").unwrap().as_deref(), Some("TESTValue"));
        assert_eq!(
            store.get("testKey2").unwrap().as_deref(),
            Some("TESTValue2")
        );
        assert_eq!(
            store.get("testKey3").unwrap().as_deref(),
            Some("TESTValue3")
        );
    }

    #[test]
    fn get_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        assert_eq!(store.get("absent").unwrap(), None);
        assert!(!store.has("absent"));
    }

    #[test]
    fn has_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        store.put("k", "v").unwrap();
        assert!(store.has("k"));
    }

    #[test]
    fn empty_value_counts_as_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        store.put("k", "").unwrap();
        assert!(store.has("k"));
        assert_eq!(store.get("k").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn same_length_overwrite_keeps_file_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        let mut store = LineRecordStore::open(&path).unwrap();
        store.put("k", "aaaa").unwrap();
        store.put("other", "value").unwrap();
        let before = std::fs::metadata(&path).unwrap().len();

        store.put("k", "bbbb").unwrap();
        let after = std::fs::metadata(&path).unwrap().len();
        assert_eq!(before, after);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("bbbb"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn equal_value_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        let mut store = LineRecordStore::open(&path).unwrap();
        store.put("k", "stable").unwrap();
        let before = std::fs::read(&path).unwrap();
        store.put("k", "stable").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn different_length_update_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        let mut store = LineRecordStore::open(&path).unwrap();
        store.put("k", "short").unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = store.put("k", "much longer value").unwrap_err();
        match err {
            StoreError::ValueSize {
                key,
                expected,
                actual,
            } => {
                assert_eq!(key, "k");
                assert_eq!(expected, 5);
                assert_eq!(actual, 17);
            }
            other => panic!("expected ValueSize, got {other:?}"),
        }
        // The file must be untouched after a rejected update.
        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn first_match_wins_on_duplicate_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        std::fs::write(&path, "k\nv1\nk\nv2\n").unwrap();

        let mut store = LineRecordStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        // An update targets the first occurrence and leaves the second alone.
        store.put("k", "v9").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "k\nv9\nk\nv2\n");
    }

    #[test]
    fn append_repairs_odd_line_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        std::fs::write(&path, "a\n1\nstray").unwrap();

        let mut store = LineRecordStore::open(&path).unwrap();
        store.put("b", "2").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "a\n1\nstray\n\nb\n2\n"
        );
    }

    #[test]
    fn append_terminates_unterminated_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        std::fs::write(&path, "a\n1").unwrap();

        let mut store = LineRecordStore::open(&path).unwrap();
        store.put("b", "2").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\nb\n2\n");
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn key_without_value_line_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        std::fs::write(&path, "dangling").unwrap();

        let mut store = LineRecordStore::open(&path).unwrap();
        assert!(!store.has("dangling"));
        assert_eq!(store.get("dangling").unwrap(), None);
    }

    #[test]
    fn value_line_never_matches_as_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        std::fs::write(&path, "a\nb\nb\n2\n").unwrap();

        let mut store = LineRecordStore::open(&path).unwrap();
        // "b" as a value on line 1 must not shadow "b" as a key on line 2.
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn line_breaks_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        assert!(matches!(
            store.put("two\nlines", "v"),
            Err(StoreError::InvalidRecord { .. })
        ));
        assert!(matches!(
            store.put("k", "v\r"),
            Err(StoreError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        store.put("k", "v").unwrap();
        store.close().unwrap();
        store.close().unwrap();
    }

    #[test]
    fn operations_after_close() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        store.put("k", "v").unwrap();
        store.close().unwrap();

        assert!(matches!(
            store.put("k2", "v2"),
            Err(StoreError::Closed { .. })
        ));
        assert!(matches!(store.get("k"), Err(StoreError::Closed { .. })));
        assert!(!store.has("k"));
    }

    #[test]
    fn reopen_sees_persisted_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        {
            let mut store = LineRecordStore::open(&path).unwrap();
            store.put("k", "v").unwrap();
            store.close().unwrap();
        }
        let mut store = LineRecordStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn sync_succeeds_on_open_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir, "db.txt");
        store.put("k", "v").unwrap();
        store.sync().unwrap();
    }
}
