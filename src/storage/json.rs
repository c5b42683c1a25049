//! JSON file-based document I/O.
//!
//! This module provides the lowest storage layer: one human-readable JSON file
//! per [`Document`] inside a single data directory. It uses atomic file writes
//! (write-to-temp + rename) to prevent truncated documents on crashes, and it
//! repairs missing or corrupt files by writing the caller's default.
//!
//! # File Format
//!
//! Files are UTF-8, pretty-printed with a four-space indent, non-ASCII
//! characters written literally. Object keys are emitted in sorted order so
//! repeated saves of the same value produce byte-identical files.
//!
//! ```json
//! {
//!     "folders": {
//!         "Math": {
//!             "complete": false,
//!             "units": {}
//!         }
//!     },
//!     "schema_version": 2
//! }
//! ```
//!
//! # Write Strategy
//!
//! 1. Serialize the value to `<file>.tmp` in the same directory and sync it.
//! 2. Rename the temp file over the target.
//! 3. If either step fails, write the target directly (non-atomic fallback).
//! 4. Always try to remove the temp file afterwards, whichever path ran.
//!
//! Only when the direct write also fails is an error returned.

use crate::domain::error::Result;
use crate::storage::backend::Storage;
use crate::storage::documents::Document;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Indent used for every document written to disk.
const INDENT: &[u8] = b"    ";

/// Suffix appended to a document file name while it is being written.
const TEMP_SUFFIX: &str = ".tmp";

/// JSON file storage backend rooted at one data directory.
///
/// Holds no document content in memory; every call goes to disk. The data
/// directory is assumed to be used by a single process at a time.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    /// Directory containing one file per document.
    data_dir: PathBuf,
}

impl JsonStorage {
    /// Opens a storage backend on `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use student_helper::storage::JsonStorage;
    ///
    /// let storage = JsonStorage::new("/tmp/student-helper")?;
    /// # Ok::<(), student_helper::StudyError>(())
    /// ```
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tracing::debug!(path = ?data_dir, "initializing JSON storage");
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Directory the documents live in.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a document's file.
    #[must_use]
    pub fn path_for(&self, document: Document) -> PathBuf {
        self.data_dir.join(document.file_name())
    }

    fn temp_path_for(&self, document: Document) -> PathBuf {
        self.data_dir
            .join(format!("{}{TEMP_SUFFIX}", document.file_name()))
    }

    /// Writes `default` over a missing or broken document and hands it back.
    fn materialize_default(&self, document: Document, default: &Value) -> Result<Value> {
        self.save(document, default)?;
        Ok(default.clone())
    }
}

/// Serializes a value the way every document is stored on disk.
fn to_pretty_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

fn write_via_temp(tmp_path: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
    let mut file = File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    tracing::trace!("renaming temporary file to final location");
    fs::rename(tmp_path, path)
}

fn remove_temp(tmp_path: &Path) {
    match fs::remove_file(tmp_path) {
        Ok(()) => tracing::trace!(tmp_path = ?tmp_path, "removed leftover temporary file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(tmp_path = ?tmp_path, error = %e, "could not remove temporary file"),
    }
}

impl Storage for JsonStorage {
    fn load(&self, document: Document, default: &Value) -> Result<Value> {
        let _span = tracing::debug_span!("json_load", document = %document).entered();
        let path = self.path_for(document);

        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("document missing, materializing default");
                return self.materialize_default(document, default);
            }
            Err(e) => {
                tracing::warn!(error = %e, "document unreadable, resetting to default");
                return self.materialize_default(document, default);
            }
        };

        match serde_json::from_slice::<Value>(&contents) {
            Ok(value) => {
                tracing::debug!(bytes = contents.len(), "loaded document");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "document corrupt, resetting to default");
                self.materialize_default(document, default)
            }
        }
    }

    fn save(&self, document: Document, value: &Value) -> Result<()> {
        let _span = tracing::debug_span!("json_save", document = %document).entered();

        let bytes = to_pretty_bytes(value)?;
        let path = self.path_for(document);
        let tmp_path = self.temp_path_for(document);

        let result = match write_via_temp(&tmp_path, &path, &bytes) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "atomic write failed, falling back to direct write");
                fs::write(&path, &bytes)
            }
        };
        remove_temp(&tmp_path);

        result?;
        tracing::debug!(bytes = bytes.len(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonStorage) {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path()).unwrap();
        (dir, storage)
    }

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(TEMP_SUFFIX))
            .collect()
    }

    #[test]
    fn missing_document_materializes_default() {
        let (dir, storage) = setup();
        let default = json!({ "folders": {} });

        let loaded = storage.load(Document::Notes, &default).unwrap();
        assert_eq!(loaded, default);
        assert!(dir.path().join("notes.json").exists());

        let again = storage.load(Document::Notes, &json!({ "other": true })).unwrap();
        assert_eq!(again, default);
    }

    #[test]
    fn corrupt_document_is_reset_once() {
        let (dir, storage) = setup();
        fs::write(dir.path().join("todos.json"), "[{\"text\": \"half").unwrap();

        let loaded = storage.load(Document::Todos, &json!([])).unwrap();
        assert_eq!(loaded, json!([]));

        let on_disk = fs::read_to_string(dir.path().join("todos.json")).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&on_disk).unwrap(), json!([]));
    }

    #[test]
    fn empty_file_counts_as_corrupt() {
        let (dir, storage) = setup();
        fs::write(dir.path().join("users.json"), "").unwrap();
        assert_eq!(storage.load(Document::Users, &json!({})).unwrap(), json!({}));
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, storage) = setup();
        let value = json!({ "alice": "pw", "bob": "secret" });
        storage.save(Document::Users, &value).unwrap();
        assert_eq!(storage.load(Document::Users, &json!({})).unwrap(), value);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let (dir, storage) = setup();
        storage.save(Document::Todos, &json!([1, 2, 3])).unwrap();
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn output_is_indented_and_keeps_non_ascii() {
        let (dir, storage) = setup();
        storage
            .save(Document::Schedule, &json!({ "2024-01-15": ["Révision — ☕"] }))
            .unwrap();

        let text = fs::read_to_string(dir.path().join("schedule.json")).unwrap();
        assert!(text.contains("Révision — ☕"));
        assert!(text.contains("\n    \"2024-01-15\": ["));
    }

    #[test]
    fn output_is_deterministic() {
        let (dir, storage) = setup();
        let value = json!({ "b": 1, "a": 2, "c": { "z": 0, "y": 1 } });
        storage.save(Document::Settings, &value).unwrap();
        let first = fs::read(dir.path().join("settings.json")).unwrap();
        storage.save(Document::Settings, &value).unwrap();
        let second = fs::read(dir.path().join("settings.json")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn falls_back_to_direct_write_when_temp_path_is_blocked() {
        let (dir, storage) = setup();
        fs::create_dir(dir.path().join("flashcards.json.tmp")).unwrap();

        let cards = json!([{ "front": "Q", "back": "A", "known": false }]);
        storage.save(Document::Flashcards, &cards).unwrap();

        assert_eq!(storage.load(Document::Flashcards, &json!([])).unwrap(), cards);
    }

    #[test]
    fn temp_file_is_removed_when_rename_fails() {
        let (dir, storage) = setup();
        let target = dir.path().join("todos.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = storage.save(Document::Todos, &json!([])).unwrap_err();
        assert!(matches!(err, crate::StudyError::Io(_)));
        assert!(leftover_temp_files(dir.path()).is_empty());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn save_fails_when_no_strategy_works() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let storage = JsonStorage::new(&data_dir).unwrap();
        fs::remove_dir_all(&data_dir).unwrap();

        let err = storage.save(Document::Users, &json!({})).unwrap_err();
        assert!(matches!(err, crate::StudyError::Io(_)));
    }
}
