//! Typed document accessors.
//!
//! [`Store`] sits on top of a [`Storage`] backend and is the only thing the
//! application layer talks to. Every load goes through the same pipeline:
//!
//! 1. raw load from the backend (missing/corrupt files become the default)
//! 2. version split, shape migration and entry repair
//!    ([`crate::storage::migrate`])
//! 3. immediate write-back if migration changed anything
//! 4. decode into the typed record
//!
//! Malformed entries are repaired one by one, so a single bad folder or user
//! never costs the rest of the document. A value whose outer structure still
//! does not decode is treated like corruption: the document is reset to its
//! default.
//!
//! Saves never lower the `schema_version` already on disk, and keys the typed
//! records do not know are carried through in their `extra` maps.
//!
//! Nothing is cached. Each accessor call goes to disk, so two pages holding
//! their own copies only see each other's changes after reloading.

use crate::domain::error::{Result, StudyError};
use crate::storage::backend::Storage;
use crate::storage::documents::Document;
use crate::storage::json::JsonStorage;
use crate::storage::migrate::{self, CURRENT_SCHEMA_VERSION};
use crate::storage::models::{
    Flashcard, Notes, Resources, Schedule, Settings, TodoItem, TypedDocument, Users,
};
use std::path::PathBuf;

/// Typed access to every persisted document.
pub struct Store {
    backend: Box<dyn Storage>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Opens a store backed by JSON files in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use student_helper::storage::Store;
    ///
    /// let store = Store::open("/tmp/student-helper")?;
    /// let settings = store.load_settings()?;
    /// println!("theme: {}", settings.theme);
    /// # Ok::<(), student_helper::StudyError>(())
    /// ```
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_backend(Box::new(JsonStorage::new(data_dir)?)))
    }

    /// Wraps an arbitrary backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn Storage>) -> Self {
        Self { backend }
    }

    /// Touches every document once so the full set exists on disk in its
    /// current shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a default or migrated document cannot be written.
    pub fn ensure_all_defaults(&self) -> Result<()> {
        let _span = tracing::debug_span!("ensure_all_defaults").entered();
        self.load::<Vec<TodoItem>>()?;
        self.load::<Vec<Flashcard>>()?;
        self.load::<Notes>()?;
        self.load::<Resources>()?;
        self.load::<Schedule>()?;
        self.load::<Users>()?;
        self.load::<Settings>()?;
        tracing::debug!(documents = Document::ALL.len(), "all documents present");
        Ok(())
    }

    /// Loads, migrates and decodes a document.
    ///
    /// # Errors
    ///
    /// Returns an error only if a repaired document cannot be written back.
    pub fn load<T: TypedDocument>(&self) -> Result<T> {
        let document = T::DOCUMENT;
        let default = document.default_value();
        let raw = self.backend.load(document, &default)?;

        let upgrade = migrate::upgrade(document, raw);
        if upgrade.changed {
            tracing::info!(
                document = %document,
                from_version = upgrade.from_version,
                "writing back upgraded document"
            );
            let stamped = migrate::stamp(document, upgrade.value.clone(), upgrade.schema_version);
            self.backend.save(document, &stamped)?;
        }

        match serde_json::from_value(upgrade.value) {
            Ok(typed) => Ok(typed),
            Err(e) => {
                tracing::warn!(
                    document = %document,
                    error = %e,
                    "document does not match its current shape, resetting to default"
                );
                self.backend.save(document, &default)?;
                let (_, body) = migrate::split_version(default);
                serde_json::from_value(body).map_err(|e| {
                    StudyError::Storage(format!("default {document} document does not decode: {e}"))
                })
            }
        }
    }

    /// Replaces a document with `value`, stamping the schema version where the
    /// document carries one.
    ///
    /// The stamp is [`CURRENT_SCHEMA_VERSION`] unless the file on disk already
    /// carries a newer one, which is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or every write strategy fails.
    pub fn save<T: TypedDocument>(&self, value: &T) -> Result<()> {
        let document = T::DOCUMENT;
        let body = serde_json::to_value(value)?;
        let stamped = migrate::stamp(document, body, self.stamp_version(document)?);
        self.backend.save(document, &stamped)
    }

    fn stamp_version(&self, document: Document) -> Result<u64> {
        if !document.is_versioned() {
            return Ok(CURRENT_SCHEMA_VERSION);
        }
        let raw = self.backend.load(document, &document.default_value())?;
        let (on_disk, _) = migrate::split_version(raw);
        Ok(on_disk.max(CURRENT_SCHEMA_VERSION))
    }

    /// Load-mutate-save round trip.
    ///
    /// Nothing is written when `f` returns an error, so validation failures
    /// leave the document untouched.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error from loading or saving.
    pub fn update<T, R>(&self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R>
    where
        T: TypedDocument,
    {
        let mut value = self.load::<T>()?;
        let result = f(&mut value)?;
        self.save(&value)?;
        Ok(result)
    }

    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_users(&self) -> Result<Users> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    pub fn save_users(&self, users: &Users) -> Result<()> {
        self.save(users)
    }

    /// Loads settings with every missing key backfilled from the defaults.
    ///
    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_settings(&self) -> Result<Settings> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save(settings)
    }

    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_todos(&self) -> Result<Vec<TodoItem>> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    #[allow(clippy::ptr_arg)]
    pub fn save_todos(&self, todos: &Vec<TodoItem>) -> Result<()> {
        self.save(todos)
    }

    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_flashcards(&self) -> Result<Vec<Flashcard>> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    #[allow(clippy::ptr_arg)]
    pub fn save_flashcards(&self, cards: &Vec<Flashcard>) -> Result<()> {
        self.save(cards)
    }

    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_notes(&self) -> Result<Notes> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    pub fn save_notes(&self, notes: &Notes) -> Result<()> {
        self.save(notes)
    }

    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_resources(&self) -> Result<Resources> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    pub fn save_resources(&self, resources: &Resources) -> Result<()> {
        self.save(resources)
    }

    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn load_schedule(&self) -> Result<Schedule> {
        self.load()
    }

    /// # Errors
    ///
    /// See [`Store::save`].
    pub fn save_schedule(&self, schedule: &Schedule) -> Result<()> {
        self.save(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Backend keeping documents in memory and counting saves.
    #[derive(Default)]
    struct MemoryStorage {
        docs: RefCell<HashMap<&'static str, Value>>,
        saves: RefCell<usize>,
    }

    impl MemoryStorage {
        fn with(document: Document, value: Value) -> Self {
            let storage = Self::default();
            storage.docs.borrow_mut().insert(document.name(), value);
            storage
        }
    }

    impl Storage for std::rc::Rc<MemoryStorage> {
        fn load(&self, document: Document, default: &Value) -> Result<Value> {
            let existing = self.docs.borrow().get(document.name()).cloned();
            match existing {
                Some(value) => Ok(value),
                None => {
                    self.save(document, default)?;
                    Ok(default.clone())
                }
            }
        }

        fn save(&self, document: Document, value: &Value) -> Result<()> {
            *self.saves.borrow_mut() += 1;
            self.docs.borrow_mut().insert(document.name(), value.clone());
            Ok(())
        }
    }

    fn store_over(storage: MemoryStorage) -> (std::rc::Rc<MemoryStorage>, Store) {
        let storage = std::rc::Rc::new(storage);
        let store = Store::with_backend(Box::new(std::rc::Rc::clone(&storage)));
        (storage, store)
    }

    #[test]
    fn migration_is_written_back_once() {
        let (storage, store) = store_over(MemoryStorage::with(Document::Notes, json!(["Math"])));

        let notes = store.load_notes().unwrap();
        assert!(notes.folders.contains_key("Math"));
        assert_eq!(*storage.saves.borrow(), 1);
        assert_eq!(storage.docs.borrow()["notes"]["schema_version"], json!(2));

        store.load_notes().unwrap();
        assert_eq!(*storage.saves.borrow(), 1);
    }

    #[test]
    fn undecodable_document_resets_to_default() {
        let raw = json!({ "schema_version": 2, "folders": 5 });
        let (storage, store) = store_over(MemoryStorage::with(Document::Notes, raw));

        assert_eq!(store.load_notes().unwrap(), Notes::default());
        assert_eq!(storage.docs.borrow()["notes"], Document::Notes.default_value());
    }

    #[test]
    fn one_bad_entry_does_not_reset_the_document() {
        let raw = json!({ "ana": "pw", "bob": 123, "cy": null });
        let (storage, store) = store_over(MemoryStorage::with(Document::Users, raw));

        let users = store.load_users().unwrap();
        assert_eq!(users["ana"], "pw");
        assert_eq!(users["bob"], "123");
        assert!(!users.contains_key("cy"));
        assert_eq!(storage.docs.borrow()["users"], json!({ "ana": "pw", "bob": "123" }));
    }

    #[test]
    fn save_keeps_a_newer_stamp() {
        let raw = json!({ "schema_version": 7, "subjects": {} });
        let (storage, store) = store_over(MemoryStorage::with(Document::Resources, raw));

        let resources = store.load_resources().unwrap();
        store.save_resources(&resources).unwrap();
        assert_eq!(storage.docs.borrow()["resources"]["schema_version"], json!(7));

        store.save_notes(&Notes::default()).unwrap();
        assert_eq!(storage.docs.borrow()["notes"]["schema_version"], json!(2));
    }

    #[test]
    fn update_does_not_save_on_error() {
        let (storage, store) = store_over(MemoryStorage::with(Document::Todos, json!([])));

        let result: Result<()> = store.update(|todos: &mut Vec<TodoItem>| {
            todos.push(TodoItem::new("never saved", Default::default()));
            Err(StudyError::EmptyInput("task"))
        });
        assert!(result.is_err());
        assert_eq!(*storage.saves.borrow(), 0);
        assert!(store.load_todos().unwrap().is_empty());
    }

    #[test]
    fn save_stamps_versioned_documents_only() {
        let (storage, store) = store_over(MemoryStorage::default());

        store.save_schedule(&Schedule::default()).unwrap();
        store.save_users(&Users::new()).unwrap();

        assert_eq!(storage.docs.borrow()["schedule"], json!({ "schema_version": 2 }));
        assert_eq!(storage.docs.borrow()["users"], json!({}));
    }
}
