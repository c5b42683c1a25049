//! Storage layer for the persisted study documents.
//!
//! Seven JSON documents live side by side in one data directory. This module
//! owns everything between the bytes on disk and the typed records the
//! application edits.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file storage with atomic writes and corruption repair
//! - `documents`: The fixed document catalogue with file names and defaults
//! - `migrate`: Shape normalizers and schema version dispatch
//! - `models`: Typed document records
//! - `store`: Typed accessors combining the above

pub mod backend;
pub mod documents;
pub mod json;
pub mod migrate;
pub mod models;
pub mod store;

pub use backend::Storage;
pub use documents::Document;
pub use json::JsonStorage;
pub use models::{
    Flashcard, Folder, Notes, Priority, Resources, Schedule, Settings, Subject, TodoItem,
    TypedDocument, Unit, Users,
};
pub use store::Store;
