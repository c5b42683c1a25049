//! Typed document records.
//!
//! These are the shapes the application works with after migration. The
//! `schema_version` stamp is a storage concern and never appears here.
//!
//! Mappings use `BTreeMap` so that names come out sorted and saves are
//! deterministic.
//!
//! Records that may gain fields in later releases collect the keys they do not
//! know in an `extra` map and write them back unchanged.

use crate::domain::Palette;
use crate::storage::documents::Document;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Font family used when settings do not name one.
pub const DEFAULT_FONT: &str = "Avenir";

/// A typed record persisted as exactly one [`Document`].
pub trait TypedDocument: Serialize + DeserializeOwned {
    /// The document this record is stored in.
    const DOCUMENT: Document;
}

/// Username to plaintext password.
pub type Users = BTreeMap<String, String>;

impl TypedDocument for Users {
    const DOCUMENT: Document = Document::Users;
}

/// Application-wide preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Selected colour palette.
    pub theme: Palette,
    /// Whether dark mode is on.
    pub dark: bool,
    /// Name of the most recently signed-in user, empty when none.
    pub last_user: String,
    /// Font family name.
    pub font: String,
    /// Keys written by other releases.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Palette::default(),
            dark: false,
            last_user: String::new(),
            font: DEFAULT_FONT.to_string(),
            extra: Map::new(),
        }
    }
}

impl TypedDocument for Settings {
    const DOCUMENT: Document = Document::Settings;
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the to-do list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
}

impl TodoItem {
    /// A pending task.
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            priority,
            done: false,
        }
    }
}

impl TypedDocument for Vec<TodoItem> {
    const DOCUMENT: Document = Document::Todos;
}

/// A two-sided study card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub known: bool,
}

impl Flashcard {
    /// A card not yet marked as known.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            known: false,
        }
    }
}

impl TypedDocument for Vec<Flashcard> {
    const DOCUMENT: Document = Document::Flashcards;
}

/// Subject folders, each split into units of free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    #[serde(default)]
    pub folders: BTreeMap<String, Folder>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One subject folder of the notes document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Whether the user marked the whole folder as studied.
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub units: BTreeMap<String, Unit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named piece of note text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(default)]
    pub content: String,
}

impl TypedDocument for Notes {
    const DOCUMENT: Document = Document::Notes;
}

/// Study links grouped by subject and unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub subjects: BTreeMap<String, Subject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One subject of the resources document. Each unit holds an ordered list of
/// URLs; duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub units: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TypedDocument for Resources {
    const DOCUMENT: Document = Document::Resources;
}

/// Calendar entries keyed by `yyyy-MM-dd`, plus entries that predate the
/// calendar and have no date.
///
/// On disk the undated entries live under the `__all__` key next to the date
/// keys. They are kept apart here so they are never mistaken for a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "__all__", default, skip_serializing_if = "Vec::is_empty")]
    pub legacy: Vec<String>,
    #[serde(flatten)]
    pub days: BTreeMap<String, Vec<String>>,
}

impl TypedDocument for Schedule {
    const DOCUMENT: Document = Document::Schedule;
}
