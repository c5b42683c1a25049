//! The fixed catalogue of persisted documents.
//!
//! Every document is one JSON file in the data directory. A [`Document`] pins
//! the file name and the default shape so that nothing above the storage layer
//! ever handles raw file names.

use crate::storage::migrate::{CURRENT_SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use serde_json::{json, Value};
use std::fmt;

/// One named JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    /// Username → plaintext password mapping.
    Users,
    /// Singleton settings record.
    Settings,
    /// Ordered list of tasks.
    Todos,
    /// Ordered list of flashcards.
    Flashcards,
    /// Subject folders with units of note content.
    Notes,
    /// Subjects with units of link lists.
    Resources,
    /// Date-keyed schedule entries plus the legacy bucket.
    Schedule,
}

impl Document {
    /// Every document, in bootstrap order.
    pub const ALL: [Self; 7] = [
        Self::Todos,
        Self::Flashcards,
        Self::Notes,
        Self::Resources,
        Self::Schedule,
        Self::Users,
        Self::Settings,
    ];

    /// File name inside the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Users => "users.json",
            Self::Settings => "settings.json",
            Self::Todos => "todos.json",
            Self::Flashcards => "flashcards.json",
            Self::Notes => "notes.json",
            Self::Resources => "resources.json",
            Self::Schedule => "schedule.json",
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Todos => "todos",
            Self::Flashcards => "flashcards",
            Self::Notes => "notes",
            Self::Resources => "resources",
            Self::Schedule => "schedule",
        }
    }

    /// Whether saves of this document carry a `schema_version` key.
    ///
    /// Only record-shaped documents are stamped. Lists cannot hold a key and
    /// the users mapping is keyed by arbitrary user names.
    #[must_use]
    pub const fn is_versioned(self) -> bool {
        matches!(
            self,
            Self::Settings | Self::Notes | Self::Resources | Self::Schedule
        )
    }

    /// The default content materialized when the file is missing or corrupt.
    #[must_use]
    pub fn default_value(self) -> Value {
        let mut value = match self {
            Self::Users => json!({}),
            Self::Settings => json!({
                "theme": "Pink",
                "dark": false,
                "last_user": "",
                "font": "Avenir",
            }),
            Self::Todos | Self::Flashcards => json!([]),
            Self::Notes => json!({ "folders": {} }),
            Self::Resources => json!({ "subjects": {} }),
            Self::Schedule => json!({}),
        };
        if self.is_versioned() {
            if let Some(map) = value.as_object_mut() {
                map.insert(
                    SCHEMA_VERSION_KEY.to_string(),
                    Value::from(CURRENT_SCHEMA_VERSION),
                );
            }
        }
        value
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
