//! Application layer: the operations each page performs on the store.
//!
//! Every mutation is a full load-mutate-save round trip through
//! [`Store::update`](crate::storage::Store::update). Input is validated inside
//! the closure, before anything is written, so a rejected operation leaves the
//! document on disk untouched.
//!
//! Pages keep their own copy of the documents they show. They do not observe
//! each other; a page sees another page's edits after [`pages::refresh_all`]
//! or its own refresh.
//!
//! # Modules
//!
//! - [`auth`]: Sign-up, log-in and account removal
//! - [`settings`]: Theme, dark mode and font preferences
//! - [`todos`]: Prioritized task list
//! - [`notes`]: Subject folders split into units of text
//! - [`flashcards`]: Two-sided cards with a known flag
//! - [`resources`]: Study links grouped by subject and unit
//! - [`schedule`]: Calendar entries per date
//! - [`dashboard`]: Progress summaries across documents
//! - [`pages`]: Page identity and the optional refresh capability

pub mod auth;
pub mod dashboard;
pub mod flashcards;
pub mod notes;
pub mod pages;
pub mod resources;
pub mod schedule;
pub mod settings;
pub mod todos;

pub use auth::{LoginPage, Session};
pub use dashboard::{DashboardPage, Progress};
pub use flashcards::FlashcardsPage;
pub use notes::NotesPage;
pub use pages::{refresh_all, Page, PageId, Refresh};
pub use resources::ResourcesPage;
pub use schedule::{DayView, SchedulePage};
pub use settings::SettingsPage;
pub use todos::TodoPage;

use crate::domain::error::{Result, StudyError};

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(value: &str, what: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StudyError::EmptyInput(what));
    }
    Ok(trimmed.to_string())
}

/// Fails unless `index` addresses one of `len` entries.
pub(crate) fn check_index(kind: &'static str, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(StudyError::IndexOutOfRange { kind, index, len });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims() {
        assert_eq!(required("  Math ", "folder").unwrap(), "Math");
        assert!(matches!(required("   ", "folder"), Err(StudyError::EmptyInput("folder"))));
    }

    #[test]
    fn check_index_bounds() {
        assert!(check_index("task", 0, 1).is_ok());
        assert!(matches!(
            check_index("task", 1, 1),
            Err(StudyError::IndexOutOfRange { kind: "task", index: 1, len: 1 })
        ));
    }
}
