//! Progress summaries shown on the dashboard.

use crate::app::pages::{Page, PageId, Refresh};
use crate::domain::error::Result;
use crate::storage::{Flashcard, Notes, Store, TodoItem};
use std::fmt;

/// `done` out of `total`, with what is being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    /// Plural noun for the label, e.g. `"tasks"`.
    pub unit: &'static str,
}

impl Progress {
    #[must_use]
    pub const fn new(done: usize, total: usize, unit: &'static str) -> Self {
        Self { done, total, unit }
    }

    /// Whole percent, truncated toward zero. Zero when there is nothing to count.
    ///
    /// ```
    /// use student_helper::app::Progress;
    ///
    /// assert_eq!(Progress::new(1, 3, "tasks").percent(), 33);
    /// assert_eq!(Progress::new(0, 0, "tasks").percent(), 0);
    /// ```
    #[must_use]
    pub const fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.done * 100 / self.total
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} {}", self.done, self.total, self.unit)
    }
}

/// Finished tasks out of all tasks.
#[must_use]
pub fn todo_progress(todos: &[TodoItem]) -> Progress {
    let done = todos.iter().filter(|t| t.done).count();
    Progress::new(done, todos.len(), "tasks")
}

/// Known cards out of all cards.
#[must_use]
pub fn flashcard_progress(cards: &[Flashcard]) -> Progress {
    let known = cards.iter().filter(|c| c.known).count();
    Progress::new(known, cards.len(), "cards")
}

/// Folders marked complete out of all folders.
#[must_use]
pub fn notes_progress(notes: &Notes) -> Progress {
    let complete = notes.folders.values().filter(|f| f.complete).count();
    Progress::new(complete, notes.folders.len(), "folders")
}

/// The dashboard page: one progress ring per tracked document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardPage {
    pub todos: Progress,
    pub flashcards: Progress,
    pub notes: Progress,
}

impl DashboardPage {
    /// # Errors
    ///
    /// Returns an error if a tracked document cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        let _span = tracing::debug_span!("dashboard_load").entered();
        Ok(Self {
            todos: todo_progress(&store.load_todos()?),
            flashcards: flashcard_progress(&store.load_flashcards()?),
            notes: notes_progress(&store.load_notes()?),
        })
    }

    /// The three summaries in display order.
    #[must_use]
    pub fn all(&self) -> [Progress; 3] {
        [self.todos, self.flashcards, self.notes]
    }
}

impl Refresh for DashboardPage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        *self = Self::load(store)?;
        Ok(())
    }
}

impl Page for DashboardPage {
    fn id(&self) -> PageId {
        PageId::Dashboard
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refresh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;
    use crate::app::{flashcards, notes, todos};
    use crate::storage::Priority;

    #[test]
    fn percent_truncates() {
        assert_eq!(Progress::new(2, 3, "tasks").percent(), 66);
        assert_eq!(Progress::new(3, 3, "tasks").percent(), 100);
        assert_eq!(Progress::new(3, 5, "tasks").to_string(), "3 / 5 tasks");
    }

    #[test]
    fn empty_store_shows_zero() {
        let (_dir, store) = testing::store();
        let page = DashboardPage::load(&store).unwrap();
        for progress in page.all() {
            assert_eq!((progress.done, progress.total, progress.percent()), (0, 0, 0));
        }
    }

    #[test]
    fn counts_follow_documents() {
        let (_dir, store) = testing::store();
        todos::add_task(&store, "a", Priority::High).unwrap();
        todos::add_task(&store, "b", Priority::Low).unwrap();
        todos::set_done(&store, 0, true).unwrap();
        flashcards::add_card(&store, "Q", "A").unwrap();
        notes::add_folder(&store, "Math").unwrap();
        notes::add_folder(&store, "Art").unwrap();
        notes::set_folder_complete(&store, "Art", true).unwrap();

        let mut page = DashboardPage::load(&store).unwrap();
        assert_eq!(page.todos.to_string(), "1 / 2 tasks");
        assert_eq!(page.todos.percent(), 50);
        assert_eq!(page.flashcards.to_string(), "0 / 1 cards");
        assert_eq!(page.notes.percent(), 50);

        flashcards::mark_known(&store, 0).unwrap();
        page.refresh(&store).unwrap();
        assert_eq!(page.flashcards.percent(), 100);
    }
}
