//! Prioritized task list.
//!
//! Tasks are addressed by their position in the stored list. The page splits
//! them into pending and done groups but every row keeps its stored index, so
//! edits made from either group hit the right task.

use crate::app::pages::{Page, PageId, Refresh};
use crate::app::{check_index, required};
use crate::domain::error::Result;
use crate::storage::{Priority, Store, TodoItem};

/// Appends a pending task and returns its index.
///
/// # Errors
///
/// Returns [`crate::StudyError::EmptyInput`] for blank text.
pub fn add_task(store: &Store, text: &str, priority: Priority) -> Result<usize> {
    let text = required(text, "task")?;
    store.update(|todos: &mut Vec<TodoItem>| {
        todos.push(TodoItem::new(text, priority));
        Ok(todos.len() - 1)
    })
}

/// # Errors
///
/// Returns [`crate::StudyError::IndexOutOfRange`] for an unknown index.
pub fn set_done(store: &Store, index: usize, done: bool) -> Result<()> {
    store.update(|todos: &mut Vec<TodoItem>| {
        check_index("task", index, todos.len())?;
        todos[index].done = done;
        Ok(())
    })
}

/// Removes a task and returns it.
///
/// # Errors
///
/// Returns [`crate::StudyError::IndexOutOfRange`] for an unknown index.
pub fn delete_task(store: &Store, index: usize) -> Result<TodoItem> {
    store.update(|todos: &mut Vec<TodoItem>| {
        check_index("task", index, todos.len())?;
        Ok(todos.remove(index))
    })
}

/// The to-do page.
#[derive(Debug, Clone, Default)]
pub struct TodoPage {
    items: Vec<TodoItem>,
    filter: Option<Priority>,
}

impl TodoPage {
    /// # Errors
    ///
    /// Returns an error if the task list cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            items: store.load_todos()?,
            filter: None,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    #[must_use]
    pub fn filter(&self) -> Option<Priority> {
        self.filter
    }

    /// Shows only tasks of one priority, or all with `None`.
    pub fn set_filter(&mut self, filter: Option<Priority>) {
        self.filter = filter;
    }

    /// Visible pending tasks with their stored indices.
    #[must_use]
    pub fn pending(&self) -> Vec<(usize, &TodoItem)> {
        self.rows(false)
    }

    /// Visible finished tasks with their stored indices.
    #[must_use]
    pub fn done(&self) -> Vec<(usize, &TodoItem)> {
        self.rows(true)
    }

    fn rows(&self, done: bool) -> Vec<(usize, &TodoItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.done == done)
            .filter(|(_, item)| self.filter.map_or(true, |p| item.priority == p))
            .collect()
    }
}

impl Refresh for TodoPage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        self.items = store.load_todos()?;
        Ok(())
    }
}

impl Page for TodoPage {
    fn id(&self) -> PageId {
        PageId::Todos
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refresh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;
    use crate::StudyError;

    #[test]
    fn tasks_round_trip() {
        let (_dir, store) = testing::store();
        assert_eq!(add_task(&store, "Read ch. 3", Priority::High).unwrap(), 0);
        assert_eq!(add_task(&store, "Essay", Priority::Low).unwrap(), 1);
        set_done(&store, 0, true).unwrap();

        let todos = store.load_todos().unwrap();
        assert!(todos[0].done);
        assert_eq!(todos[1], TodoItem::new("Essay", Priority::Low));

        assert_eq!(delete_task(&store, 0).unwrap().text, "Read ch. 3");
        assert_eq!(store.load_todos().unwrap().len(), 1);
    }

    #[test]
    fn bad_index_leaves_list_alone() {
        let (_dir, store) = testing::store();
        add_task(&store, "Only", Priority::Medium).unwrap();
        assert!(matches!(
            delete_task(&store, 3),
            Err(StudyError::IndexOutOfRange { kind: "task", index: 3, len: 1 })
        ));
        assert!(set_done(&store, 1, true).is_err());
        assert_eq!(store.load_todos().unwrap().len(), 1);
    }

    #[test]
    fn page_partitions_and_filters() {
        let (_dir, store) = testing::store();
        add_task(&store, "a", Priority::High).unwrap();
        add_task(&store, "b", Priority::Low).unwrap();
        add_task(&store, "c", Priority::High).unwrap();
        set_done(&store, 1, true).unwrap();
        set_done(&store, 2, true).unwrap();

        let mut page = TodoPage::load(&store).unwrap();
        let pending: Vec<usize> = page.pending().iter().map(|(i, _)| *i).collect();
        let done: Vec<usize> = page.done().iter().map(|(i, _)| *i).collect();
        assert_eq!(pending, vec![0]);
        assert_eq!(done, vec![1, 2]);

        page.set_filter(Some(Priority::High));
        let done: Vec<usize> = page.done().iter().map(|(i, _)| *i).collect();
        assert_eq!(done, vec![2]);
    }
}
