//! Subject folders split into units of free text.

use crate::app::pages::{Page, PageId, Refresh};
use crate::app::required;
use crate::domain::error::{Result, StudyError};
use crate::storage::{Folder, Notes, Store, Unit};

fn folder_mut<'a>(notes: &'a mut Notes, name: &str) -> Result<&'a mut Folder> {
    notes.folders.get_mut(name).ok_or_else(|| StudyError::NotFound {
        kind: "folder",
        name: name.to_string(),
    })
}

fn unit_mut<'a>(folder: &'a mut Folder, name: &str) -> Result<&'a mut Unit> {
    folder.units.get_mut(name).ok_or_else(|| StudyError::NotFound {
        kind: "unit",
        name: name.to_string(),
    })
}

/// Creates an empty, incomplete folder.
///
/// # Errors
///
/// - [`StudyError::EmptyInput`] for a blank name
/// - [`StudyError::AlreadyExists`] if the folder exists
pub fn add_folder(store: &Store, name: &str) -> Result<()> {
    let name = required(name, "folder")?;
    store.update(|notes: &mut Notes| {
        if notes.folders.contains_key(&name) {
            return Err(StudyError::AlreadyExists { kind: "folder", name: name.clone() });
        }
        tracing::debug!(folder = %name, "adding folder");
        notes.folders.insert(name, Folder::default());
        Ok(())
    })
}

/// Removes a folder with all its units.
///
/// # Errors
///
/// Returns [`StudyError::NotFound`] if the folder does not exist.
pub fn delete_folder(store: &Store, name: &str) -> Result<()> {
    store.update(|notes: &mut Notes| {
        notes
            .folders
            .remove(name)
            .map(drop)
            .ok_or_else(|| StudyError::NotFound { kind: "folder", name: name.to_string() })
    })
}

/// # Errors
///
/// Returns [`StudyError::NotFound`] if the folder does not exist.
pub fn set_folder_complete(store: &Store, name: &str, complete: bool) -> Result<()> {
    store.update(|notes: &mut Notes| {
        folder_mut(notes, name)?.complete = complete;
        Ok(())
    })
}

/// Creates an empty unit inside a folder.
///
/// # Errors
///
/// - [`StudyError::EmptyInput`] for a blank unit name
/// - [`StudyError::NotFound`] if the folder does not exist
/// - [`StudyError::AlreadyExists`] if the unit exists
pub fn add_unit(store: &Store, folder: &str, unit: &str) -> Result<()> {
    let unit = required(unit, "unit")?;
    store.update(|notes: &mut Notes| {
        let folder = folder_mut(notes, folder)?;
        if folder.units.contains_key(&unit) {
            return Err(StudyError::AlreadyExists { kind: "unit", name: unit.clone() });
        }
        folder.units.insert(unit, Unit::default());
        Ok(())
    })
}

/// # Errors
///
/// Returns [`StudyError::NotFound`] if the folder or unit does not exist.
pub fn delete_unit(store: &Store, folder: &str, unit: &str) -> Result<()> {
    store.update(|notes: &mut Notes| {
        folder_mut(notes, folder)?
            .units
            .remove(unit)
            .map(drop)
            .ok_or_else(|| StudyError::NotFound { kind: "unit", name: unit.to_string() })
    })
}

/// Replaces a unit's text. Content is stored verbatim, whitespace included.
///
/// # Errors
///
/// Returns [`StudyError::NotFound`] if the folder or unit does not exist.
pub fn save_unit_content(store: &Store, folder: &str, unit: &str, content: &str) -> Result<()> {
    store.update(|notes: &mut Notes| {
        unit_mut(folder_mut(notes, folder)?, unit)?.content = content.to_string();
        Ok(())
    })
}

/// The notes page: folder list, unit list of the selected folder, editor for
/// the selected unit.
#[derive(Debug, Clone, Default)]
pub struct NotesPage {
    notes: Notes,
    folder: Option<String>,
    unit: Option<String>,
}

impl NotesPage {
    /// # Errors
    ///
    /// Returns an error if the notes document cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            notes: store.load_notes()?,
            ..Self::default()
        })
    }

    /// Folder names in display order.
    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.notes.folders.keys().map(String::as_str)
    }

    /// Unit names of the selected folder in display order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.selected_folder()
            .into_iter()
            .flat_map(|folder| folder.units.keys().map(String::as_str))
    }

    #[must_use]
    pub fn selected_folder(&self) -> Option<&Folder> {
        self.folder.as_ref().and_then(|name| self.notes.folders.get(name))
    }

    /// Text of the selected unit.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        let unit = self.unit.as_ref()?;
        self.selected_folder()?
            .units
            .get(unit)
            .map(|u| u.content.as_str())
    }

    /// Selects a folder and clears the unit selection.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] if the folder does not exist.
    pub fn select_folder(&mut self, name: &str) -> Result<()> {
        if !self.notes.folders.contains_key(name) {
            return Err(StudyError::NotFound { kind: "folder", name: name.to_string() });
        }
        self.folder = Some(name.to_string());
        self.unit = None;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] if no folder is selected or the unit
    /// is not in it.
    pub fn select_unit(&mut self, name: &str) -> Result<()> {
        let exists = self
            .selected_folder()
            .is_some_and(|folder| folder.units.contains_key(name));
        if !exists {
            return Err(StudyError::NotFound { kind: "unit", name: name.to_string() });
        }
        self.unit = Some(name.to_string());
        Ok(())
    }
}

impl Refresh for NotesPage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        self.notes = store.load_notes()?;
        if self.selected_folder().is_none() {
            self.folder = None;
            self.unit = None;
        } else if self.content().is_none() {
            self.unit = None;
        }
        Ok(())
    }
}

impl Page for NotesPage {
    fn id(&self) -> PageId {
        PageId::Notes
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refresh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;

    #[test]
    fn folder_and_unit_lifecycle() {
        let (_dir, store) = testing::store();
        add_folder(&store, "Biology").unwrap();
        add_unit(&store, "Biology", "Cells").unwrap();
        save_unit_content(&store, "Biology", "Cells", "mitochondria\n").unwrap();
        set_folder_complete(&store, "Biology", true).unwrap();

        let notes = store.load_notes().unwrap();
        let bio = &notes.folders["Biology"];
        assert!(bio.complete);
        assert_eq!(bio.units["Cells"].content, "mitochondria\n");

        delete_unit(&store, "Biology", "Cells").unwrap();
        delete_folder(&store, "Biology").unwrap();
        assert!(store.load_notes().unwrap().folders.is_empty());
    }

    #[test]
    fn duplicates_and_missing_names_are_rejected() {
        let (_dir, store) = testing::store();
        add_folder(&store, "Math").unwrap();
        assert!(matches!(add_folder(&store, " Math "), Err(StudyError::AlreadyExists { .. })));
        assert!(matches!(add_unit(&store, "Art", "x"), Err(StudyError::NotFound { kind: "folder", .. })));
        assert!(matches!(
            save_unit_content(&store, "Math", "Algebra", "x"),
            Err(StudyError::NotFound { kind: "unit", .. })
        ));
        assert_eq!(store.load_notes().unwrap().folders["Math"], Folder::default());
    }

    #[test]
    fn page_selection_survives_refresh() {
        let (_dir, store) = testing::store();
        add_folder(&store, "Math").unwrap();
        add_folder(&store, "Art").unwrap();
        add_unit(&store, "Math", "Algebra").unwrap();
        save_unit_content(&store, "Math", "Algebra", "x + 1").unwrap();

        let mut page = NotesPage::load(&store).unwrap();
        assert_eq!(page.folder_names().collect::<Vec<_>>(), vec!["Art", "Math"]);
        page.select_folder("Math").unwrap();
        page.select_unit("Algebra").unwrap();
        assert_eq!(page.content(), Some("x + 1"));

        delete_unit(&store, "Math", "Algebra").unwrap();
        page.refresh(&store).unwrap();
        assert!(page.content().is_none());
        assert!(page.selected_folder().is_some());

        delete_folder(&store, "Math").unwrap();
        page.refresh(&store).unwrap();
        assert_eq!(page.unit_names().count(), 0);
    }
}
