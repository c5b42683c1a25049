//! Study links grouped by subject and unit.
//!
//! Links are kept in insertion order and may repeat. They are not validated
//! as URLs; whatever the user pastes is stored after trimming.

use crate::app::pages::{Page, PageId, Refresh};
use crate::app::{check_index, required};
use crate::domain::error::{Result, StudyError};
use crate::storage::{Resources, Store, Subject};

fn subject_mut<'a>(resources: &'a mut Resources, name: &str) -> Result<&'a mut Subject> {
    resources.subjects.get_mut(name).ok_or_else(|| StudyError::NotFound {
        kind: "subject",
        name: name.to_string(),
    })
}

fn links_mut<'a>(subject: &'a mut Subject, unit: &str) -> Result<&'a mut Vec<String>> {
    subject.units.get_mut(unit).ok_or_else(|| StudyError::NotFound {
        kind: "unit",
        name: unit.to_string(),
    })
}

/// # Errors
///
/// - [`StudyError::EmptyInput`] for a blank name
/// - [`StudyError::AlreadyExists`] if the subject exists
pub fn add_subject(store: &Store, name: &str) -> Result<()> {
    let name = required(name, "subject")?;
    store.update(|resources: &mut Resources| {
        if resources.subjects.contains_key(&name) {
            return Err(StudyError::AlreadyExists { kind: "subject", name: name.clone() });
        }
        resources.subjects.insert(name, Subject::default());
        Ok(())
    })
}

/// # Errors
///
/// Returns [`StudyError::NotFound`] if the subject does not exist.
pub fn delete_subject(store: &Store, name: &str) -> Result<()> {
    store.update(|resources: &mut Resources| {
        resources
            .subjects
            .remove(name)
            .map(drop)
            .ok_or_else(|| StudyError::NotFound { kind: "subject", name: name.to_string() })
    })
}

/// # Errors
///
/// - [`StudyError::EmptyInput`] for a blank unit name
/// - [`StudyError::NotFound`] if the subject does not exist
/// - [`StudyError::AlreadyExists`] if the unit exists
pub fn add_unit(store: &Store, subject: &str, unit: &str) -> Result<()> {
    let unit = required(unit, "unit")?;
    store.update(|resources: &mut Resources| {
        let subject = subject_mut(resources, subject)?;
        if subject.units.contains_key(&unit) {
            return Err(StudyError::AlreadyExists { kind: "unit", name: unit.clone() });
        }
        subject.units.insert(unit, Vec::new());
        Ok(())
    })
}

/// # Errors
///
/// Returns [`StudyError::NotFound`] if the subject or unit does not exist.
pub fn delete_unit(store: &Store, subject: &str, unit: &str) -> Result<()> {
    store.update(|resources: &mut Resources| {
        subject_mut(resources, subject)?
            .units
            .remove(unit)
            .map(drop)
            .ok_or_else(|| StudyError::NotFound { kind: "unit", name: unit.to_string() })
    })
}

/// Appends a link to a unit.
///
/// # Errors
///
/// - [`StudyError::EmptyInput`] for a blank link
/// - [`StudyError::NotFound`] if the subject or unit does not exist
pub fn add_link(store: &Store, subject: &str, unit: &str, url: &str) -> Result<()> {
    let url = required(url, "link")?;
    store.update(|resources: &mut Resources| {
        links_mut(subject_mut(resources, subject)?, unit)?.push(url);
        Ok(())
    })
}

/// Removes the link at `index` and returns it.
///
/// # Errors
///
/// - [`StudyError::NotFound`] if the subject or unit does not exist
/// - [`StudyError::IndexOutOfRange`] for an unknown index
pub fn remove_link(store: &Store, subject: &str, unit: &str, index: usize) -> Result<String> {
    store.update(|resources: &mut Resources| {
        let links = links_mut(subject_mut(resources, subject)?, unit)?;
        check_index("link", index, links.len())?;
        Ok(links.remove(index))
    })
}

/// The resources page.
#[derive(Debug, Clone, Default)]
pub struct ResourcesPage {
    resources: Resources,
    subject: Option<String>,
}

impl ResourcesPage {
    /// # Errors
    ///
    /// Returns an error if the resources document cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            resources: store.load_resources()?,
            subject: None,
        })
    }

    pub fn subject_names(&self) -> impl Iterator<Item = &str> {
        self.resources.subjects.keys().map(String::as_str)
    }

    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] if the subject does not exist.
    pub fn select_subject(&mut self, name: &str) -> Result<()> {
        if !self.resources.subjects.contains_key(name) {
            return Err(StudyError::NotFound { kind: "subject", name: name.to_string() });
        }
        self.subject = Some(name.to_string());
        Ok(())
    }

    #[must_use]
    pub fn selected_subject(&self) -> Option<&Subject> {
        self.subject.as_ref().and_then(|name| self.resources.subjects.get(name))
    }

    /// Units of the selected subject with their links, in display order.
    pub fn units(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.selected_subject().into_iter().flat_map(|subject| {
            subject
                .units
                .iter()
                .map(|(name, links)| (name.as_str(), links.as_slice()))
        })
    }
}

impl Refresh for ResourcesPage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        self.resources = store.load_resources()?;
        if self.selected_subject().is_none() {
            self.subject = None;
        }
        Ok(())
    }
}

impl Page for ResourcesPage {
    fn id(&self) -> PageId {
        PageId::Resources
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
    fn links_keep_order_and_duplicates() {
        let (_dir, store) = testing::store();
        add_subject(&store, "Physics").unwrap();
        add_unit(&store, "Physics", "Optics").unwrap();
        add_link(&store, "Physics", "Optics", " https://lens.example ").unwrap();
        add_link(&store, "Physics", "Optics", "https://b.example").unwrap();
        add_link(&store, "Physics", "Optics", "https://lens.example").unwrap();

        let links = &store.load_resources().unwrap().subjects["Physics"].units["Optics"];
        assert_eq!(
            links,
            &vec!["https://lens.example", "https://b.example", "https://lens.example"]
        );

        assert_eq!(remove_link(&store, "Physics", "Optics", 1).unwrap(), "https://b.example");
        assert!(remove_link(&store, "Physics", "Optics", 5).is_err());
        assert_eq!(store.load_resources().unwrap().subjects["Physics"].units["Optics"].len(), 2);
    }

    #[test]
    fn blank_link_and_missing_unit_are_rejected() {
        let (_dir, store) = testing::store();
        add_subject(&store, "Art").unwrap();
        assert!(matches!(add_link(&store, "Art", "Color", "x"), Err(StudyError::NotFound { kind: "unit", .. })));
        add_unit(&store, "Art", "Color").unwrap();
        assert!(matches!(add_link(&store, "Art", "Color", "  "), Err(StudyError::EmptyInput("link"))));
        assert!(matches!(add_subject(&store, "Art"), Err(StudyError::AlreadyExists { .. })));
    }

    #[test]
    fn delete_cascades() {
        let (_dir, store) = testing::store();
        add_subject(&store, "Chem").unwrap();
        add_unit(&store, "Chem", "Acids").unwrap();
        delete_unit(&store, "Chem", "Acids").unwrap();
        assert!(store.load_resources().unwrap().subjects["Chem"].units.is_empty());
        delete_subject(&store, "Chem").unwrap();
        assert!(store.load_resources().unwrap().subjects.is_empty());
    }

    #[test]
    fn page_lists_selected_subject() {
        let (_dir, store) = testing::store();
        add_subject(&store, "Bio").unwrap();
        add_unit(&store, "Bio", "Cells").unwrap();
        add_link(&store, "Bio", "Cells", "https://cells.example").unwrap();

        let mut page = ResourcesPage::load(&store).unwrap();
        assert_eq!(page.units().count(), 0);
        page.select_subject("Bio").unwrap();
        let units: Vec<_> = page.units().collect();
        assert_eq!(units, vec![("Cells", &["https://cells.example".to_string()][..])]);

        delete_subject(&store, "Bio").unwrap();
        page.refresh(&store).unwrap();
        assert!(page.selected_subject().is_none());
    }
}
