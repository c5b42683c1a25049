//! Appearance preferences.

use crate::app::pages::{Page, PageId, Refresh};
use crate::app::required;
use crate::domain::error::Result;
use crate::domain::Palette;
use crate::storage::{Settings, Store};

/// # Errors
///
/// Returns an error if settings cannot be loaded or saved.
pub fn set_theme(store: &Store, theme: Palette) -> Result<()> {
    tracing::debug!(theme = %theme, "setting theme");
    store.update(|settings: &mut Settings| {
        settings.theme = theme;
        Ok(())
    })
}

/// # Errors
///
/// Returns an error if settings cannot be loaded or saved.
pub fn set_dark(store: &Store, dark: bool) -> Result<()> {
    store.update(|settings: &mut Settings| {
        settings.dark = dark;
        Ok(())
    })
}

/// Flips dark mode and returns the new state.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or saved.
pub fn toggle_dark(store: &Store) -> Result<bool> {
    store.update(|settings: &mut Settings| {
        settings.dark = !settings.dark;
        Ok(settings.dark)
    })
}

/// # Errors
///
/// Returns [`crate::StudyError::EmptyInput`] for a blank font name.
pub fn set_font(store: &Store, font: &str) -> Result<()> {
    let font = required(font, "font")?;
    store.update(|settings: &mut Settings| {
        settings.font = font;
        Ok(())
    })
}

/// The settings page.
#[derive(Debug, Clone, Default)]
pub struct SettingsPage {
    settings: Settings,
}

impl SettingsPage {
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            settings: store.load_settings()?,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl Refresh for SettingsPage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        self.settings = store.load_settings()?;
        Ok(())
    }
}

impl Page for SettingsPage {
    fn id(&self) -> PageId {
        PageId::Settings
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
    fn preferences_persist() {
        let (_dir, store) = testing::store();
        set_theme(&store, Palette::Mono).unwrap();
        set_font(&store, " Georgia ").unwrap();
        assert!(toggle_dark(&store).unwrap());

        let page = SettingsPage::load(&store).unwrap();
        assert_eq!(page.settings().theme, Palette::Mono);
        assert_eq!(page.settings().font, "Georgia");
        assert!(page.settings().dark);

        set_dark(&store, false).unwrap();
        assert!(!store.load_settings().unwrap().dark);
    }

    #[test]
    fn blank_font_is_rejected() {
        let (_dir, store) = testing::store();
        assert!(set_font(&store, "  ").is_err());
        assert_eq!(store.load_settings().unwrap().font, "Avenir");
    }
}
