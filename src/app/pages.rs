//! Page identity and the optional refresh capability.
//!
//! Only some pages show persisted data that can go stale. Those expose a
//! [`Refresh`] implementation through [`Page::refreshable`]; the rest (login)
//! return `None`, and callers never need to ask whether a method exists.

use crate::domain::error::Result;
use crate::storage::Store;
use std::fmt;

/// Every page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Login,
    Dashboard,
    Todos,
    Notes,
    Flashcards,
    Resources,
    Schedule,
    Settings,
}

impl PageId {
    /// Navigation order after signing in.
    pub const NAVIGATION: [Self; 7] = [
        Self::Dashboard,
        Self::Todos,
        Self::Notes,
        Self::Flashcards,
        Self::Resources,
        Self::Schedule,
        Self::Settings,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Todos => "To-Do",
            Self::Notes => "Notes",
            Self::Flashcards => "Flashcards",
            Self::Resources => "Resources",
            Self::Schedule => "Schedule",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Reloads a page's view of the store.
pub trait Refresh {
    /// # Errors
    ///
    /// Returns an error if a document cannot be loaded or repaired.
    fn refresh(&mut self, store: &Store) -> Result<()>;
}

/// A page the user can navigate to.
pub trait Page {
    fn id(&self) -> PageId;

    fn title(&self) -> &'static str {
        self.id().title()
    }

    /// The page's refresh capability, if it has one.
    fn refreshable(&mut self) -> Option<&mut dyn Refresh> {
        None
    }
}

/// Refreshes every page that can be refreshed.
///
/// A failing page is logged and skipped so the others still update. Returns
/// the number of pages refreshed successfully.
pub fn refresh_all(pages: &mut [Box<dyn Page>], store: &Store) -> usize {
    let _span = tracing::debug_span!("refresh_all", pages = pages.len()).entered();
    let mut refreshed = 0;
    for page in pages.iter_mut() {
        let id = page.id();
        let Some(target) = page.refreshable() else {
            tracing::trace!(page = %id, "page has no refresh capability");
            continue;
        };
        match target.refresh(store) {
            Ok(()) => refreshed += 1,
            Err(e) => tracing::warn!(page = %id, error = %e, "page refresh failed"),
        }
    }
    refreshed
}
