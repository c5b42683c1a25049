//! Local accounts.
//!
//! Accounts live in the users document as name to plaintext password. There
//! is no hashing; the data directory is assumed to be private to the user.
//! A successful sign-up or log-in remembers the name in `settings.last_user`
//! so the login form can be prefilled next time.

use crate::app::pages::{Page, PageId};
use crate::app::required;
use crate::domain::error::{Result, StudyError};
use crate::storage::{Settings, Store, Users};

/// Creates an account and returns the trimmed user name.
///
/// # Errors
///
/// - [`StudyError::EmptyInput`] if either field is blank
/// - [`StudyError::AlreadyExists`] if the name is taken; existing accounts are
///   left as they were
pub fn sign_up(store: &Store, username: &str, password: &str) -> Result<String> {
    let username = required(username, "username")?;
    let password = required(password, "password")?;
    let _span = tracing::debug_span!("sign_up", user = %username).entered();

    store.update(|users: &mut Users| {
        if users.contains_key(&username) {
            return Err(StudyError::AlreadyExists {
                kind: "user",
                name: username.clone(),
            });
        }
        users.insert(username.clone(), password);
        Ok(())
    })?;
    remember_user(store, &username)?;

    tracing::info!(user = %username, "account created");
    Ok(username)
}

/// Checks credentials and returns the trimmed user name.
///
/// # Errors
///
/// - [`StudyError::EmptyInput`] if either field is blank
/// - [`StudyError::InvalidCredentials`] if the name is unknown or the password
///   does not match
pub fn log_in(store: &Store, username: &str, password: &str) -> Result<String> {
    let username = required(username, "username")?;
    let password = required(password, "password")?;
    let _span = tracing::debug_span!("log_in", user = %username).entered();

    let users = store.load_users()?;
    if users.get(&username) != Some(&password) {
        tracing::debug!("credentials rejected");
        return Err(StudyError::InvalidCredentials);
    }
    remember_user(store, &username)?;
    Ok(username)
}

/// Removes an account, forgetting it as the last user if it was.
///
/// # Errors
///
/// Returns [`StudyError::NotFound`] if there is no such account.
pub fn delete_user(store: &Store, username: &str) -> Result<()> {
    let username = username.trim();
    store.update(|users: &mut Users| {
        users
            .remove(username)
            .map(drop)
            .ok_or_else(|| StudyError::NotFound {
                kind: "user",
                name: username.to_string(),
            })
    })?;
    store.update(|settings: &mut Settings| {
        if settings.last_user == username {
            settings.last_user.clear();
        }
        Ok(())
    })
}

fn remember_user(store: &Store, username: &str) -> Result<()> {
    store.update(|settings: &mut Settings| {
        settings.last_user = username.to_string();
        Ok(())
    })
}

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Signs up and signs in as the new account.
    ///
    /// # Errors
    ///
    /// See [`sign_up`].
    pub fn sign_up(&mut self, store: &Store, username: &str, password: &str) -> Result<()> {
        self.user = Some(sign_up(store, username, password)?);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`log_in`].
    pub fn log_in(&mut self, store: &Store, username: &str, password: &str) -> Result<()> {
        self.user = Some(log_in(store, username, password)?);
        Ok(())
    }

    /// Forgets the current user. `last_user` is kept for the next login form.
    pub fn log_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::debug!(user = %user, "logged out");
        }
    }
}

/// The login form. Not refreshable: it only reads `last_user` when opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginPage {
    /// Text in the user name field.
    pub username: String,
}

impl LoginPage {
    /// Opens the form with the last user's name filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self {
            username: store.load_settings()?.last_user,
        })
    }
}

impl Page for LoginPage {
    fn id(&self) -> PageId {
        PageId::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;

    #[test]
    fn sign_up_trims_and_remembers() {
        let (_dir, store) = testing::store();
        assert_eq!(sign_up(&store, "  ana ", " pw ").unwrap(), "ana");
        assert_eq!(store.load_users().unwrap().get("ana"), Some(&"pw".to_string()));
        assert_eq!(store.load_settings().unwrap().last_user, "ana");
    }

    #[test]
    fn duplicate_sign_up_keeps_existing_password() {
        let (_dir, store) = testing::store();
        sign_up(&store, "ana", "first").unwrap();

        let err = sign_up(&store, "ana", "second").unwrap_err();
        assert!(matches!(err, StudyError::AlreadyExists { kind: "user", .. }));
        assert_eq!(store.load_users().unwrap()["ana"], "first");
    }

    #[test]
    fn blank_fields_are_rejected() {
        let (_dir, store) = testing::store();
        assert!(matches!(sign_up(&store, " ", "pw"), Err(StudyError::EmptyInput("username"))));
        assert!(matches!(sign_up(&store, "ana", ""), Err(StudyError::EmptyInput("password"))));
        assert!(store.load_users().unwrap().is_empty());
    }

    #[test]
    fn log_in_checks_password() {
        let (_dir, store) = testing::store();
        sign_up(&store, "ana", "pw").unwrap();
        sign_up(&store, "ben", "pw2").unwrap();

        assert!(matches!(log_in(&store, "ana", "nope"), Err(StudyError::InvalidCredentials)));
        assert!(matches!(log_in(&store, "zoe", "pw"), Err(StudyError::InvalidCredentials)));
        assert_eq!(store.load_settings().unwrap().last_user, "ben");

        assert_eq!(log_in(&store, "ana", "pw").unwrap(), "ana");
        assert_eq!(store.load_settings().unwrap().last_user, "ana");
    }

    #[test]
    fn delete_user_clears_last_user() {
        let (_dir, store) = testing::store();
        sign_up(&store, "ana", "pw").unwrap();
        delete_user(&store, "ana").unwrap();

        assert!(store.load_users().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap().last_user, "");
        assert!(matches!(delete_user(&store, "ana"), Err(StudyError::NotFound { .. })));
    }

    #[test]
    fn session_lifecycle() {
        let (_dir, store) = testing::store();
        let mut session = Session::new();
        session.sign_up(&store, "ana", "pw").unwrap();
        assert_eq!(session.user(), Some("ana"));

        session.log_out();
        assert!(!session.is_signed_in());
        assert_eq!(LoginPage::load(&store).unwrap().username, "ana");

        assert!(session.log_in(&store, "ana", "bad").is_err());
        assert!(!session.is_signed_in());
    }
}
