//! Error types for the student helper.
//!
//! This module defines the centralized error type [`StudyError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! Two families of errors live here:
//!
//! - **Persistence errors** (`Io`, `Json`, `Storage`): only raised when the data
//!   directory cannot be written at all. Corrupt or missing documents are never
//!   reported as errors; the storage layer repairs them silently.
//! - **Validation errors** (`EmptyInput`, `AlreadyExists`, `NotFound`, ...):
//!   raised by the application layer before a mutation is persisted, so the
//!   document on disk is left untouched when one of them is returned.

use thiserror::Error;

/// The main error type for student helper operations.
///
/// # Examples
///
/// ```
/// use student_helper::StudyError;
///
/// let err = StudyError::AlreadyExists { kind: "folder", name: "Math".to_string() };
/// assert_eq!(err.to_string(), "folder \"Math\" already exists");
/// ```
#[derive(Debug, Error)]
pub enum StudyError {
    /// Storage operation failed.
    ///
    /// The string contains a description of what went wrong, typically a
    /// document that could not be brought into its current shape.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Raised when both the atomic and the direct write strategy fail, or when
    /// the data directory cannot be created.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required text input was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    /// A named entry already exists in its parent mapping.
    #[error("{kind} \"{name}\" already exists")]
    AlreadyExists {
        /// What kind of entry collided (user, folder, unit, subject).
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A named entry does not exist.
    #[error("{kind} \"{name}\" not found")]
    NotFound {
        /// What kind of entry was looked up.
        kind: &'static str,
        /// The missing name.
        name: String,
    },

    /// A positional entry does not exist.
    #[error("{kind} #{index} out of range ({len} present)")]
    IndexOutOfRange {
        /// What kind of entry was addressed (task, card, link, entry).
        kind: &'static str,
        /// The requested zero-based index.
        index: usize,
        /// Number of entries that were present.
        len: usize,
    },

    /// Username and password did not match a stored account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A schedule date key could not be parsed as `yyyy-MM-dd`.
    #[error("invalid date \"{0}\", expected yyyy-MM-dd")]
    InvalidDate(String),
}

/// A specialized `Result` type for student helper operations.
pub type Result<T> = std::result::Result<T, StudyError>;
