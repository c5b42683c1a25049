//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait: the raw document contract that
//! the typed accessors in [`crate::storage::store`] are built on. A backend
//! deals in untyped JSON values and knows nothing about document shapes or
//! migrations.

use crate::domain::error::Result;
use crate::storage::documents::Document;
use serde_json::Value;

/// Abstraction over raw document persistence.
///
/// # Implementations
///
/// - [`crate::storage::JsonStorage`]: one JSON file per document with atomic writes
pub trait Storage {
    /// Loads a document, materializing `default` when it is missing or corrupt.
    ///
    /// A missing file, an unreadable file and a file that is not valid JSON
    /// are all answered by writing `default` and returning it. The previous
    /// content is discarded, never merged.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing the default back fails.
    fn load(&self, document: Document, default: &Value) -> Result<Value>;

    /// Replaces a document with `value`.
    ///
    /// Implementations write through a temporary file where the platform
    /// allows it, so an interrupted save leaves the previous content intact.
    ///
    /// # Errors
    ///
    /// Returns an error if no write strategy succeeded.
    fn save(&self, document: Document, value: &Value) -> Result<()>;
}
