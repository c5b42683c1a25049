//! Student Helper: persistent study documents for a desktop study companion.
//!
//! The crate provides:
//! - Atomic, human-readable JSON storage with corruption repair
//! - Typed accessors for users, settings, to-dos, flashcards, notes, resources
//!   and schedule
//! - Transparent migration of every historical document shape
//! - The operations behind each page (sign-up, task lists, decks, ...)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs)                                   │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Page operations
//! │  - Auth, todos, notes, flashcards, ...              │
//! │  - Page identity and refresh capability             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage Layer (storage/)                           │
//! │  - Typed store           - Schema migration         │
//! │  - Document catalogue    - Atomic JSON I/O          │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types, palettes (domain/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, rotating log file            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Page operations on top of the store
//! - [`domain`]: Error type and palette names
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: JSON document persistence with migration
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! An optional TOML file in the platform config directory
//! (`~/.config/student-helper/config.toml` on Linux):
//!
//! ```toml
//! data_dir = "~/Documents/study"
//! trace_level = "debug"
//! log_to_file = true
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use student_helper::{app, initialize, Config};
//! use student_helper::storage::Priority;
//!
//! let store = initialize(&Config::load())?;
//! app::todos::add_task(&store, "Read chapter 3", Priority::High)?;
//! println!("{}", app::DashboardPage::load(&store)?.todos);
//! # Ok::<(), student_helper::StudyError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use domain::{Palette, Result, StudyError};
pub use storage::Store;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration read from `config.toml`.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the JSON documents.
    ///
    /// A leading `~` is expanded. Default: the platform data directory.
    pub data_dir: Option<String>,

    /// Tracing level or filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Write logs to `<data_dir>/student-helper.log` instead of stderr.
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            trace_level: None,
            log_to_file: true,
        }
    }
}

impl Config {
    /// Parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Config`] if the file cannot be read or is not
    /// valid TOML for this structure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use student_helper::Config;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("config.toml");
    /// std::fs::write(&path, "trace_level = \"debug\"\n")?;
    ///
    /// let config = Config::from_file(&path)?;
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert!(config.log_to_file);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StudyError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| StudyError::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Loads the configuration from the platform config directory.
    ///
    /// A missing file yields the defaults. An invalid file is reported on
    /// stderr and also yields the defaults, since tracing is not set up yet.
    #[must_use]
    pub fn load() -> Self {
        let path = infrastructure::get_config_path();
        if !path.exists() {
            return Self::default();
        }
        Self::from_file(&path).unwrap_or_else(|e| {
            eprintln!("student-helper: {e}; using default configuration");
            Self::default()
        })
    }

    /// The data directory after defaults and tilde expansion.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map_or_else(infrastructure::get_data_dir, infrastructure::expand_tilde)
    }
}

/// Sets up logging and opens the store with every document present.
///
/// # Side Effects
///
/// - Installs the global tracing subscriber (first call only)
/// - Creates the data directory if it doesn't exist
/// - Writes default or migrated documents where needed
///
/// # Errors
///
/// Returns an error if the data directory or a document cannot be written.
pub fn initialize(config: &Config) -> Result<Store> {
    observability::init_tracing(config);

    let data_dir = config.resolved_data_dir();
    tracing::info!(data_dir = ?data_dir, "initializing student helper");

    let store = Store::open(data_dir)?;
    store.ensure_all_defaults()?;
    Ok(store)
}
