//! Structured logging to a rotating file.
//!
//! All crate code logs through `tracing` macros. This module only installs
//! the subscriber that decides where those events go.
//!
//! # Features
//!
//! - **File Output**: `<data_dir>/student-helper.log`, plain text without ANSI colours
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Stderr Fallback**: Used when `log_to_file` is off or the directory is unusable
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in `config.toml`
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup and level resolution
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingFile;
pub use init::init_tracing;
