//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where documents, configuration and logs live on the
//! host. Nothing here reads or writes document content.

pub mod paths;

pub use paths::{expand_tilde, get_config_path, get_data_dir};
