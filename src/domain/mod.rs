//! Domain layer for the student helper.
//!
//! This module contains the types shared by every other layer and free of any
//! filesystem concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`palette`]: The fixed palette name set used by settings

pub mod error;
pub mod palette;

pub use error::{Result, StudyError};
pub use palette::Palette;
