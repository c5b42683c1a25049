//! The fixed set of colour palettes a user can pick in settings.
//!
//! Only the palette *name* is persisted; how a palette is drawn is up to the
//! presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named colour palette stored in the settings document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Palette {
    #[default]
    Pink,
    Purple,
    Green,
    Yellow,
    Blue,
    Mono,
}

impl Palette {
    /// Every palette, in the order they are offered to the user.
    pub const ALL: [Self; 6] = [
        Self::Pink,
        Self::Purple,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Mono,
    ];

    /// The name written to `settings.json`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pink => "Pink",
            Self::Purple => "Purple",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
            Self::Mono => "Mono",
        }
    }

    /// Looks a palette up by its exact persisted name.
    ///
    /// ```
    /// use student_helper::domain::Palette;
    ///
    /// assert_eq!(Palette::from_name("Green"), Some(Palette::Green));
    /// assert_eq!(Palette::from_name("green"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown palette: {s}"))
    }
}
