//! Application preferences model

use serde::{Deserialize, Serialize};

/// Maximum number of slugs kept in the recently-used list
pub const MAX_RECENT_TOOLS: usize = 10;

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

impl ThemeMode {
    /// Flip between light and dark; `System` resolves to dark.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light | Self::System => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

/// Application preferences persisted in the `app-preferences` snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default)]
    pub language: Language,
    /// Recently used tool slugs, most recent first
    #[serde(default)]
    pub recent_tools: Vec<String>,
}

impl Preferences {
    /// Move `slug` to the front of the recent list, capped at [`MAX_RECENT_TOOLS`].
    pub fn touch_recent(&mut self, slug: &str) {
        self.recent_tools.retain(|existing| existing != slug);
        self.recent_tools.insert(0, slug.to_string());
        self.recent_tools.truncate(MAX_RECENT_TOOLS);
    }
}
