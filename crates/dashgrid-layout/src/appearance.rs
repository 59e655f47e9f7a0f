//! Dashboard appearance carried alongside the grid.
//!
//! Presets may ship a companion background and playlist. These are only
//! applied while the user still has the default gradient, so an explicit
//! customization is never overwritten.

use serde::{Deserialize, Serialize};

/// Dashboard background.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Background {
    #[default]
    DefaultGradient,
    /// CSS-style color token.
    Color(String),
    /// Image reference (URL or asset key).
    Image(String),
}

impl Background {
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::DefaultGradient)
    }
}

/// Non-grid presentation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default)]
    pub background: Background,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub playlist: Vec<String>,
}

impl Appearance {
    /// Whether the background is still the untouched default.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        !self.background.is_default()
    }
}
