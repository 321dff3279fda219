//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur while laying out a word
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Layout configuration that cannot produce a glyph
    #[error("invalid layout configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A word with no letters
    #[error("cannot lay out an empty word")]
    EmptyWord,

    /// A character with no key on the keypad
    #[error("letter '{letter}' has no keypad position")]
    UnknownLetter { letter: char },
}

impl LayoutError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when loading a layout configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] LayoutError),
}
