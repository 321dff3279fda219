//! Stylesheet system for color palette support
//!
//! Glyph parts are drawn with symbolic color tokens that a stylesheet
//! resolves to concrete values, so one layout can be rendered in several
//! color schemes.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping symbolic colors to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: token name -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default color palette - dark traces on white, muted debug overlay
const DEFAULT_PALETTE: &str = r##"
[colors]
# Glyph strokes
trace = "#2e7d32"
node-stroke = "#000000"
subnode-fill = "#000000"

# Debug overlay cells
cell-blocked = "#e53935"
cell-slow = "#fbc02d"

# Canvas
background = "#ffffff"
"##;

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Resolve a symbolic color token to a concrete value
    ///
    /// Returns None if the token is not defined in this stylesheet.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a symbolic color token with fallback to default palette
    ///
    /// Fallback order:
    /// 1. Check this stylesheet for exact token
    /// 2. Check default palette for exact token
    /// 3. Use category default (cell → #cccccc, anything else → #000000)
    pub fn resolve_or_default(&self, token: &str) -> String {
        // Try this stylesheet first
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }

        // Fallback to default palette
        let default = Self::default();
        if let Some(color) = default.resolve(token) {
            return color.to_string();
        }

        // Final fallback: category defaults
        if token.starts_with("cell") {
            return "#cccccc".to_string();
        }
        if token.starts_with("background") {
            return "#ffffff".to_string();
        }

        // Strokes and anything unknown
        "#000000".to_string()
    }

    /// Token/value pairs, sorted by token
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .colors
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet() {
        let stylesheet = Stylesheet::default();
        for token in ["trace", "node-stroke", "subnode-fill", "cell-blocked", "cell-slow", "background"] {
            assert!(stylesheet.colors.contains_key(token), "{token}");
        }
    }

    #[test]
    fn test_resolve_existing_token() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("trace"), Some("#2e7d32"));
        assert_eq!(stylesheet.resolve("background"), Some("#ffffff"));
    }

    #[test]
    fn test_resolve_missing_token() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("nonexistent"), None);
    }

    #[test]
    fn test_resolve_or_default_fallback() {
        // Empty stylesheet should fall back to defaults
        let empty = Stylesheet {
            name: None,
            description: None,
            colors: HashMap::new(),
        };
        assert_eq!(empty.resolve_or_default("trace"), "#2e7d32");
    }

    #[test]
    fn test_resolve_or_default_category_fallback() {
        let empty = Stylesheet {
            name: None,
            description: None,
            colors: HashMap::new(),
        };
        assert_eq!(empty.resolve_or_default("cell-visited"), "#cccccc");
        assert_eq!(empty.resolve_or_default("background-alt"), "#ffffff");
        assert_eq!(empty.resolve_or_default("glow"), "#000000");
    }

    #[test]
    fn test_entries_are_sorted() {
        let stylesheet = Stylesheet::default();
        let tokens: Vec<&str> = stylesheet.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            tokens,
            vec!["background", "cell-blocked", "cell-slow", "node-stroke", "subnode-fill", "trace"]
        );
    }

    #[test]
    fn test_parse_toml_with_metadata() {
        let toml_str = r##"
[metadata]
name = "Neon"
description = "Bright traces on black"

[colors]
trace = "#00ff9c"
background = "#000000"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, Some("Neon".to_string()));
        assert_eq!(stylesheet.description, Some("Bright traces on black".to_string()));
        assert_eq!(stylesheet.resolve("trace"), Some("#00ff9c"));
        // unset tokens still resolve through the default palette
        assert_eq!(stylesheet.resolve_or_default("node-stroke"), "#000000");
    }

    #[test]
    fn test_parse_toml_without_metadata() {
        let toml_str = r##"
[colors]
trace = "#111111"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, None);
        assert_eq!(stylesheet.resolve("trace"), Some("#111111"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        let result = Stylesheet::from_str(invalid);
        assert!(result.is_err());
    }
}
