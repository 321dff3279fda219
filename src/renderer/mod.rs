//! Renderers for routed word layouts
//!
//! SVG per word, with CSS classes for styling, and an HTML page that
//! collects the words of a phrase.

pub mod config;
pub mod html;
pub mod svg;

use std::fmt;
use std::str::FromStr;

pub use config::SvgConfig;
pub use html::render_html;
pub use svg::{render_grid_ascii, render_word_svg, render_word_svg_with_stylesheet};

/// Output document kind for a phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One SVG document per word, concatenated
    #[default]
    Svg,
    /// One HTML page holding every word
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown output format '{other}' (expected svg or html)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Svg => "svg",
            Self::Html => "html",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("svg".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
        assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert!("png".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Html.to_string(), "html");
    }
}
