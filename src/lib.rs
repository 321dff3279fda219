//! Khod - words drawn as circuit-board glyphs
//!
//! Each letter of a word sits on a 3x3 keypad. Consecutive keys become
//! nodes joined by traces that are routed one link at a time over an
//! obstacle grid, with marker dots along each trace naming the letters.
//!
//! # Example
//!
//! ```rust
//! use khod::render;
//!
//! let svg = render("hello").unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod stylesheet;

pub use error::ParseError;
pub use layout::{layout_word, LayoutConfig, LayoutError, RoutingError, WordLayout};
pub use parser::{parse_phrase, Spanned, Word};
pub use renderer::{render_html, render_word_svg, OutputFormat, SvgConfig};

use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Routing gave up on a word and strict mode is on
    #[error("routing failed for '{word}': {source}")]
    Routing {
        word: String,
        #[source]
        source: RoutingError,
    },
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
    /// Debug mode: draw the routing grid under each glyph
    pub debug: bool,
    /// Fail instead of rendering a partially routed word
    pub strict: bool,
    /// Output document kind
    pub format: OutputFormat,
    /// For HTML output, embed each word as a base64 image
    pub embed: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
            debug: false,
            strict: false,
            format: OutputFormat::default(),
            embed: false,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable strict routing
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Embed HTML output words as base64 images
    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }
}

/// Render a phrase to SVG with default configuration
///
/// This is the main entry point for the library. It parses the phrase,
/// lays out and routes every word, and generates one SVG per word.
///
/// # Example
///
/// ```rust
/// use khod::render;
///
/// let svg = render("khod").unwrap();
/// assert!(svg.contains("kh-trace"));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a phrase with custom configuration
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let words = parse_phrase(source)?;
    let layouts = layout_phrase(&words, &config.layout)?;
    render_layouts(&layouts, &config)
}

/// Lay out every word of a phrase in parallel, keeping input order
///
/// Each word owns its grid and nodes, so words never share routing state.
pub fn layout_phrase(words: &[Spanned<Word>], config: &LayoutConfig) -> Result<Vec<WordLayout>, LayoutError> {
    words
        .par_iter()
        .map(|word| layout_word(&word.node, config))
        .collect()
}

/// Turn routed layouts into the configured output document
///
/// Partially routed words are drawn as far as they got, unless
/// [`RenderConfig::strict`] is set.
pub fn render_layouts(layouts: &[WordLayout], config: &RenderConfig) -> Result<String, RenderError> {
    for layout in layouts {
        if let Some(error) = layout.routing_error() {
            if config.strict {
                return Err(RenderError::Routing {
                    word: layout.word.to_string(),
                    source: error.clone(),
                });
            }
            warn!(word = %layout.word, %error, "rendering partial glyph");
        }
    }

    let mut svg_config = config.svg.clone();
    svg_config.grid_overlay |= config.debug;
    if config.format == OutputFormat::Html && !config.embed {
        svg_config.standalone = false;
    }

    let svgs: Vec<String> = layouts
        .par_iter()
        .map(|layout| {
            renderer::render_word_svg_with_stylesheet(layout, &svg_config, &config.stylesheet)
        })
        .collect();

    Ok(match config.format {
        OutputFormat::Svg => svgs.concat(),
        OutputFormat::Html => {
            let pages: Vec<(&str, String)> = layouts
                .iter()
                .map(|l| l.word.as_str())
                .zip(svgs)
                .collect();
            render_html(&pages, config.embed)
        }
    })
}
