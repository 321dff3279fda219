//! Configuration for SVG rendering

/// Configuration options for SVG output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Width and height of the square canvas
    pub canvas_size: u32,

    /// Stroke width of traces, outlines and markers
    pub stroke_width: u32,

    /// Draw every non-open grid cell under the glyph
    pub grid_overlay: bool,

    /// Whether to include XML declaration and standalone attributes
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "kh-" for "kh-trace")
    pub class_prefix: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            canvas_size: 600,
            stroke_width: 3,
            grid_overlay: false,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("kh-".to_string()),
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size
    pub fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size;
        self
    }

    /// Set the stroke width
    pub fn with_stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Show or hide the grid overlay
    pub fn with_grid_overlay(mut self, overlay: bool) -> Self {
        self.grid_overlay = overlay;
        self
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert_eq!(config.canvas_size, 600);
        assert_eq!(config.stroke_width, 3);
        assert!(!config.grid_overlay);
        assert!(config.standalone);
        assert!(config.pretty_print);
        assert_eq!(config.class_prefix, Some("kh-".to_string()));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_canvas_size(300)
            .with_grid_overlay(true)
            .with_standalone(false)
            .with_pretty_print(false)
            .with_class_prefix("my-");

        assert_eq!(config.canvas_size, 300);
        assert!(config.grid_overlay);
        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix, Some("my-".to_string()));
        assert_eq!(config.without_class_prefix().class_prefix, None);
    }
}
