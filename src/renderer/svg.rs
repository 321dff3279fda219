//! SVG generation from word layouts

use tracing::warn;

use crate::layout::{CellState, GridPoint, WordLayout, WorldPoint};
use crate::stylesheet::Stylesheet;

use super::SvgConfig;

/// Color tokens every glyph uses
const GLYPH_TOKENS: [&str; 6] = [
    "background",
    "cell-blocked",
    "cell-slow",
    "node-stroke",
    "subnode-fill",
    "trace",
];

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    background: Option<String>,
    cells: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            background: None,
            cells: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet, plus the glyph classes
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut css = String::from(":root {\n");
        for token in GLYPH_TOKENS {
            css.push_str(&format!("    --{}: {};\n", token, stylesheet.resolve_or_default(token)));
        }
        for (token, value) in stylesheet.entries() {
            if !GLYPH_TOKENS.contains(&token) {
                css.push_str(&format!("    --{}: {};\n", token, value));
            }
        }
        css.push_str("  }");
        self.styles.push(css);

        let p = self.prefix();
        let w = self.config.stroke_width;
        self.styles.push(format!(".{p}background {{ fill: var(--background); }}"));
        self.styles.push(format!(
            ".{p}trace {{ fill: none; stroke: var(--trace); stroke-width: {w}; }}"
        ));
        self.styles.push(format!(
            ".{p}node {{ fill: none; stroke: var(--node-stroke); stroke-width: {w}; }}"
        ));
        self.styles.push(format!(
            ".{p}marker {{ fill: var(--subnode-fill); stroke: var(--node-stroke); stroke-width: {w}; }}"
        ));
        self.styles.push(format!(
            ".{p}cell-blocked {{ fill: var(--cell-blocked); fill-opacity: 0.35; }}"
        ));
        self.styles.push(format!(
            ".{p}cell-slow {{ fill: var(--cell-slow); fill-opacity: 0.35; }}"
        ));
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Fill the canvas
    pub fn add_background(&mut self) {
        let size = self.config.canvas_size;
        self.background = Some(format!(
            r#"{}<rect class="{}background" x="0" y="0" width="{}" height="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            size,
            size
        ));
    }

    /// Add one grid cell of the debug overlay
    pub fn add_cell(&mut self, origin: WorldPoint, size: i32, state: CellState) {
        let kind = match state {
            CellState::Open => return,
            CellState::Blocked => "cell-blocked",
            CellState::SlowZone => "cell-slow",
        };
        self.cells.push(format!(
            r#"{}<rect class="{}{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            kind,
            origin.x,
            origin.y,
            size,
            size
        ));
    }

    /// Add a trace polyline
    pub fn add_trace(&mut self, points: &[WorldPoint]) {
        if points.len() < 2 {
            return;
        }
        let points_str = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.elements.push(format!(
            r#"{}<polyline class="{}trace" points="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            points_str
        ));
    }

    /// Add a node outline
    pub fn add_node(&mut self, center: WorldPoint, radius: i32, key: u8) {
        self.elements.push(format!(
            r#"{}<circle class="{}node" data-key="{}" cx="{}" cy="{}" r="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            key,
            center.x,
            center.y,
            radius
        ));
    }

    /// Add a marker dot
    pub fn add_marker(&mut self, center: WorldPoint, radius: i32) {
        self.elements.push(format!(
            r#"{}<circle class="{}marker" cx="{}" cy="{}" r="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            center.x,
            center.y,
            radius
        ));
    }

    /// Build the final SVG string
    pub fn build(self, title: &str) -> String {
        let nl = self.newline();
        let size = self.config.canvas_size;
        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        ));
        svg.push_str(nl);
        svg.push_str(&format!("  <title>{}</title>", escape_xml(title)));
        svg.push_str(nl);

        // Style section for CSS custom properties
        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        // Overlay cells sit between the background and the glyph
        for line in self.background.iter().chain(&self.cells) {
            svg.push_str(line);
            svg.push_str(nl);
        }
        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg.push_str(nl);
        svg
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a word layout to an SVG string with the default stylesheet
pub fn render_word_svg(layout: &WordLayout, config: &SvgConfig) -> String {
    render_word_svg_with_stylesheet(layout, config, &Stylesheet::default())
}

/// Render a word layout to an SVG string with a custom stylesheet
pub fn render_word_svg_with_stylesheet(
    layout: &WordLayout,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_stylesheet(stylesheet);
    builder.add_background();

    if config.grid_overlay {
        let size = layout.transform.cell_size();
        for (cell, state) in layout.grid.occupied_cells() {
            builder.add_cell(layout.transform.grid_to_world(cell, 0), size, state);
        }
    }

    if let Some(charge) = &layout.charge {
        builder.add_trace(&charge.points);
    }

    for (index, node) in layout.nodes.iter().enumerate() {
        builder.add_trace(&layout.trace(index));
        builder.add_node(node.circle.center, node.circle.radius, node.key);
        match layout.marker_positions(index) {
            Some(markers) => {
                for center in markers {
                    builder.add_marker(center, node.subnode_radius);
                }
            }
            None => warn!(
                word = %layout.word,
                key = node.key,
                needed = node.min_trace_length(),
                cells = node.route.as_ref().map_or(0, |r| r.len()),
                "trace too short for markers"
            ),
        }
    }

    builder.build(layout.word.as_str())
}

/// Text dump of a routed grid, node anchors drawn as their key digit
pub fn render_grid_ascii(layout: &WordLayout) -> String {
    let mut rows: Vec<Vec<char>> = layout
        .grid
        .to_ascii()
        .lines()
        .map(|line| line.chars().collect())
        .collect();
    for node in &layout.nodes {
        let GridPoint { x, y } = node.anchor;
        if let Some(cell) = rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = char::from(b'0' + node.key);
        }
    }
    let mut out = String::new();
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_word, LayoutConfig};
    use crate::parser::Word;

    fn layout(word: &str) -> WordLayout {
        layout_word(&Word::new(word), &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_svg_structure() {
        let svg = render_word_svg(&layout("ad"), &SvgConfig::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 600 600""#));
        assert!(svg.contains("<title>ad</title>"));
        assert!(svg.contains("--trace: #2e7d32;"));
        assert_eq!(svg.matches(r#"class="kh-node""#).count(), 2);
        // charge lead, one routed link, one ground lead
        assert_eq!(svg.matches(r#"class="kh-trace""#).count(), 3);
        assert_eq!(svg.matches(r#"class="kh-marker""#).count(), 2);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_node_circles_follow_keypad() {
        let svg = render_word_svg(&layout("ad"), &SvgConfig::default());
        assert!(svg.contains(r#"data-key="1" cx="127" cy="127" r="20""#));
        assert!(svg.contains(r#"data-key="2" cx="277" cy="127" r="20""#));
    }

    #[test]
    fn test_grid_overlay() {
        let word = layout("ad");
        let plain = render_word_svg(&word, &SvgConfig::default());
        assert!(!plain.contains(r#"class="kh-cell-blocked""#));

        let debug = render_word_svg(&word, &SvgConfig::default().with_grid_overlay(true));
        assert_eq!(
            debug.matches(r#"class="kh-cell-"#).count(),
            word.grid.occupied_cells().count()
        );
        assert!(debug.contains(r#"class="kh-cell-slow""#));
    }

    #[test]
    fn test_compact_output_without_prefix() {
        let config = SvgConfig::default()
            .with_pretty_print(false)
            .with_standalone(false)
            .without_class_prefix();
        let svg = render_word_svg(&layout("a"), &config);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("\n  <"));
        assert!(svg.contains(r#"class="node""#));
    }

    #[test]
    fn test_custom_stylesheet_colors() {
        let stylesheet = Stylesheet::from_str("[colors]\ntrace = \"#ff00ff\"\nglow = \"#123456\"\n").unwrap();
        let svg = render_word_svg_with_stylesheet(&layout("a"), &SvgConfig::default(), &stylesheet);
        assert!(svg.contains("--trace: #ff00ff;"));
        assert!(svg.contains("--node-stroke: #000000;"));
        assert!(svg.contains("--glow: #123456;"));
    }

    #[test]
    fn test_grid_ascii_marks_anchors() {
        let dump = render_grid_ascii(&layout("ad"));
        let rows: Vec<&str> = dump.lines().collect();
        assert_eq!(rows.len(), 35);
        assert_eq!(rows[8].chars().nth(8), Some('1'));
        assert_eq!(rows[8].chars().nth(18), Some('2'));
        assert!(rows[8].contains('#'));
        assert!(rows[6].contains('~'));
    }
}
