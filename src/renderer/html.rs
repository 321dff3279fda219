//! HTML page assembly for multi-word phrases

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Wrap rendered word SVGs in a single HTML page
///
/// With `embed`, each SVG becomes a base64 data-URI `<img>`; otherwise the
/// SVG markup is inlined and should be rendered without an XML declaration.
pub fn render_html(words: &[(&str, String)], embed: bool) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>khod</title>\n</head>\n<body>\n",
    );
    for (word, svg) in words {
        if embed {
            html.push_str(&format!(
                "  <img alt=\"{}\" src=\"data:image/svg+xml;base64,{}\">\n",
                word,
                STANDARD.encode(svg)
            ));
        } else {
            html.push_str(&format!("  <figure data-word=\"{}\">\n", word));
            html.push_str(svg.trim_end());
            html.push_str("\n  </figure>\n");
        }
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_page() {
        let html = render_html(&[("ab", "<svg>a</svg>\n".to_string())], false);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<figure data-word=\"ab\">\n<svg>a</svg>\n  </figure>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_embedded_page() {
        let html = render_html(
            &[("ab", "<svg/>".to_string()), ("cd", "<svg/>".to_string())],
            true,
        );
        assert_eq!(html.matches("<img ").count(), 2);
        assert!(html.contains("src=\"data:image/svg+xml;base64,PHN2Zy8+\""));
        assert!(html.contains("alt=\"cd\""));
    }
}
