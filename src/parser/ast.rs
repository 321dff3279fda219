//! Parsed phrase types

use super::keypad;
use crate::error::ParseError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A node with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One word of a phrase, stored in lower case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(pub String);

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The keypad nodes this word visits, in order
    pub fn node_specs(&self) -> Result<Vec<NodeSpec>, ParseError> {
        keypad::node_specs(&self.0)
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A run of consecutive letters sharing one keypad key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    /// Keypad position, 1-9
    pub key: u8,
    /// 1-based letter positions on the key, in word order
    pub markers: Vec<u8>,
}

impl NodeSpec {
    /// Cells a trace needs to carry the markers: their sum plus one gap each
    pub fn min_trace_length(&self) -> usize {
        self.markers.iter().map(|&m| usize::from(m)).sum::<usize>() + self.markers.len()
    }
}
