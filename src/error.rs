//! Error types for parsing input phrases

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::Span;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid character '{found}' at {span:?}")]
    InvalidCharacter { span: Span, found: char },

    #[error("No words to render")]
    Empty,
}

impl ParseError {
    /// Source span of the error, if it points at one
    pub fn span(&self) -> Option<&Span> {
        match self {
            ParseError::InvalidCharacter { span, .. } => Some(span),
            ParseError::Empty => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let report = match self {
            ParseError::InvalidCharacter { span, found } => {
                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(format!("invalid character '{}'", found.escape_default()))
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message("only letters a-z can be drawn")
                            .with_color(Color::Red),
                    )
                    .finish()
            }
            ParseError::Empty => Report::build(ReportKind::Error, filename, 0)
                .with_message("no words to render")
                .with_note("pass one or more words, as arguments or on stdin")
                .finish(),
        };
        if report
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
