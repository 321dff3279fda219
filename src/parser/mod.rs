//! Parser for input phrases

pub mod ast;
pub mod keypad;
pub mod lexer;

pub use ast::*;

use crate::error::ParseError;
use lexer::{lex, Token};

/// Split a phrase into words
///
/// Words are runs of ASCII letters separated by whitespace. Every character
/// that is neither is reported; a phrase with no words at all is
/// [`ParseError::Empty`].
pub fn parse_phrase(input: &str) -> Result<Vec<Spanned<Word>>, Vec<ParseError>> {
    let mut words = Vec::new();
    let mut errors = Vec::new();

    for (token, span) in lex(input) {
        match token {
            Ok(Token::Word(text)) => words.push(Spanned::new(Word(text), span)),
            Err(()) => {
                // multi-byte characters may be reported once per byte
                if !input.is_char_boundary(span.start) {
                    continue;
                }
                let found = input[span.start..].chars().next().unwrap_or('\u{fffd}');
                errors.push(ParseError::InvalidCharacter {
                    span: span.start..span.start + found.len_utf8(),
                    found,
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    if words.is_empty() {
        return Err(vec![ParseError::Empty]);
    }
    Ok(words)
}
