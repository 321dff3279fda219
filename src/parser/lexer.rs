//! Lexer for input phrases using logos

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    /// A run of ASCII letters, folded to lower case
    #[regex(r"[a-zA-Z]+", |lex| lex.slice().to_ascii_lowercase())]
    Word(String),
}

/// Lex input string into tokens with spans
///
/// Unrecognised input comes back as `Err(())` with the span it covers.
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}
