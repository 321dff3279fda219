//! Letter to keypad mapping
//!
//! The glyph places letters on a 3x3 keypad, numbered 1-9 left to right and
//! top to bottom. Each key carries up to three letters; a letter's marker is
//! its 1-based position on the key.

use super::ast::NodeSpec;
use crate::error::ParseError;

/// Letters on keys 1 through 9
pub const KEYPAD: [&str; 9] = ["abc", "def", "ghi", "jkl", "mno", "pqr", "stu", "vwx", "yz"];

/// Key and marker index of a lower-case letter
pub fn key_of(letter: char) -> Option<(u8, u8)> {
    KEYPAD.iter().zip(1u8..).find_map(|(letters, key)| {
        letters
            .chars()
            .position(|c| c == letter)
            .map(|i| (key, i as u8 + 1))
    })
}

/// Letters carried by a key, `None` outside 1-9
pub fn letters_on(key: u8) -> Option<&'static str> {
    KEYPAD.get(usize::from(key).checked_sub(1)?).copied()
}

/// Group a word's letters into nodes
///
/// Consecutive letters on the same key share one node, keeping their
/// markers in order. Returns the first character without a key as an
/// error, with its byte span inside `word`.
pub fn node_specs(word: &str) -> Result<Vec<NodeSpec>, ParseError> {
    let mut specs: Vec<NodeSpec> = Vec::new();
    for (offset, letter) in word.char_indices() {
        let Some((key, marker)) = key_of(letter.to_ascii_lowercase()) else {
            return Err(ParseError::InvalidCharacter {
                span: offset..offset + letter.len_utf8(),
                found: letter,
            });
        };
        match specs.last_mut() {
            Some(last) if last.key == key => last.markers.push(marker),
            _ => specs.push(NodeSpec {
                key,
                markers: vec![marker],
            }),
        }
    }
    Ok(specs)
}
