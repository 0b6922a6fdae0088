//! The token record produced by the lexer.

use crate::syntax::{Position, TokenKind};
use compact_str::CompactString;

/// An immutable token: pattern identity, exact matched lexeme, and the
/// source position of the first matched character.
///
/// Tokens are created the instant the scanner recognizes a completed match
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K: TokenKind> {
    pub kind: K,
    pub text: CompactString,
    pub pos: Position,
}

impl<K: TokenKind> Token<K> {
    #[must_use]
    pub fn new(kind: K, text: impl Into<CompactString>, pos: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }
}
