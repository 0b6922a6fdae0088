//! Token identity, priority classes and source positions.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for token kind identifiers.
///
/// A token kind is the consumer's notion of "token type": the identity a
/// lexical pattern is tagged with, and the identity a grammar terminal can
/// match against. It is typically a small `Copy` enum.
///
/// ## Example
///
/// ```rust
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum MyKind {
///     Number,
///     Plus,
///     Whitespace,
///     Error,
///     Eof,
/// }
/// // Any such enum is a sagitta::TokenKind automatically.
/// fn assert_kind<K: sagitta::TokenKind>() {}
/// assert_kind::<MyKind>();
/// ```
pub trait TokenKind:
    Copy + PartialEq + Eq + std::hash::Hash + fmt::Debug + Send + Sync + 'static
{
}

impl<T> TokenKind for T where
    T: Copy + PartialEq + Eq + std::hash::Hash + fmt::Debug + Send + Sync + 'static
{
}

/// Priority class of a lexical pattern.
///
/// When one DFA state accepts several patterns of the same lexeme length, the
/// higher class wins; among equal classes the first-registered pattern wins,
/// so registration order is significant.
///
/// `Whitespace`-class tokens are additionally filtered out of the token
/// stream unless the caller asks for them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum TokenClass {
    /// Trivia: filtered before tokens reach the caller.
    Whitespace,
    /// Ordinary patterns (identifiers, numbers, operators).
    Default,
    /// Reserved words: beat a `Default` pattern accepting the same lexeme.
    Keyword,
}

/// A row/column position in source text, captured at match start.
///
/// Both components are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position of the first character of an input.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(1, 1)
    }

    /// Advance past one character, handling line breaks.
    #[must_use]
    pub const fn advanced(self, c: char) -> Self {
        if c == '\n' {
            Self::new(self.line + 1, 1)
        } else {
            Self::new(self.line, self.column + 1)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_advances_over_newlines() {
        let p = Position::start();
        assert_eq!(p.advanced('a'), Position::new(1, 2));
        assert_eq!(p.advanced('\n'), Position::new(2, 1));
    }

    #[test]
    fn token_class_ordering() {
        assert!(TokenClass::Keyword > TokenClass::Default);
        assert!(TokenClass::Default > TokenClass::Whitespace);
    }
}
