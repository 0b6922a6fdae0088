//! Fluent construction of a [`Lexer`].
//!
//! The builder wraps a [`PatternSet`] arena: combinator calls return
//! [`Pattern`] handles, registration calls tag a pattern with a token kind
//! and a priority class, and [`LexerBuilder::build`] runs the subset
//! construction once over the combined vocabulary.

use super::dfa::Dfa;
use super::pattern::{Pattern, PatternSet};
use super::tokenizer::Lexer;
use crate::error::LexerError;
use crate::syntax::{TokenClass, TokenKind};

/// Builder for a [`Lexer`].
///
/// ```rust
/// use sagitta::{LexerBuilder, TokenClass};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind { Number, Plus, Space, Error, Eof }
///
/// let mut builder = LexerBuilder::new();
/// let digit = builder.range(b'0', b'9');
/// let number = builder.plus(digit);
/// builder.token(Kind::Number, number);
/// let plus = builder.byte(b'+');
/// builder.token(Kind::Plus, plus);
/// let space = builder.byte(b' ');
/// builder.whitespace(Kind::Space, space);
/// let lexer = builder.build(Kind::Eof, Kind::Error).unwrap();
///
/// let kinds: Vec<Kind> = lexer.tokenize("1 + 23").iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, [Kind::Number, Kind::Plus, Kind::Number, Kind::Eof]);
/// ```
#[derive(Debug, Clone)]
pub struct LexerBuilder<K: TokenKind> {
    patterns: PatternSet<K>,
    comment_pair: Option<(K, K)>,
}

impl<K: TokenKind> Default for LexerBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> LexerBuilder<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: PatternSet::new(),
            comment_pair: None,
        }
    }

    // Combinators; see `PatternSet` for semantics.

    pub fn byte(&mut self, b: u8) -> Pattern {
        self.patterns.byte(b)
    }

    pub fn range(&mut self, lo: u8, hi: u8) -> Pattern {
        self.patterns.range(lo, hi)
    }

    pub fn one_of(&mut self, bytes: &[u8]) -> Pattern {
        self.patterns.one_of(bytes)
    }

    pub fn none_of(&mut self, excluded: &[u8]) -> Pattern {
        self.patterns.none_of(excluded)
    }

    pub fn any(&mut self) -> Pattern {
        self.patterns.any()
    }

    pub fn concat(&mut self, a: Pattern, b: Pattern) -> Pattern {
        self.patterns.concat(a, b)
    }

    pub fn union<I>(&mut self, parts: I) -> Pattern
    where
        I: IntoIterator<Item = Pattern>,
    {
        self.patterns.union(parts)
    }

    pub fn star(&mut self, inner: Pattern) -> Pattern {
        self.patterns.star(inner)
    }

    pub fn plus(&mut self, inner: Pattern) -> Pattern {
        self.patterns.plus(inner)
    }

    pub fn opt(&mut self, inner: Pattern) -> Pattern {
        self.patterns.opt(inner)
    }

    pub fn literal(&mut self, text: &str) -> Pattern {
        self.patterns.literal(text)
    }

    /// Register `pattern` as an ordinary (`Default`-class) token.
    pub fn token(&mut self, kind: K, pattern: Pattern) -> &mut Self {
        self.patterns.accept(pattern, kind, TokenClass::Default);
        self
    }

    /// Register the literal `text` as a reserved word. Keyword-class
    /// patterns beat `Default` ones accepting the same lexeme.
    pub fn keyword(&mut self, kind: K, text: &str) -> &mut Self {
        let pattern = self.patterns.literal(text);
        self.patterns.accept(pattern, kind, TokenClass::Keyword);
        self
    }

    /// Register `pattern` as trivia, filtered from the token stream unless
    /// the caller tokenizes with trivia kept.
    pub fn whitespace(&mut self, kind: K, pattern: Pattern) -> &mut Self {
        self.patterns.accept(pattern, kind, TokenClass::Whitespace);
        self
    }

    /// Nominate `begin`/`end` as the comment delimiter kinds. Their patterns
    /// are registered like any other token; the tokenizer tracks a nesting
    /// depth between them and suppresses everything inside.
    pub fn comment_pair(&mut self, begin: K, end: K) -> &mut Self {
        self.comment_pair = Some((begin, end));
        self
    }

    /// Compile the combined automaton.
    ///
    /// Fails if no pattern was registered, or if some registered pattern
    /// accepts the empty string (maximal munch could never advance past it).
    pub fn build(self, eof_kind: K, error_kind: K) -> Result<Lexer<K>, LexerError> {
        if self.patterns.roots().is_empty() {
            return Err(LexerError::NoPatterns);
        }
        let dfa = Dfa::compile(&self.patterns);
        if dfa.accept(dfa.start()).is_some() {
            return Err(LexerError::EmptyMatch);
        }
        Ok(Lexer::new(dfa, eof_kind, error_kind, self.comment_pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Word,
        If,
        Error,
        Eof,
    }

    #[test]
    fn empty_builder_is_rejected() {
        let builder: LexerBuilder<Kind> = LexerBuilder::new();
        assert!(matches!(
            builder.build(Kind::Eof, Kind::Error),
            Err(LexerError::NoPatterns)
        ));
    }

    #[test]
    fn nullable_pattern_is_rejected() {
        let mut builder: LexerBuilder<Kind> = LexerBuilder::new();
        let a = builder.byte(b'a');
        let maybe = builder.star(a);
        builder.token(Kind::Word, maybe);
        assert!(matches!(
            builder.build(Kind::Eof, Kind::Error),
            Err(LexerError::EmptyMatch)
        ));
    }

    #[test]
    fn keyword_beats_identifier() {
        let mut builder: LexerBuilder<Kind> = LexerBuilder::new();
        let lower = builder.range(b'a', b'z');
        let word = builder.plus(lower);
        builder.token(Kind::Word, word);
        builder.keyword(Kind::If, "if");
        let lexer = builder.build(Kind::Eof, Kind::Error).unwrap();

        let kinds: Vec<Kind> = lexer.tokenize("if").iter().map(|t| t.kind).collect();
        assert_eq!(kinds, [Kind::If, Kind::Eof]);
        let kinds: Vec<Kind> = lexer.tokenize("iff").iter().map(|t| t.kind).collect();
        assert_eq!(kinds, [Kind::Word, Kind::Eof]);
    }
}
