//! External-facing lexer driver.
//!
//! [`Lexer`] owns the compiled DFA plus the stream policy: trivia filtering,
//! nested comment-region suppression, the synthetic end-of-input token, and
//! byte-alphabet mapping. The token stream itself is the lazy [`Tokens`]
//! iterator; [`Lexer::tokenize`] is the eager convenience wrapper.

use super::dfa::Dfa;
use super::pattern::ALPHABET_MIN;
use super::scanner::{ScannedToken, Scanner};
use super::token::Token;
use crate::syntax::{Position, TokenClass, TokenKind};
use std::collections::VecDeque;

/// A compiled lexer: immutable, reusable across inputs and threads.
///
/// Built with [`LexerBuilder`](super::LexerBuilder).
#[derive(Debug, Clone)]
pub struct Lexer<K: TokenKind> {
    dfa: Dfa<K>,
    eof_kind: K,
    error_kind: K,
    comment_pair: Option<(K, K)>,
}

impl<K: TokenKind> Lexer<K> {
    pub(crate) fn new(
        dfa: Dfa<K>,
        eof_kind: K,
        error_kind: K,
        comment_pair: Option<(K, K)>,
    ) -> Self {
        Self {
            dfa,
            eof_kind,
            error_kind,
            comment_pair,
        }
    }

    /// Lazily tokenize `input`, filtering whitespace-class tokens.
    #[must_use]
    pub fn tokens<'a>(&'a self, input: &'a str) -> Tokens<'a, K> {
        Tokens::new(self, input, false)
    }

    /// Lazily tokenize `input`, keeping whitespace-class tokens.
    #[must_use]
    pub fn tokens_all<'a>(&'a self, input: &'a str) -> Tokens<'a, K> {
        Tokens::new(self, input, true)
    }

    /// Tokenize the whole input eagerly. Whitespace-class tokens are
    /// filtered; the final element is always the end-of-input token.
    #[must_use]
    pub fn tokenize(&self, input: &str) -> Vec<Token<K>> {
        self.tokens(input).collect()
    }

    /// Like [`tokenize`](Self::tokenize) but with whitespace tokens kept.
    #[must_use]
    pub fn tokenize_all(&self, input: &str) -> Vec<Token<K>> {
        self.tokens_all(input).collect()
    }

    /// The kind stamped on the synthetic end-of-input token.
    #[must_use]
    pub const fn eof_kind(&self) -> K {
        self.eof_kind
    }

    /// Number of states in the compiled automaton.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.dfa.state_count()
    }
}

/// Lazy token stream over one input.
///
/// Finite and one-pass: yields the significant tokens of the input in order,
/// then exactly one end-of-input token, then `None` forever.
pub struct Tokens<'a, K: TokenKind> {
    lexer: &'a Lexer<K>,
    scanner: Scanner<'a, K>,
    chars: std::str::Chars<'a>,
    pos: Position,
    queued: VecDeque<ScannedToken<K>>,
    scratch: Vec<ScannedToken<K>>,
    /// Comment nesting depth; everything is suppressed while positive.
    depth: u32,
    keep_trivia: bool,
    finished: bool,
    eof_emitted: bool,
}

impl<'a, K: TokenKind> Tokens<'a, K> {
    fn new(lexer: &'a Lexer<K>, input: &'a str, keep_trivia: bool) -> Self {
        Self {
            lexer,
            scanner: Scanner::new(&lexer.dfa, lexer.error_kind),
            chars: input.chars(),
            pos: Position::start(),
            queued: VecDeque::new(),
            scratch: Vec::new(),
            depth: 0,
            keep_trivia,
            finished: false,
            eof_emitted: false,
        }
    }

    /// Apply the stream policy to one scanned token. `None` means the token
    /// is swallowed (trivia, or inside a comment region).
    fn admit(&mut self, scanned: ScannedToken<K>) -> Option<Token<K>> {
        if let Some((begin, end)) = self.lexer.comment_pair {
            if scanned.token.kind == begin {
                self.depth += 1;
                return None;
            }
            if scanned.token.kind == end {
                if self.depth > 0 {
                    self.depth -= 1;
                    return None;
                }
                // An end with no matching begin is out of place, not a
                // comment: hand it to the caller unsuppressed.
                return Some(scanned.token);
            }
            if self.depth > 0 {
                return None;
            }
        }
        if scanned.class == TokenClass::Whitespace && !self.keep_trivia {
            return None;
        }
        Some(scanned.token)
    }
}

impl<K: TokenKind> Iterator for Tokens<'_, K> {
    type Item = Token<K>;

    fn next(&mut self) -> Option<Token<K>> {
        loop {
            if let Some(scanned) = self.queued.pop_front() {
                if let Some(token) = self.admit(scanned) {
                    return Some(token);
                }
                continue;
            }
            if let Some(c) = self.chars.next() {
                let pos = self.pos;
                self.pos = self.pos.advanced(c);
                let code = c as u32;
                if code >= u32::from(ALPHABET_MIN) && code <= 255 {
                    self.scanner.push(c as u8, pos, &mut self.scratch);
                } else {
                    // NUL and anything past U+00FF are outside the alphabet.
                    self.scanner.push_unmapped(c, pos, &mut self.scratch);
                }
                self.queued.extend(self.scratch.drain(..));
                continue;
            }
            if !self.finished {
                self.finished = true;
                self.scanner.finish(&mut self.scratch);
                self.queued.extend(self.scratch.drain(..));
                continue;
            }
            if !self.eof_emitted {
                self.eof_emitted = true;
                return Some(Token::new(self.lexer.eof_kind, "", self.pos));
            }
            return None;
        }
    }
}

impl<K: TokenKind> std::iter::FusedIterator for Tokens<'_, K> {}
