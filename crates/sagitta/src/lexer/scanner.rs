//! Incremental character-at-a-time DFA driver.
//!
//! The scanner implements longest-match (maximal-munch) tokenization: it
//! feeds bytes into the DFA, remembering the most recent accepting state it
//! has passed. When the automaton dies on a byte, the remembered match is
//! emitted and every byte consumed past the match boundary is replayed from
//! the start state. Replay is iterative (a pending queue), never recursive,
//! so pathological inputs cannot overflow the stack.
//!
//! A dead byte with no remembered match is a lexical mismatch: the first
//! buffered character is emitted as an error token and scanning resumes at
//! the next character. Lexical errors never halt the scan.

use super::dfa::{Dfa, StateId};
use super::token::Token;
use crate::syntax::{Position, TokenClass, TokenKind};
use compact_str::CompactString;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// A completed match together with the priority class of the pattern that
/// produced it; the tokenizer uses the class for trivia filtering.
#[derive(Debug, Clone)]
pub(crate) struct ScannedToken<K: TokenKind> {
    pub token: Token<K>,
    pub class: TokenClass,
}

/// Private, single-owner runtime state over an immutable DFA.
///
/// One scanner drives one input; running the same DFA over two inputs in
/// parallel takes two scanners.
pub(crate) struct Scanner<'a, K: TokenKind> {
    dfa: &'a Dfa<K>,
    error_kind: K,
    state: StateId,
    /// Bytes consumed since the current token start, with the position each
    /// byte was read at (needed to re-stamp tokens during replay).
    buffer: SmallVec<[(u8, Position); 16]>,
    /// Longest accepted prefix of the buffer: (length, kind, class).
    matched: Option<(usize, K, TokenClass)>,
    /// Bytes awaiting (re-)processing.
    pending: VecDeque<(u8, Position)>,
}

impl<'a, K: TokenKind> Scanner<'a, K> {
    pub(crate) fn new(dfa: &'a Dfa<K>, error_kind: K) -> Self {
        Self {
            dfa,
            error_kind,
            state: dfa.start(),
            buffer: SmallVec::new(),
            matched: None,
            pending: VecDeque::new(),
        }
    }

    /// Feed one input byte, appending any tokens it completes to `out`.
    pub(crate) fn push(&mut self, byte: u8, pos: Position, out: &mut Vec<ScannedToken<K>>) {
        self.pending.push_back((byte, pos));
        self.drain(out);
    }

    /// Feed a character outside the byte alphabet. Whatever is buffered is
    /// flushed first, then the character itself becomes an error token.
    pub(crate) fn push_unmapped(&mut self, c: char, pos: Position, out: &mut Vec<ScannedToken<K>>) {
        self.finish(out);
        out.push(ScannedToken {
            token: Token::new(self.error_kind, c.to_string(), pos),
            class: TokenClass::Default,
        });
    }

    /// Flush at end of input: emit the remembered match (or an error token)
    /// for everything still buffered, replaying leftovers until empty.
    pub(crate) fn finish(&mut self, out: &mut Vec<ScannedToken<K>>) {
        loop {
            self.drain(out);
            if self.buffer.is_empty() {
                break;
            }
            self.emit_and_requeue(None, out);
        }
    }

    fn drain(&mut self, out: &mut Vec<ScannedToken<K>>) {
        while let Some((byte, pos)) = self.pending.pop_front() {
            match self.dfa.step(self.state, byte) {
                Some(next) => {
                    self.state = next;
                    self.buffer.push((byte, pos));
                    if let Some(tag) = self.dfa.accept(next) {
                        // Longest match always wins; the tag itself already
                        // carries the class-resolved winner for this state.
                        self.matched = Some((self.buffer.len(), tag.kind, tag.class));
                    }
                }
                None => self.emit_and_requeue(Some((byte, pos)), out),
            }
        }
    }

    /// The automaton died (or input ended). Emit the remembered match, or an
    /// error token for the first buffered character, then queue every
    /// unconsumed byte for replay from the start state.
    fn emit_and_requeue(
        &mut self,
        dead: Option<(u8, Position)>,
        out: &mut Vec<ScannedToken<K>>,
    ) {
        let taken = match self.matched.take() {
            Some((len, kind, class)) => {
                out.push(ScannedToken {
                    token: Token::new(kind, lexeme(&self.buffer[..len]), self.buffer[0].1),
                    class,
                });
                len
            }
            None => {
                if self.buffer.is_empty() {
                    // Nothing consumed at all: the dead byte itself is the
                    // offending character.
                    if let Some((byte, pos)) = dead {
                        out.push(ScannedToken {
                            token: Token::new(self.error_kind, lexeme(&[(byte, pos)]), pos),
                            class: TokenClass::Default,
                        });
                    }
                    return;
                }
                out.push(ScannedToken {
                    token: Token::new(self.error_kind, lexeme(&self.buffer[..1]), self.buffer[0].1),
                    class: TokenClass::Default,
                });
                1
            }
        };

        // Replay: everything past the emitted prefix goes back in front of
        // the pending queue, followed by the byte that killed the automaton.
        if let Some(dead) = dead {
            self.pending.push_front(dead);
        }
        for &entry in self.buffer[taken..].iter().rev() {
            self.pending.push_front(entry);
        }
        self.buffer.clear();
        self.state = self.dfa.start();
    }
}

/// Rebuild the lexeme text from raw bytes. The alphabet is 1..=255, so each
/// byte maps back to the character it was truncated from.
fn lexeme(bytes: &[(u8, Position)]) -> CompactString {
    bytes.iter().map(|&(b, _)| b as char).collect()
}
