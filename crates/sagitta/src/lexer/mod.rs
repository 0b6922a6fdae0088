//! Lexical analysis: pattern combinators, DFA compilation, and the
//! maximal-munch tokenizer.
//!
//! Construction flows through [`LexerBuilder`]: combinators build pattern
//! fragments over an epsilon-NFA arena, registration tags them with token
//! kinds and priority classes, and `build` runs the subset construction into
//! an immutable [`Lexer`].

pub mod builder;
pub mod dfa;
pub mod pattern;
pub(crate) mod scanner;
pub mod token;
pub mod tokenizer;

pub use builder::LexerBuilder;
pub use dfa::{Dfa, StateId};
pub use pattern::{Pattern, PatternSet, ALPHABET_MAX, ALPHABET_MIN};
pub use token::Token;
pub use tokenizer::{Lexer, Tokens};
