//! Compiler front-end construction toolkit.
//!
//! Declarative lexical patterns and a context-free grammar go in; a
//! maximal-munch tokenizer and a deterministic table-driven LL(1) parser
//! producing a mutable parse tree come out. Downstream language stages
//! (AST lowering, type checking, evaluation) are the caller's business and
//! interact only through [`ParseOutcome`] and the tree mutation API.
//!
//! The pipeline: pattern combinators build an epsilon-NFA, subset
//! construction compiles it to a DFA, the tokenizer drives the DFA with
//! longest-match semantics, and the parser consumes the token stream with
//! one token of lookahead, guided by the grammar's LL(1) table.
//!
//! ```rust
//! use sagitta::{GrammarBuilder, LexerBuilder, Parser, Symbol};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind { Number, Op, Space, Error, Eof }
//!
//! // Lexical vocabulary.
//! let mut lexer = LexerBuilder::new();
//! let digit = lexer.range(b'0', b'9');
//! let number = lexer.plus(digit);
//! lexer.token(Kind::Number, number);
//! let plus = lexer.byte(b'+');
//! lexer.token(Kind::Op, plus);
//! let space = lexer.byte(b' ');
//! lexer.whitespace(Kind::Space, space);
//! let lexer = lexer.build(Kind::Eof, Kind::Error)?;
//!
//! // Grammar: E → T E' ; E' → "+" T E' | ε ; T → Number.
//! let mut grammar = GrammarBuilder::new();
//! let e = grammar.nonterminal("E");
//! let e2 = grammar.nonterminal("E'");
//! let t = grammar.nonterminal("T");
//! grammar.production(e, [Symbol::nt(t), Symbol::nt(e2)]);
//! grammar.production(e2, [Symbol::literal("+"), Symbol::nt(t), Symbol::nt(e2)]);
//! grammar.production(e2, [Symbol::epsilon()]);
//! grammar.production(t, [Symbol::kind(Kind::Number)]);
//! grammar.start(e);
//! let grammar = grammar.finish()?;
//! let table = grammar.ll1_table()?;
//!
//! let tokens = lexer.tokenize("1 + 2 + 3");
//! let outcome = Parser::new(&grammar, &table, Kind::Eof).parse(&tokens);
//! assert!(outcome.is_valid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Cargo features
//!
//! - `diagnostics`: derive [`miette::Diagnostic`] on the error types.
//! - `serialize`: `serde` derives on [`Position`] and [`TokenClass`].

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use error::{GrammarError, LexerError, ParseMetrics, SyntaxError};
pub use grammar::{
    Grammar, GrammarAnalysis, GrammarBuilder, NtId, ProdId, Production, Symbol, Terminal,
};
pub use lexer::{Lexer, LexerBuilder, Pattern, PatternSet, Token, Tokens};
pub use parser::{NodeKind, ParseOutcome, ParseTable, ParseTree, Parser, Preorder, TreeNodeId};
pub use syntax::{Position, TokenClass, TokenKind};
