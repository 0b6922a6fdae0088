//! Stack-based predictive LL(1) parser with panic-mode error recovery.
//!
//! The parser walks the token stream left to right with one token of
//! lookahead and never backtracks. Two structurally parallel stacks drive
//! it: grammar symbols to satisfy, and the tree nodes those symbols belong
//! to. Expanding a nonterminal pops both, appends one child per production
//! symbol to the popped node, and pushes the children right-to-left so the
//! leftmost is handled next.
//!
//! Recovery strategy, applied so one run can report several independent
//! mistakes:
//!
//! - Terminal mismatch: record a diagnostic and treat the expected terminal
//!   as inserted — the leaf stays tokenless and the input token is retried
//!   against the next stack symbol.
//! - No table entry: record a diagnostic; if the lookahead is in FOLLOW of
//!   the nonterminal (or is end-of-input), the nonterminal is abandoned,
//!   otherwise the token is skipped and the nonterminal retried.

pub mod table;
pub mod tree;

pub use table::ParseTable;
pub use tree::{NodeKind, ParseTree, Preorder, TreeNodeId};

use crate::error::{ParseMetrics, SyntaxError};
use crate::grammar::{Grammar, Symbol, Terminal};
use crate::lexer::Token;
use crate::syntax::{Position, TokenKind};
use std::time::Instant;

/// Everything a parse run produces: the tree, the accumulated diagnostics,
/// a validity flag (`true` iff no diagnostics), and run metrics.
#[derive(Debug)]
pub struct ParseOutcome<K: TokenKind> {
    pub tree: ParseTree<K>,
    pub diagnostics: Vec<SyntaxError>,
    pub is_valid: bool,
    pub metrics: ParseMetrics,
}

/// A predictive parser over one grammar and its LL(1) table.
///
/// Immutable and reusable; per-run state lives on the stack of
/// [`parse`](Self::parse).
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g, K: TokenKind> {
    grammar: &'g Grammar<K>,
    table: &'g ParseTable<K>,
    eof_kind: K,
}

impl<'g, K: TokenKind> Parser<'g, K> {
    #[must_use]
    pub const fn new(grammar: &'g Grammar<K>, table: &'g ParseTable<K>, eof_kind: K) -> Self {
        Self {
            grammar,
            table,
            eof_kind,
        }
    }

    /// Parse a token stream into a tree, accumulating diagnostics instead of
    /// stopping at the first error.
    #[must_use]
    pub fn parse(&self, tokens: &[Token<K>]) -> ParseOutcome<K> {
        let started = Instant::now();
        let mut metrics = ParseMetrics::default();
        let mut diagnostics: Vec<SyntaxError> = Vec::new();

        let start = self.grammar.start();
        let mut tree = ParseTree::new(start);
        // The end-of-input sentinel pairs with a detached leaf; it is not
        // part of the tree the caller sees.
        let eof_leaf = tree.new_leaf(Terminal::Eof);

        let mut symbols: Vec<Symbol<K>> = vec![Symbol::Terminal(Terminal::Eof), Symbol::nt(start)];
        let mut nodes: Vec<TreeNodeId> = vec![eof_leaf, tree.root()];

        let mut cursor = 0usize;

        while let (Some(symbol), Some(node)) = (symbols.pop(), nodes.pop()) {
            let token = tokens.get(cursor);
            match symbol {
                Symbol::Terminal(Terminal::Epsilon) => {
                    // The empty alternative consumes nothing; the leaf stays
                    // as a tokenless epsilon marker.
                }
                Symbol::Terminal(ref terminal) => {
                    if terminal.matches(token, self.eof_kind) {
                        if let Some(token) = token {
                            tree.set_token(node, token.clone());
                            cursor += 1;
                            metrics.tokens_consumed += 1;
                        }
                    } else {
                        diagnostics.push(SyntaxError::new(
                            vec![terminal.to_string()],
                            describe(token),
                            position(tokens, cursor),
                        ));
                        metrics.errors_recovered += 1;
                        // Treat the terminal as inserted: the leaf stays
                        // unmatched and the token is retried against the
                        // next stack symbol.
                    }
                }
                Symbol::Nonterminal(nt) => {
                    match self.table.lookup(nt, token, self.eof_kind) {
                        Some(prod) => {
                            let body = &self.grammar.production(prod).body;
                            let mut children = Vec::with_capacity(body.len());
                            for symbol in body {
                                let child = match symbol {
                                    Symbol::Terminal(t) => tree.new_leaf(t.clone()),
                                    Symbol::Nonterminal(child_nt) => tree.new_inner(*child_nt),
                                };
                                tree.push_child(node, child);
                                children.push(child);
                                metrics.nodes_created += 1;
                            }
                            for (symbol, child) in body.iter().zip(children).rev() {
                                symbols.push(symbol.clone());
                                nodes.push(child);
                            }
                        }
                        None => {
                            diagnostics.push(SyntaxError::new(
                                self.table.expected_for(nt),
                                describe(token),
                                position(tokens, cursor),
                            ));
                            metrics.errors_recovered += 1;
                            let at_end = token.map_or(true, |t| t.kind == self.eof_kind);
                            let in_follow = self
                                .table
                                .follow_set(nt)
                                .iter()
                                .any(|t| t.matches(token, self.eof_kind));
                            if at_end || in_follow {
                                // Abandon the nonterminal; its node stays as
                                // an empty inner node.
                            } else {
                                // Skip the offending token and retry.
                                cursor += 1;
                                symbols.push(Symbol::nt(nt));
                                nodes.push(node);
                            }
                        }
                    }
                }
            }
        }

        metrics.parse_time = started.elapsed();
        let is_valid = diagnostics.is_empty();
        ParseOutcome {
            tree,
            diagnostics,
            is_valid,
            metrics,
        }
    }
}

fn describe<K: TokenKind>(token: Option<&Token<K>>) -> String {
    match token {
        Some(t) if !t.text.is_empty() => format!("`{}`", t.text),
        _ => "end of input".to_string(),
    }
}

fn position<K: TokenKind>(tokens: &[Token<K>], cursor: usize) -> Position {
    tokens
        .get(cursor)
        .or_else(|| tokens.last())
        .map_or_else(Position::start, |t| t.pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Number,
        Op,
        Eof,
    }

    fn token(kind: Kind, text: &str, column: u32) -> Token<Kind> {
        Token::new(kind, text, Position::new(1, column))
    }

    /// `E → T E' ; E' → "+" T E' | ε ; T → Number`
    fn expr_setup() -> (Grammar<Kind>, ParseTable<Kind>) {
        let mut builder: GrammarBuilder<Kind> = GrammarBuilder::new();
        let e = builder.nonterminal("E");
        let e2 = builder.nonterminal("E'");
        let t = builder.nonterminal("T");
        builder.production(e, [Symbol::nt(t), Symbol::nt(e2)]);
        builder.production(
            e2,
            [Symbol::literal("+"), Symbol::nt(t), Symbol::nt(e2)],
        );
        builder.production(e2, [Symbol::epsilon()]);
        builder.production(t, [Symbol::kind(Kind::Number)]);
        builder.start(e);
        let grammar = builder.finish().unwrap();
        let table = grammar.ll1_table().unwrap();
        (grammar, table)
    }

    #[test]
    fn valid_input_parses_cleanly() {
        let (grammar, table) = expr_setup();
        let parser = Parser::new(&grammar, &table, Kind::Eof);
        let tokens = [
            token(Kind::Number, "1", 1),
            token(Kind::Op, "+", 2),
            token(Kind::Number, "2", 3),
            token(Kind::Op, "+", 4),
            token(Kind::Number, "3", 5),
            token(Kind::Eof, "", 6),
        ];
        let outcome = parser.parse(&tokens);
        assert!(outcome.is_valid);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.metrics.tokens_consumed, 6);

        // 1+2+3: E, T×3, E'×3 inner nodes; 3 number leaves, 2 "+" leaves,
        // one epsilon leaf.
        let tree = &outcome.tree;
        assert_eq!(
            tree.symbol_count(|kind| matches!(kind, NodeKind::Inner { .. })),
            7
        );
        assert_eq!(
            tree.symbol_count(|kind| matches!(
                kind,
                NodeKind::Leaf { token: Some(_), .. }
            )),
            5
        );
        assert_eq!(
            tree.symbol_count(|kind| matches!(
                kind,
                NodeKind::Leaf { terminal: Terminal::Epsilon, .. }
            )),
            1
        );
    }

    #[test]
    fn missing_operand_reports_expected_number() {
        let (grammar, table) = expr_setup();
        let parser = Parser::new(&grammar, &table, Kind::Eof);
        // "1 + +" : the second "+" arrives where a Number is required.
        let tokens = [
            token(Kind::Number, "1", 1),
            token(Kind::Op, "+", 2),
            token(Kind::Op, "+", 3),
            token(Kind::Eof, "", 4),
        ];
        let outcome = parser.parse(&tokens);
        assert!(!outcome.is_valid);
        assert!(!outcome.diagnostics.is_empty());
        let first = &outcome.diagnostics[0];
        assert_eq!(first.position, Position::new(1, 3));
        assert!(first.expected.iter().any(|e| e == "Number"));
    }

    #[test]
    fn two_independent_errors_are_both_reported() {
        let (grammar, table) = expr_setup();
        let parser = Parser::new(&grammar, &table, Kind::Eof);
        // "+ 1 + +" : a leading stray "+" and a trailing incomplete "+".
        let tokens = [
            token(Kind::Op, "+", 1),
            token(Kind::Number, "1", 2),
            token(Kind::Op, "+", 3),
            token(Kind::Op, "+", 4),
            token(Kind::Eof, "", 5),
        ];
        let outcome = parser.parse(&tokens);
        assert!(outcome.diagnostics.len() >= 2);
        // The valid middle still produced structure.
        assert!(outcome
            .tree
            .nodes()
            .any(|id| outcome.tree.token(id).is_some_and(|t| t.text == "1")));
    }

    #[test]
    fn empty_stream_against_nullable_start() {
        // S → ε parses the bare end-of-input token.
        let mut builder: GrammarBuilder<Kind> = GrammarBuilder::new();
        let s = builder.nonterminal("S");
        builder.production(s, [Symbol::epsilon()]);
        builder.start(s);
        let grammar = builder.finish().unwrap();
        let table = grammar.ll1_table().unwrap();
        let parser = Parser::new(&grammar, &table, Kind::Eof);
        let outcome = parser.parse(&[token(Kind::Eof, "", 1)]);
        assert!(outcome.is_valid);
    }
}
