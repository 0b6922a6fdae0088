//! Error types and diagnostics.
//!
//! Three distinct failure modes, per the error taxonomy of this crate:
//!
//! - [`LexerError`]: lexer *construction* failures. Lexical mismatches at
//!   scan time are not errors — they surface as error tokens in the stream
//!   and scanning continues.
//! - [`GrammarError`]: grammar/table construction failures, most importantly
//!   the LL(1) conflict. Fatal to table construction; the caller receives no
//!   table and must not parse.
//! - [`SyntaxError`]: parse-time diagnostics. Accumulated into a list on the
//!   [`ParseOutcome`](crate::parser::ParseOutcome), never thrown across the
//!   tokenizer/parser boundary.
//!
//! When the `diagnostics` feature is enabled the error types derive
//! [`miette::Diagnostic`] for rich rendering.

use crate::syntax::Position;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors building a lexer from a pattern set.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexerError {
    #[error("lexer has no accepted patterns")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::no_patterns)))]
    NoPatterns,

    #[error("pattern accepts the empty string; maximal munch would not advance")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::empty_match)))]
    EmptyMatch,
}

/// Errors building a grammar or its LL(1) parse table.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("grammar has no start symbol")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::no_start)))]
    NoStartSymbol,

    #[error("nonterminal `{name}` has no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::missing_productions)))]
    MissingProductions { name: String },

    #[error("production references a nonterminal foreign to this grammar")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::foreign_nonterminal)))]
    ForeignNonterminal,

    /// The grammar is not LL(1): two productions of `nonterminal` claim the
    /// same parse-table cell for `terminal`.
    #[error("LL(1) conflict: two productions of `{nonterminal}` apply on {terminal}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::ll1_conflict)))]
    Ll1Conflict {
        nonterminal: String,
        terminal: String,
    },
}

/// A syntax error recorded during predictive parsing.
///
/// Carries the terminal(s) the parser would have accepted, a description of
/// what it actually saw, and the source position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("expected {}, found {found} at {position}", SyntaxError::format_expected_list(.expected))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(parser::syntax_error)))]
pub struct SyntaxError {
    pub expected: Vec<String>,
    pub found: String,
    pub position: Position,
}

impl SyntaxError {
    #[must_use]
    pub const fn new(expected: Vec<String>, found: String, position: Position) -> Self {
        Self {
            expected,
            found,
            position,
        }
    }

    /// Render an expected-terminal list as a human-readable phrase.
    #[must_use]
    pub fn format_expected_list(expected: &[String]) -> String {
        match expected.len() {
            0 => "nothing".to_string(),
            1 => expected[0].clone(),
            2 => format!("{} or {}", expected[0], expected[1]),
            _ => {
                let mut result = expected[..expected.len() - 1].join(", ");
                result.push_str(", or ");
                result.push_str(&expected[expected.len() - 1]);
                result
            }
        }
    }
}

/// Bookkeeping gathered during a parse run.
#[derive(Debug, Default, Clone)]
pub struct ParseMetrics {
    pub tokens_consumed: usize,
    pub nodes_created: usize,
    pub errors_recovered: usize,
    pub parse_time: std::time::Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display() {
        let err = SyntaxError::new(
            vec!["`+`".to_string(), "number".to_string()],
            "`;`".to_string(),
            Position::new(3, 7),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("`+` or number"));
        assert!(rendered.contains("3:7"));
    }

    #[test]
    fn expected_list_formatting() {
        assert_eq!(SyntaxError::format_expected_list(&[]), "nothing");
        assert_eq!(
            SyntaxError::format_expected_list(&["a".into()]),
            "a".to_string()
        );
        assert_eq!(
            SyntaxError::format_expected_list(&["a".into(), "b".into(), "c".into()]),
            "a, b, or c".to_string()
        );
    }

    #[test]
    fn ll1_conflict_names_the_cell() {
        let err = GrammarError::Ll1Conflict {
            nonterminal: "Stmt".to_string(),
            terminal: "`if`".to_string(),
        };
        assert!(err.to_string().contains("Stmt"));
        assert!(err.to_string().contains("`if`"));
    }
}
