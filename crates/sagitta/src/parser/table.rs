//! LL(1) parse table construction.
//!
//! The table is sparse: one row per nonterminal, each row split by terminal
//! shape (literal lexeme, token kind, end-of-input) so that lookup against a
//! concrete token is two hash probes at most. A cell claimed by two
//! different productions is an LL(1) conflict and aborts construction.

use crate::error::GrammarError;
use crate::grammar::{Grammar, GrammarAnalysis, NtId, ProdId, Terminal};
use crate::lexer::Token;
use crate::syntax::TokenKind;
use compact_str::CompactString;
use hashbrown::HashMap;

#[derive(Debug, Clone)]
struct Row<K: TokenKind> {
    by_literal: HashMap<CompactString, ProdId, ahash::RandomState>,
    by_kind: HashMap<K, ProdId, ahash::RandomState>,
    eof: Option<ProdId>,
}

impl<K: TokenKind> Default for Row<K> {
    fn default() -> Self {
        Self {
            by_literal: HashMap::default(),
            by_kind: HashMap::default(),
            eof: None,
        }
    }
}

/// An immutable LL(1) parse table, carrying the FIRST/FOLLOW analysis it was
/// built from (the parser's recovery consults FOLLOW sets).
#[derive(Debug, Clone)]
pub struct ParseTable<K: TokenKind> {
    rows: Vec<Row<K>>,
    analysis: GrammarAnalysis<K>,
}

impl<K: TokenKind> Grammar<K> {
    /// Build the LL(1) parse table, or report why this grammar is not LL(1).
    pub fn ll1_table(&self) -> Result<ParseTable<K>, GrammarError> {
        ParseTable::build(self)
    }
}

impl<K: TokenKind> ParseTable<K> {
    /// For every production `A → α`: claim `Table[A][t]` for every terminal
    /// `t` in FIRST(α) except epsilon; if FIRST(α) contains epsilon, claim
    /// `Table[A][t]` for every `t` in FOLLOW(A) as well.
    pub fn build(grammar: &Grammar<K>) -> Result<Self, GrammarError> {
        let analysis = GrammarAnalysis::new(grammar);
        let mut rows: Vec<Row<K>> = vec![Row::default(); grammar.nonterminal_count()];

        for (prod_id, production) in grammar.productions() {
            let head = production.head;
            let first = analysis.first_of_sequence(&production.body);
            let nullable = first.contains(&Terminal::Epsilon);

            for terminal in &first {
                if *terminal != Terminal::Epsilon {
                    claim(grammar, &mut rows, head, terminal, prod_id)?;
                }
            }
            if nullable {
                for terminal in analysis.follow(head) {
                    claim(grammar, &mut rows, head, terminal, prod_id)?;
                }
            }
        }

        Ok(Self { rows, analysis })
    }

    /// Select the production for `nt` on the current token, by matching
    /// predicate: exact lexeme beats token kind; an exhausted stream (or a
    /// token of the end kind) consults the end-of-input cell.
    #[must_use]
    pub fn lookup(&self, nt: NtId, token: Option<&Token<K>>, eof_kind: K) -> Option<ProdId> {
        let row = &self.rows[nt.index()];
        match token {
            Some(t) if t.kind != eof_kind => row
                .by_literal
                .get(t.text.as_str())
                .or_else(|| row.by_kind.get(&t.kind))
                .copied(),
            _ => row.eof,
        }
    }

    /// Human-readable rendering of every terminal with an entry in `nt`'s
    /// row, sorted for stable diagnostics.
    #[must_use]
    pub fn expected_for(&self, nt: NtId) -> Vec<String> {
        let row = &self.rows[nt.index()];
        let mut expected: Vec<String> = row
            .by_literal
            .keys()
            .map(|text| format!("`{text}`"))
            .chain(row.by_kind.keys().map(|kind| format!("{kind:?}")))
            .collect();
        expected.sort_unstable();
        if row.eof.is_some() {
            expected.push("end of input".to_string());
        }
        expected
    }

    #[must_use]
    pub fn first_set(&self, nt: NtId) -> &crate::grammar::analysis::TermSet<K> {
        self.analysis.first(nt)
    }

    #[must_use]
    pub fn follow_set(&self, nt: NtId) -> &crate::grammar::analysis::TermSet<K> {
        self.analysis.follow(nt)
    }
}

fn claim<K: TokenKind>(
    grammar: &Grammar<K>,
    rows: &mut [Row<K>],
    head: NtId,
    terminal: &Terminal<K>,
    prod: ProdId,
) -> Result<(), GrammarError> {
    let row = &mut rows[head.index()];
    let previous = match terminal {
        Terminal::Literal(text) => row.by_literal.insert(text.clone(), prod),
        Terminal::Kind(kind) => row.by_kind.insert(*kind, prod),
        Terminal::Eof => row.eof.replace(prod),
        Terminal::Epsilon => None,
    };
    match previous {
        Some(existing) if existing != prod => Err(GrammarError::Ll1Conflict {
            nonterminal: grammar.name(head).to_string(),
            terminal: terminal.to_string(),
        }),
        _ => Ok(()),
    }
}
