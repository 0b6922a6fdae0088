//! FIRST and FOLLOW set computation.
//!
//! Both sets are computed by monotone iterative fixpoints over finite
//! terminal sets, so termination is guaranteed. FIRST sets may contain the
//! epsilon terminal (the nonterminal is nullable); FOLLOW sets never do.

use super::{Grammar, NtId, Symbol, Terminal};
use crate::syntax::TokenKind;
use hashbrown::HashSet;

/// A set of terminals.
pub type TermSet<K> = HashSet<Terminal<K>, ahash::RandomState>;

/// FIRST/FOLLOW sets of every nonterminal of one grammar, computed once at
/// table-construction time and queried during parsing and recovery.
#[derive(Debug, Clone)]
pub struct GrammarAnalysis<K: TokenKind> {
    first: Vec<TermSet<K>>,
    follow: Vec<TermSet<K>>,
}

impl<K: TokenKind> GrammarAnalysis<K> {
    #[must_use]
    pub fn new(grammar: &Grammar<K>) -> Self {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);
        Self { first, follow }
    }

    /// FIRST set of a nonterminal; contains epsilon iff it is nullable.
    #[must_use]
    pub fn first(&self, nt: NtId) -> &TermSet<K> {
        &self.first[nt.index()]
    }

    /// FOLLOW set of a nonterminal.
    #[must_use]
    pub fn follow(&self, nt: NtId) -> &TermSet<K> {
        &self.follow[nt.index()]
    }

    /// FIRST set of a symbol sequence. The empty sequence yields `{epsilon}`.
    #[must_use]
    pub fn first_of_sequence(&self, symbols: &[Symbol<K>]) -> TermSet<K> {
        sequence_first(&self.first, symbols)
    }
}

/// FIRST of a sequence against the given per-nonterminal FIRST sets: the
/// FIRST of the head symbol, with epsilon standing for "look further" —
/// epsilon survives into the result only if every symbol is nullable.
fn sequence_first<K: TokenKind>(first: &[TermSet<K>], symbols: &[Symbol<K>]) -> TermSet<K> {
    let mut out = TermSet::default();
    if symbols.is_empty() {
        out.insert(Terminal::Epsilon);
        return out;
    }
    for (i, symbol) in symbols.iter().enumerate() {
        let last = i + 1 == symbols.len();
        let nullable = match symbol {
            Symbol::Terminal(Terminal::Epsilon) => {
                if last {
                    out.insert(Terminal::Epsilon);
                }
                true
            }
            Symbol::Terminal(t) => {
                out.insert(t.clone());
                false
            }
            Symbol::Nonterminal(nt) => {
                let set = &first[nt.index()];
                for t in set {
                    if *t != Terminal::Epsilon || last {
                        out.insert(t.clone());
                    }
                }
                set.contains(&Terminal::Epsilon)
            }
        };
        if !nullable {
            break;
        }
    }
    out
}

fn compute_first<K: TokenKind>(grammar: &Grammar<K>) -> Vec<TermSet<K>> {
    let mut first: Vec<TermSet<K>> = vec![TermSet::default(); grammar.nonterminal_count()];
    let mut changed = true;
    while changed {
        changed = false;
        for (_, production) in grammar.productions() {
            let addition = sequence_first(&first, &production.body);
            let target = &mut first[production.head.index()];
            for t in addition {
                if target.insert(t) {
                    changed = true;
                }
            }
        }
    }
    first
}

fn compute_follow<K: TokenKind>(grammar: &Grammar<K>, first: &[TermSet<K>]) -> Vec<TermSet<K>> {
    let mut follow: Vec<TermSet<K>> = vec![TermSet::default(); grammar.nonterminal_count()];
    follow[grammar.start().index()].insert(Terminal::Eof);

    let mut changed = true;
    while changed {
        changed = false;
        for (_, production) in grammar.productions() {
            for (i, symbol) in production.body.iter().enumerate() {
                let Symbol::Nonterminal(nt) = symbol else {
                    continue;
                };
                let suffix_first = sequence_first(first, &production.body[i + 1..]);
                let nullable_suffix = suffix_first.contains(&Terminal::Epsilon);

                // Clone breaks the aliasing between follow[head] and
                // follow[nt] when a nonterminal ends its own production.
                let head_follow: Vec<Terminal<K>> = if nullable_suffix {
                    follow[production.head.index()].iter().cloned().collect()
                } else {
                    Vec::new()
                };

                let target = &mut follow[nt.index()];
                for t in suffix_first {
                    if t != Terminal::Epsilon && target.insert(t) {
                        changed = true;
                    }
                }
                for t in head_follow {
                    if target.insert(t) {
                        changed = true;
                    }
                }
            }
        }
    }
    follow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Eof,
    }

    /// `S → A B ; A → "x" | ε ; B → "y"`
    fn sample() -> (Grammar<Kind>, NtId, NtId, NtId) {
        let mut builder: GrammarBuilder<Kind> = GrammarBuilder::new();
        let s = builder.nonterminal("S");
        let a = builder.nonterminal("A");
        let b = builder.nonterminal("B");
        builder.production(s, [Symbol::nt(a), Symbol::nt(b)]);
        builder.production(a, [Symbol::literal("x")]);
        builder.production(a, [Symbol::epsilon()]);
        builder.production(b, [Symbol::literal("y")]);
        builder.start(s);
        (builder.finish().unwrap(), s, a, b)
    }

    #[test]
    fn first_sets() {
        let (grammar, s, a, b) = sample();
        let analysis = GrammarAnalysis::new(&grammar);

        let first_s = analysis.first(s);
        assert_eq!(first_s.len(), 2);
        assert!(first_s.contains(&Terminal::literal("x")));
        assert!(first_s.contains(&Terminal::literal("y")));

        let first_a = analysis.first(a);
        assert!(first_a.contains(&Terminal::literal("x")));
        assert!(first_a.contains(&Terminal::Epsilon));

        assert!(!analysis.first(b).contains(&Terminal::Epsilon));
    }

    #[test]
    fn follow_sets() {
        let (grammar, s, a, b) = sample();
        let analysis = GrammarAnalysis::new(&grammar);

        assert_eq!(
            analysis.follow(a).iter().collect::<Vec<_>>(),
            vec![&Terminal::literal("y")]
        );
        assert!(analysis.follow(s).contains(&Terminal::Eof));
        assert!(analysis.follow(b).contains(&Terminal::Eof));
    }

    #[test]
    fn first_of_empty_sequence_is_epsilon() {
        let (grammar, ..) = sample();
        let analysis = GrammarAnalysis::new(&grammar);
        let empty = analysis.first_of_sequence(&[]);
        assert_eq!(empty.len(), 1);
        assert!(empty.contains(&Terminal::Epsilon));
    }

    #[test]
    fn nullable_tail_keeps_epsilon() {
        // S → A ; A → ε : FIRST(S) must contain epsilon.
        let mut builder: GrammarBuilder<Kind> = GrammarBuilder::new();
        let s = builder.nonterminal("S");
        let a = builder.nonterminal("A");
        builder.production(s, [Symbol::nt(a)]);
        builder.production(a, [Symbol::epsilon()]);
        builder.start(s);
        let grammar = builder.finish().unwrap();
        let analysis = GrammarAnalysis::new(&grammar);
        assert!(analysis.first(s).contains(&Terminal::Epsilon));
    }
}
