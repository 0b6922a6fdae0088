//! Context-free grammar model: symbols, productions, and the builder.
//!
//! Nonterminals are identity-keyed: every [`GrammarBuilder::nonterminal`]
//! call mints a fresh [`NtId`], and the attached name exists only for
//! diagnostics and table dumps. Two nonterminals with the same name are
//! still distinct symbols.

pub mod analysis;

use crate::error::GrammarError;
use crate::lexer::Token;
use crate::syntax::TokenKind;
use compact_str::CompactString;
use lasso::{Rodeo, Spur};
use smallvec::SmallVec;
use std::fmt;

pub use analysis::GrammarAnalysis;

/// Identity of a nonterminal inside one [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NtId(pub(crate) u32);

impl NtId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a production inside one [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProdId(pub(crate) u32);

impl ProdId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A terminal symbol.
///
/// Matching against tokens is by predicate, not identity: a `Kind` terminal
/// matches every token of that kind, while a `Literal` terminal matches a
/// token whose exact lexeme equals the literal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Terminal<K: TokenKind> {
    /// Matches a token whose text equals this lexeme.
    Literal(CompactString),
    /// Matches any token of this kind.
    Kind(K),
    /// The empty alternative; matches no token.
    Epsilon,
    /// End of input.
    Eof,
}

impl<K: TokenKind> Terminal<K> {
    #[must_use]
    pub fn literal(text: impl Into<CompactString>) -> Self {
        Self::Literal(text.into())
    }

    /// Whether this terminal matches the current token. `None` stands for an
    /// exhausted token stream and matches only `Eof`.
    #[must_use]
    pub fn matches(&self, token: Option<&Token<K>>, eof_kind: K) -> bool {
        match self {
            Self::Epsilon => false,
            Self::Eof => token.map_or(true, |t| t.kind == eof_kind),
            Self::Literal(text) => token.is_some_and(|t| t.text == *text),
            Self::Kind(kind) => token.is_some_and(|t| t.kind == *kind),
        }
    }
}

impl<K: TokenKind> fmt::Display for Terminal<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "`{text}`"),
            Self::Kind(kind) => write!(f, "{kind:?}"),
            Self::Epsilon => f.write_str("\u{3b5}"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A grammar symbol: terminal or nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<K: TokenKind> {
    Terminal(Terminal<K>),
    Nonterminal(NtId),
}

impl<K: TokenKind> Symbol<K> {
    #[must_use]
    pub fn literal(text: impl Into<CompactString>) -> Self {
        Self::Terminal(Terminal::literal(text))
    }

    #[must_use]
    pub const fn kind(kind: K) -> Self {
        Self::Terminal(Terminal::Kind(kind))
    }

    #[must_use]
    pub const fn epsilon() -> Self {
        Self::Terminal(Terminal::Epsilon)
    }

    #[must_use]
    pub const fn nt(id: NtId) -> Self {
        Self::Nonterminal(id)
    }
}

/// One production rule `head → body`. The empty alternative is written as a
/// body of exactly `[epsilon]`.
#[derive(Debug, Clone)]
pub struct Production<K: TokenKind> {
    pub head: NtId,
    pub body: SmallVec<[Symbol<K>; 4]>,
}

/// An immutable, validated grammar.
#[derive(Debug)]
pub struct Grammar<K: TokenKind> {
    names: Rodeo,
    nt_names: Vec<Spur>,
    productions: Vec<Production<K>>,
    /// Productions of each nonterminal, in declaration order.
    by_head: Vec<SmallVec<[ProdId; 4]>>,
    start: NtId,
}

impl<K: TokenKind> Grammar<K> {
    #[must_use]
    pub const fn start(&self) -> NtId {
        self.start
    }

    #[must_use]
    pub fn nonterminal_count(&self) -> usize {
        self.nt_names.len()
    }

    /// Diagnostic name of a nonterminal.
    #[must_use]
    pub fn name(&self, nt: NtId) -> &str {
        self.names.resolve(&self.nt_names[nt.index()])
    }

    #[must_use]
    pub fn production(&self, prod: ProdId) -> &Production<K> {
        &self.productions[prod.index()]
    }

    #[must_use]
    pub fn productions_of(&self, nt: NtId) -> &[ProdId] {
        &self.by_head[nt.index()]
    }

    pub(crate) fn productions(&self) -> impl Iterator<Item = (ProdId, &Production<K>)> {
        self.productions
            .iter()
            .enumerate()
            .map(|(i, p)| (ProdId(i as u32), p))
    }
}

/// Builder for a [`Grammar`].
///
/// ```rust
/// use sagitta::{GrammarBuilder, Symbol};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind { Number, Eof }
///
/// let mut builder: GrammarBuilder<Kind> = GrammarBuilder::new();
/// let expr = builder.nonterminal("Expr");
/// builder.production(expr, [Symbol::kind(Kind::Number)]);
/// builder.start(expr);
/// let grammar = builder.finish().unwrap();
/// assert_eq!(grammar.name(grammar.start()), "Expr");
/// ```
#[derive(Debug)]
pub struct GrammarBuilder<K: TokenKind> {
    names: Rodeo,
    nt_names: Vec<Spur>,
    productions: Vec<Production<K>>,
    start: Option<NtId>,
}

impl<K: TokenKind> Default for GrammarBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> GrammarBuilder<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: Rodeo::default(),
            nt_names: Vec::new(),
            productions: Vec::new(),
            start: None,
        }
    }

    /// Declare a fresh nonterminal. Each call returns a distinct identity
    /// even for a repeated name.
    pub fn nonterminal(&mut self, name: &str) -> NtId {
        let id = NtId(u32::try_from(self.nt_names.len()).expect("nonterminal overflow"));
        self.nt_names.push(self.names.get_or_intern(name));
        id
    }

    /// Add the production `head → body`.
    pub fn production<I>(&mut self, head: NtId, body: I) -> &mut Self
    where
        I: IntoIterator<Item = Symbol<K>>,
    {
        self.productions.push(Production {
            head,
            body: body.into_iter().collect(),
        });
        self
    }

    /// Set the start symbol.
    pub fn start(&mut self, nt: NtId) -> &mut Self {
        self.start = Some(nt);
        self
    }

    /// Validate and freeze the grammar: a start symbol must be set, every
    /// nonterminal must have at least one production, and every symbol
    /// reference must belong to this builder.
    pub fn finish(self) -> Result<Grammar<K>, GrammarError> {
        let start = self.start.ok_or(GrammarError::NoStartSymbol)?;
        let count = self.nt_names.len();

        let mut by_head: Vec<SmallVec<[ProdId; 4]>> = vec![SmallVec::new(); count];
        for (index, production) in self.productions.iter().enumerate() {
            if production.head.index() >= count {
                return Err(GrammarError::ForeignNonterminal);
            }
            for symbol in &production.body {
                if let Symbol::Nonterminal(nt) = symbol {
                    if nt.index() >= count {
                        return Err(GrammarError::ForeignNonterminal);
                    }
                }
            }
            by_head[production.head.index()].push(ProdId(index as u32));
        }

        if let Some(empty) = (0..count).find(|&i| by_head[i].is_empty()) {
            return Err(GrammarError::MissingProductions {
                name: self.names.resolve(&self.nt_names[empty]).to_string(),
            });
        }

        Ok(Grammar {
            names: self.names,
            nt_names: self.nt_names,
            productions: self.productions,
            by_head,
            start,
        })
    }
}
