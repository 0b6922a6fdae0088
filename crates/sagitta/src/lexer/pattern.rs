//! Regular-expression combinators over an arena-allocated epsilon-NFA.
//!
//! Patterns are built Thompson-style: every combinator splices fresh start
//! and end nodes into a shared arena and returns a [`Pattern`] handle (a
//! start/end node pair). Star and plus introduce epsilon back-edges, so the
//! graph is cyclic; all traversal over it is visited-set guarded.
//!
//! The source alphabet is the byte range `1..=255`. Unicode-aware classes
//! are out of scope.

use crate::syntax::{TokenClass, TokenKind};
use smallvec::SmallVec;

/// Identity of one NFA node inside a [`PatternSet`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// First and last byte of the fixed source alphabet.
pub const ALPHABET_MIN: u8 = 1;
pub const ALPHABET_MAX: u8 = 255;

/// Accepted-pattern tag on an NFA end node.
///
/// `seq` is the registration order of the pattern; it breaks ties between
/// equal-class patterns accepted by the same DFA state (first wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AcceptTag<K> {
    pub kind: K,
    pub class: TokenClass,
    pub seq: u32,
}

impl<K: Copy> AcceptTag<K> {
    /// Whether `self` outranks `other` under the priority rule: higher class
    /// wins; equal class resolves to the earlier-registered pattern.
    pub(crate) fn outranks(&self, other: &Self) -> bool {
        self.class > other.class || (self.class == other.class && self.seq < other.seq)
    }
}

/// One node of the pattern graph: consuming byte transitions, non-consuming
/// epsilon successors, and an optional accept tag (end nodes only).
#[derive(Debug, Clone)]
pub(crate) struct NfaNode<K> {
    pub byte_edges: SmallVec<[(u8, NodeId); 4]>,
    pub epsilon: SmallVec<[NodeId; 2]>,
    pub accept: Option<AcceptTag<K>>,
}

impl<K> NfaNode<K> {
    const fn new() -> Self {
        Self {
            byte_edges: SmallVec::new_const(),
            epsilon: SmallVec::new_const(),
            accept: None,
        }
    }
}

/// A pattern fragment: a start/end node pair into a [`PatternSet`] arena.
///
/// Fragments are freely composable; composition operators share sub-graphs
/// rather than copying them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub(crate) start: NodeId,
    pub(crate) end: NodeId,
}

/// Arena of NFA nodes plus the set of accepted (tagged) pattern roots.
///
/// All combinators are O(1) or O(|alphabet|) graph splices. Node ids are
/// monotonically increasing per arena and exist for debugging and for the
/// set-keyed canonicalization table of the subset construction.
#[derive(Debug, Clone)]
pub struct PatternSet<K: TokenKind> {
    nodes: Vec<NfaNode<K>>,
    roots: Vec<NodeId>,
    next_seq: u32,
}

impl<K: TokenKind> Default for PatternSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> PatternSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            next_seq: 0,
        }
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("pattern arena overflow"));
        self.nodes.push(NfaNode::new());
        id
    }

    fn fragment(&mut self) -> Pattern {
        let start = self.alloc();
        let end = self.alloc();
        Pattern { start, end }
    }

    pub(crate) fn node(&self, id: NodeId) -> &NfaNode<K> {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn connect(&mut self, from: NodeId, byte: u8, to: NodeId) {
        self.nodes[from.index()].byte_edges.push((byte, to));
    }

    fn connect_epsilon(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.index()].epsilon.push(to);
    }

    /// A single byte.
    pub fn byte(&mut self, b: u8) -> Pattern {
        debug_assert!(b >= ALPHABET_MIN);
        let frag = self.fragment();
        self.connect(frag.start, b, frag.end);
        frag
    }

    /// Any byte in the inclusive range `lo..=hi`.
    pub fn range(&mut self, lo: u8, hi: u8) -> Pattern {
        debug_assert!(ALPHABET_MIN <= lo && lo <= hi);
        let frag = self.fragment();
        for b in lo..=hi {
            self.connect(frag.start, b, frag.end);
        }
        frag
    }

    /// Any byte of `bytes`.
    pub fn one_of(&mut self, bytes: &[u8]) -> Pattern {
        let frag = self.fragment();
        for &b in bytes {
            debug_assert!(b >= ALPHABET_MIN);
            self.connect(frag.start, b, frag.end);
        }
        frag
    }

    /// Any byte of the alphabet *except* those in `excluded`.
    pub fn none_of(&mut self, excluded: &[u8]) -> Pattern {
        let frag = self.fragment();
        for b in ALPHABET_MIN..=ALPHABET_MAX {
            if !excluded.contains(&b) {
                self.connect(frag.start, b, frag.end);
            }
        }
        frag
    }

    /// Any byte of the alphabet.
    pub fn any(&mut self) -> Pattern {
        self.none_of(&[])
    }

    /// `a` followed by `b`.
    pub fn concat(&mut self, a: Pattern, b: Pattern) -> Pattern {
        self.connect_epsilon(a.end, b.start);
        Pattern {
            start: a.start,
            end: b.end,
        }
    }

    /// Any one of `parts`.
    pub fn union<I>(&mut self, parts: I) -> Pattern
    where
        I: IntoIterator<Item = Pattern>,
    {
        let frag = self.fragment();
        for part in parts {
            self.connect_epsilon(frag.start, part.start);
            self.connect_epsilon(part.end, frag.end);
        }
        frag
    }

    /// Zero or more repetitions of `inner`.
    pub fn star(&mut self, inner: Pattern) -> Pattern {
        let frag = self.plus(inner);
        // The start->end epsilon edge is what distinguishes star from plus.
        self.connect_epsilon(frag.start, frag.end);
        frag
    }

    /// One or more repetitions of `inner`: the loop-back edge exists but the
    /// start->end epsilon shortcut does not, so at least one traversal of
    /// `inner` is required.
    pub fn plus(&mut self, inner: Pattern) -> Pattern {
        let frag = self.fragment();
        self.connect_epsilon(frag.start, inner.start);
        self.connect_epsilon(inner.end, inner.start);
        self.connect_epsilon(inner.end, frag.end);
        frag
    }

    /// Zero or one occurrence of `inner`.
    pub fn opt(&mut self, inner: Pattern) -> Pattern {
        let frag = self.fragment();
        self.connect_epsilon(frag.start, inner.start);
        self.connect_epsilon(inner.end, frag.end);
        self.connect_epsilon(frag.start, frag.end);
        frag
    }

    /// The exact byte sequence of `text`, built from `concat` over `byte`.
    pub fn literal(&mut self, text: &str) -> Pattern {
        let frag = self.fragment();
        let mut current = frag.start;
        for b in text.bytes() {
            let next = self.alloc();
            self.connect(current, b, next);
            current = next;
        }
        self.connect_epsilon(current, frag.end);
        frag
    }

    /// Tag `pattern` as a complete match producing `kind`, and register it
    /// for compilation into the combined automaton.
    ///
    /// Registration order is significant: among equal-class patterns accepted
    /// in the same DFA state, the first-registered one wins.
    pub fn accept(&mut self, pattern: Pattern, kind: K, class: TokenClass) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.nodes[pattern.end.index()].accept = Some(AcceptTag { kind, class, seq });
        self.roots.push(pattern.start);
    }
}
