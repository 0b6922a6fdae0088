//! Subset construction: pattern NFA to lexical DFA.
//!
//! DFA states are canonical: two states are the same object exactly when
//! their underlying NFA-node sets are set-equal. Canonicalization is keyed
//! by the sorted node-id set, giving collision-free equality and hashing.
//!
//! Epsilon closures are memoized per *individual* NFA node only — a node's
//! closure is a pure function of the immutable graph. Closures of node sets
//! are always recomputed as unions of the per-node closures, never cached at
//! the set level, because sets are generated fresh on every fan-out.

use super::pattern::{AcceptTag, NodeId, PatternSet};
use crate::syntax::TokenKind;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Identity of one state of a compiled [`Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sorted set of NFA node ids; the canonical key of one DFA state.
type NodeSet = SmallVec<[NodeId; 8]>;

#[derive(Debug, Clone)]
struct DfaState<K> {
    /// Byte transitions, sorted by byte for binary-search lookup.
    edges: Vec<(u8, StateId)>,
    accept: Option<AcceptTag<K>>,
}

/// Deterministic lexical automaton.
///
/// Immutable after construction; safe to share across threads and to drive
/// over any number of independent inputs.
#[derive(Debug, Clone)]
pub struct Dfa<K: TokenKind> {
    states: Vec<DfaState<K>>,
    start: StateId,
}

impl<K: TokenKind> Dfa<K> {
    /// Compile the combined automaton over every accepted pattern of `set`.
    ///
    /// All registered pattern roots are unioned under a synthetic start set,
    /// so one automaton recognizes the whole vocabulary.
    #[must_use]
    pub fn compile(set: &PatternSet<K>) -> Self {
        let closures = Closures::new(set);

        let mut start_set: NodeSet = SmallVec::new();
        for &root in set.roots() {
            merge_sorted(&mut start_set, closures.of(root));
        }

        let mut states: Vec<DfaState<K>> = Vec::new();
        let mut canonical: HashMap<NodeSet, StateId, ahash::RandomState> =
            HashMap::with_hasher(ahash::RandomState::new());
        let mut worklist: Vec<NodeSet> = Vec::new();

        let start = intern(set, &mut states, &mut canonical, &mut worklist, start_set);

        while let Some(members) = worklist.pop() {
            let from = canonical[&members];

            // Byte fan-out over every member node.
            let mut targets: HashMap<u8, NodeSet, ahash::RandomState> =
                HashMap::with_hasher(ahash::RandomState::new());
            for &node in &members {
                for &(byte, to) in &set.node(node).byte_edges {
                    merge_sorted(targets.entry(byte).or_default(), closures.of(to));
                }
            }

            let mut bytes: Vec<u8> = targets.keys().copied().collect();
            bytes.sort_unstable();

            let mut edges = Vec::with_capacity(bytes.len());
            for byte in bytes {
                let target_set = targets.remove(&byte).expect("fan-out byte present");
                let to = intern(set, &mut states, &mut canonical, &mut worklist, target_set);
                edges.push((byte, to));
            }
            states[from.index()].edges = edges;
        }

        Self { states, start }
    }

    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    /// Consume one byte from `state`, if a transition exists.
    #[inline]
    #[must_use]
    pub fn step(&self, state: StateId, byte: u8) -> Option<StateId> {
        let edges = &self.states[state.index()].edges;
        edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| edges[i].1)
    }

    pub(crate) fn accept(&self, state: StateId) -> Option<&AcceptTag<K>> {
        self.states[state.index()].accept.as_ref()
    }

    /// The token kind `state` accepts, if it is an accepting state.
    #[must_use]
    pub fn accepted_kind(&self, state: StateId) -> Option<K> {
        self.accept(state).map(|tag| tag.kind)
    }

    /// Number of reachable DFA states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// Insert `members` into the canonicalizing table, creating a state on first
/// sight, and return its id. Accept identity is resolved here, once, from
/// the member nodes' tags under the priority rule.
fn intern<K: TokenKind>(
    set: &PatternSet<K>,
    states: &mut Vec<DfaState<K>>,
    canonical: &mut HashMap<NodeSet, StateId, ahash::RandomState>,
    worklist: &mut Vec<NodeSet>,
    members: NodeSet,
) -> StateId {
    if let Some(&existing) = canonical.get(&members) {
        return existing;
    }
    let id = StateId(u32::try_from(states.len()).expect("DFA state overflow"));
    let mut accept: Option<AcceptTag<K>> = None;
    for &node in &members {
        if let Some(tag) = &set.node(node).accept {
            let wins = match &accept {
                Some(best) => tag.outranks(best),
                None => true,
            };
            if wins {
                accept = Some(*tag);
            }
        }
    }
    states.push(DfaState {
        edges: Vec::new(),
        accept,
    });
    canonical.insert(members.clone(), id);
    worklist.push(members);
    id
}

/// Union a sorted id slice into a sorted, deduplicated set.
fn merge_sorted(into: &mut NodeSet, other: &[NodeId]) {
    into.extend_from_slice(other);
    into.sort_unstable();
    into.dedup();
}

/// Per-node epsilon closures, each computed once over the immutable graph.
struct Closures {
    by_node: Vec<Vec<NodeId>>,
}

impl Closures {
    fn new<K: TokenKind>(set: &PatternSet<K>) -> Self {
        let count = set.node_count();
        let mut by_node = Vec::with_capacity(count);
        for index in 0..count {
            by_node.push(Self::compute(set, NodeId(index as u32)));
        }
        Self { by_node }
    }

    /// Depth-first walk over epsilon edges. Star/plus back-edges make the
    /// graph cyclic, so the walk is guarded by the closure set itself.
    fn compute<K: TokenKind>(set: &PatternSet<K>, node: NodeId) -> Vec<NodeId> {
        let mut closure = vec![node];
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            for &next in &set.node(current).epsilon {
                if !closure.contains(&next) {
                    closure.push(next);
                    stack.push(next);
                }
            }
        }
        closure.sort_unstable();
        closure
    }

    fn of(&self, node: NodeId) -> &[NodeId] {
        &self.by_node[node.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TokenClass;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Word,
        Int,
    }

    #[test]
    fn canonical_states_for_a_then_a_or_b() {
        // a(a|b) reaches exactly 4 DFA states: start, after `a`, and one
        // accepting state per branch.
        let mut set: PatternSet<Kind> = PatternSet::new();
        let a0 = set.byte(b'a');
        let a1 = set.byte(b'a');
        let b1 = set.byte(b'b');
        let alt = set.union([a1, b1]);
        let pat = set.concat(a0, alt);
        set.accept(pat, Kind::Word, TokenClass::Default);

        let dfa = Dfa::compile(&set);
        assert_eq!(dfa.state_count(), 4);
    }

    #[test]
    fn keyword_class_wins_in_a_shared_accepting_state() {
        // [a-z]+ as Default and the literal "int" as Keyword: the state
        // reached on "int" accepts both patterns; the keyword tag wins.
        let mut set: PatternSet<Kind> = PatternSet::new();
        let lower = set.range(b'a', b'z');
        let word = set.plus(lower);
        set.accept(word, Kind::Word, TokenClass::Default);
        let int = set.literal("int");
        set.accept(int, Kind::Int, TokenClass::Keyword);

        let dfa = Dfa::compile(&set);
        let mut state = dfa.start();
        for b in *b"int" {
            state = dfa.step(state, b).expect("transition");
        }
        assert_eq!(dfa.accept(state).expect("accepting").kind, Kind::Int);

        // One more letter leaves the keyword path; only the word pattern
        // accepts "ints".
        state = dfa.step(state, b's').expect("transition");
        assert_eq!(dfa.accept(state).expect("accepting").kind, Kind::Word);
    }

    #[test]
    fn star_cycle_closure_terminates() {
        let mut set: PatternSet<Kind> = PatternSet::new();
        let a = set.byte(b'a');
        let rep = set.star(a);
        let b = set.byte(b'b');
        let pat = set.concat(rep, b);
        set.accept(pat, Kind::Word, TokenClass::Default);

        let dfa = Dfa::compile(&set);
        let mut state = dfa.start();
        for byte in *b"aaab" {
            state = dfa.step(state, byte).expect("transition");
        }
        assert!(dfa.accept(state).is_some());
    }
}
