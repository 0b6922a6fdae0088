//! Arena-backed mutable parse tree.
//!
//! Nodes live in a flat arena and reference each other by index, so pruning
//! is a splice of id lists rather than a pointer dance. Removing a node
//! never drops its subtree: the children take the removed node's place in
//! its parent, in order. Detached nodes stay in the arena but are invisible
//! to traversal, which always starts at the root.

use crate::grammar::{NtId, Terminal};
use crate::lexer::Token;
use crate::syntax::TokenKind;
use std::mem;

/// Identity of one node inside a [`ParseTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeNodeId(u32);

impl TreeNodeId {
    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a tree node is: an inner node owning the subtree of one nonterminal
/// expansion, or a leaf for one terminal (carrying its matched token, if
/// any; epsilon leaves and error-recovered leaves have none).
#[derive(Debug, Clone)]
pub enum NodeKind<K: TokenKind> {
    Inner {
        nonterminal: NtId,
    },
    Leaf {
        terminal: Terminal<K>,
        token: Option<Token<K>>,
    },
}

#[derive(Debug, Clone)]
struct TreeNode<K: TokenKind> {
    kind: NodeKind<K>,
    parent: Option<TreeNodeId>,
    children: Vec<TreeNodeId>,
}

/// The parse tree produced by a parser run, mutable in place afterwards.
#[derive(Debug, Clone)]
pub struct ParseTree<K: TokenKind> {
    nodes: Vec<TreeNode<K>>,
    root: TreeNodeId,
}

impl<K: TokenKind> ParseTree<K> {
    pub(crate) fn new(start: NtId) -> Self {
        let root = TreeNode {
            kind: NodeKind::Inner { nonterminal: start },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: TreeNodeId(0),
        }
    }

    fn alloc(&mut self, kind: NodeKind<K>) -> TreeNodeId {
        let id = TreeNodeId(u32::try_from(self.nodes.len()).expect("tree arena overflow"));
        self.nodes.push(TreeNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached inner node.
    pub(crate) fn new_inner(&mut self, nonterminal: NtId) -> TreeNodeId {
        self.alloc(NodeKind::Inner { nonterminal })
    }

    /// Create a detached leaf.
    pub(crate) fn new_leaf(&mut self, terminal: Terminal<K>) -> TreeNodeId {
        self.alloc(NodeKind::Leaf {
            terminal,
            token: None,
        })
    }

    /// Append `child` to `parent`'s child list.
    pub(crate) fn push_child(&mut self, parent: TreeNodeId, child: TreeNodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Attach the matched token to a leaf.
    pub(crate) fn set_token(&mut self, leaf: TreeNodeId, token: Token<K>) {
        if let NodeKind::Leaf { token: slot, .. } = &mut self.nodes[leaf.index()].kind {
            *slot = Some(token);
        }
    }

    #[must_use]
    pub const fn root(&self) -> TreeNodeId {
        self.root
    }

    #[must_use]
    pub fn kind(&self, id: TreeNodeId) -> &NodeKind<K> {
        &self.nodes[id.index()].kind
    }

    #[must_use]
    pub fn children(&self, id: TreeNodeId) -> &[TreeNodeId] {
        &self.nodes[id.index()].children
    }

    /// The token attached to a leaf, if this is a leaf and one was matched.
    #[must_use]
    pub fn token(&self, id: TreeNodeId) -> Option<&Token<K>> {
        match &self.nodes[id.index()].kind {
            NodeKind::Leaf { token, .. } => token.as_ref(),
            NodeKind::Inner { .. } => None,
        }
    }

    /// Depth-first pre-order traversal from the root. Restartable: each call
    /// returns a fresh iterator.
    #[must_use]
    pub fn nodes(&self) -> Preorder<'_, K> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Count the reachable nodes satisfying `predicate`.
    #[must_use]
    pub fn symbol_count<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&NodeKind<K>) -> bool,
    {
        self.nodes().filter(|&id| predicate(self.kind(id))).count()
    }

    /// Whether any node at exactly `depth` (root is depth 0) satisfies
    /// `predicate`.
    #[must_use]
    pub fn depth_contains<F>(&self, depth: usize, mut predicate: F) -> bool
    where
        F: FnMut(&NodeKind<K>) -> bool,
    {
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, d)) = stack.pop() {
            if d == depth {
                if predicate(self.kind(id)) {
                    return true;
                }
                continue;
            }
            for &child in self.children(id) {
                stack.push((child, d + 1));
            }
        }
        false
    }

    /// Delete every reachable node satisfying `predicate`, splicing each
    /// deleted node's children into its parent at the deleted position.
    /// Repeats until no match remains, since splicing can expose new ones.
    /// The root is exempt.
    pub fn remove_nodes<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&NodeKind<K>) -> bool,
    {
        while let Some(target) = self.find_match(&mut predicate) {
            self.splice_out(target);
        }
    }

    fn find_match<F>(&self, predicate: &mut F) -> Option<TreeNodeId>
    where
        F: FnMut(&NodeKind<K>) -> bool,
    {
        self.nodes()
            .find(|&id| id != self.root && predicate(self.kind(id)))
    }

    fn splice_out(&mut self, id: TreeNodeId) {
        let parent = self.nodes[id.index()]
            .parent
            .expect("non-root node reachable from the root has a parent");
        let children = mem::take(&mut self.nodes[id.index()].children);
        for &child in &children {
            self.nodes[child.index()].parent = Some(parent);
        }
        self.nodes[id.index()].parent = None;

        let siblings = &mut self.nodes[parent.index()].children;
        let position = siblings
            .iter()
            .position(|&c| c == id)
            .expect("parent lists the removed node as a child");
        siblings.splice(position..=position, children);
    }
}

/// Restartable depth-first pre-order iterator over reachable nodes.
pub struct Preorder<'a, K: TokenKind> {
    tree: &'a ParseTree<K>,
    stack: Vec<TreeNodeId>,
}

impl<K: TokenKind> Iterator for Preorder<'_, K> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<TreeNodeId> {
        let id = self.stack.pop()?;
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

impl<K: TokenKind> std::iter::FusedIterator for Preorder<'_, K> {}
