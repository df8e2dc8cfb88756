//! Huffman tree stored as a flat node arena.
//!
//! Nodes live in a `Vec<Node>` and refer to their children by [`NodeId`].
//! Leaves are pushed first, in the frequency table's first-occurrence order,
//! followed by internal nodes in the order they are merged. The root is
//! always the last node created by the builder.
//!
//! # Construction
//!
//! While more than one node is queued, the two lightest are popped and joined
//! under a new internal node: the first pop becomes the left child (bit `0`),
//! the second the right child (bit `1`).
//!
//! # Single-symbol input
//!
//! With one distinct symbol no merge happens and the root is a leaf. That
//! symbol is given the one-bit code `0`; see [`crate::code_table`] and
//! [`crate::decoder`].

use std::fmt;

use log::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::queue::{MinQueue, Weighted};

/// Index of a node in a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tree vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A symbol and how often it occurred.
    Leaf { symbol: u8, weight: u64 },
    /// A merge point owning exactly two children.
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<u8> {
        match *self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Child reached by `bit` (`false` = left, `true` = right).
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        match *self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }
}

/// Queue item used while merging: the arena slot and its weight.
#[derive(Debug, Clone, Copy)]
struct Pending {
    id: NodeId,
    weight: u64,
}

impl Weighted for Pending {
    fn weight(&self) -> u64 {
        self.weight
    }
}

/// A finished Huffman tree. Frozen once built or loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    ///
    /// # Errors
    /// `HuffmanError::EmptyFrequencyTable` if no symbol occurred.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        if freqs.is_empty() {
            return Err(HuffmanError::EmptyFrequencyTable.into());
        }

        let mut nodes = Vec::with_capacity(2 * freqs.distinct() - 1);
        let mut leaves = Vec::with_capacity(freqs.distinct());
        for (symbol, weight) in freqs.iter() {
            let id = NodeId::new(nodes.len() as u32);
            nodes.push(Node::Leaf { symbol, weight });
            leaves.push(Pending { id, weight });
        }

        let mut queue = MinQueue::from_items(leaves);
        while queue.len() > 1 {
            let a = queue.pop()?;
            let b = queue.pop()?;
            let id = NodeId::new(nodes.len() as u32);
            let weight = a.weight + b.weight;
            nodes.push(Node::Internal {
                weight,
                left: a.id,
                right: b.id,
            });
            trace!("merged {} ({}) + {} ({}) into {}", a.id, a.weight, b.id, b.weight, id);
            queue.push(Pending { id, weight });
        }
        let root = queue.pop()?.id;

        let tree = Self { nodes, root };
        debug!(
            "built tree: {} leaves, {} nodes, depth {}, weight {}",
            tree.leaf_count(),
            tree.len(),
            tree.depth(),
            tree.weight()
        );
        Ok(tree)
    }

    /// Reassemble a tree from a node arena and root, checking its structure.
    ///
    /// # Errors
    /// `HuffmanError::MalformedTree` if [`validate`](Self::validate) fails.
    pub fn from_nodes(nodes: Vec<Node>, root: NodeId) -> Result<Self> {
        let tree = Self { nodes, root };
        tree.validate()?;
        Ok(tree)
    }

    /// Check that the arena forms one strict binary tree hanging off `root`.
    ///
    /// Rejects out-of-range handles, nodes with more than one parent, a root
    /// with a parent, unreachable nodes, zero-weight leaves, repeated symbols,
    /// and internal weights that differ from the sum of their children.
    pub fn validate(&self) -> Result<()> {
        let n = self.nodes.len();
        let root = self.root.index();
        if n == 0 {
            return Err(malformed(0, "tree has no nodes"));
        }
        if root >= n {
            return Err(malformed(root, "root index out of range"));
        }

        let mut has_parent = vec![false; n];
        let mut seen_symbols = [false; 256];
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Leaf { symbol, weight } => {
                    if weight == 0 {
                        return Err(malformed(i, "leaf has zero weight"));
                    }
                    if std::mem::replace(&mut seen_symbols[symbol as usize], true) {
                        return Err(malformed(i, "symbol appears in more than one leaf"));
                    }
                }
                Node::Internal {
                    weight,
                    left,
                    right,
                } => {
                    let mut sum = 0u64;
                    for child in [left, right] {
                        let c = child.index();
                        if c >= n {
                            return Err(malformed(i, "child index out of range"));
                        }
                        if c == i {
                            return Err(malformed(i, "node is its own child"));
                        }
                        if std::mem::replace(&mut has_parent[c], true) {
                            return Err(malformed(c, "node has more than one parent"));
                        }
                        sum = sum
                            .checked_add(self.nodes[c].weight())
                            .ok_or_else(|| malformed(i, "weight overflow"))?;
                    }
                    if sum != weight {
                        return Err(malformed(i, "weight differs from sum of children"));
                    }
                }
            }
        }
        if has_parent[root] {
            return Err(malformed(root, "root has a parent"));
        }

        // Every node has at most one parent, so this walk visits each node once.
        let mut reached = vec![false; n];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            reached[id.index()] = true;
            if let Node::Internal { left, right, .. } = self.nodes[id.index()] {
                stack.push(right);
                stack.push(left);
            }
        }
        if let Some(orphan) = reached.iter().position(|&r| !r) {
            return Err(malformed(orphan, "node is unreachable from the root"));
        }

        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// The arena in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Root weight: the number of symbols the tree was built from.
    pub fn weight(&self) -> u64 {
        self.node(self.root).map_or(0, Node::weight)
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// True when the root itself is a leaf (one distinct symbol).
    pub fn is_single_leaf(&self) -> bool {
        self.node(self.root).is_some_and(Node::is_leaf)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Some(Node::Internal { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(Node::Leaf { .. }) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }
}

fn malformed(node: usize, reason: &'static str) -> crate::error::Error {
    HuffmanError::MalformedTree { node, reason }.into()
}
