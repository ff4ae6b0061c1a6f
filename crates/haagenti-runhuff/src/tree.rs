//! Huffman tree construction over run tokens.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Each internal node owns
//! exactly two children by index, and every node has at most one parent, so
//! dropping the arena tears the whole tree down at once.
//!
//! ## Tie-break policy
//!
//! Heap entries are ordered by `(frequency, node id)`. Leaves are allocated
//! first, in catalog order, and internal nodes are appended as they are
//! created, so the node id doubles as an insertion sequence number. Equal
//! frequencies therefore always pop oldest-first, and the encoder and a
//! decoder rebuilding from the container header produce the same tree.

use std::fmt;

use tracing::trace;

use crate::codeword::Codeword;
use crate::heap::PriorityHeap;
use crate::run::{FrequencyEntry, Token};

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// Leaf or internal node payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A token with its assigned codeword (empty until assignment).
    Leaf { token: Token, codeword: Codeword },
    /// Two children; `left` is reached on a 0 bit, `right` on a 1 bit.
    Internal { left: NodeId, right: NodeId },
}

/// A tree node with its subtree frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub frequency: u64,
    pub kind: NodeKind,
}

impl Node {
    fn leaf(token: Token, frequency: u64) -> Self {
        Self {
            frequency,
            kind: NodeKind::Leaf {
                token,
                codeword: Codeword::EMPTY,
            },
        }
    }

    /// Check if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The leaf's token.
    pub fn token(&self) -> Option<Token> {
        match self.kind {
            NodeKind::Leaf { token, .. } => Some(token),
            NodeKind::Internal { .. } => None,
        }
    }

    /// The leaf's codeword.
    pub fn codeword(&self) -> Option<Codeword> {
        match self.kind {
            NodeKind::Leaf { codeword, .. } => Some(codeword),
            NodeKind::Internal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    frequency: u64,
    node: NodeId,
}

/// Binary prefix-code tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    ///
    /// Returns `None` for an empty table. A single entry yields a tree whose
    /// root is that entry's leaf.
    pub fn build(entries: &[FrequencyEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let mut nodes = Vec::with_capacity(2 * entries.len() - 1);
        let mut heap = PriorityHeap::with_capacity(entries.len());

        for entry in entries {
            let node = nodes.len();
            let frequency = entry.count as u64;
            nodes.push(Node::leaf(entry.token, frequency));
            heap.push(HeapEntry { frequency, node });
        }

        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let node = nodes.len();
            let frequency = left.frequency + right.frequency;
            nodes.push(Node {
                frequency,
                kind: NodeKind::Internal {
                    left: left.node,
                    right: right.node,
                },
            });
            trace!(node, left = left.node, right = right.node, frequency, "merged");
            heap.push(HeapEntry { frequency, node });
        }

        let root = heap.pop()?.node;
        Some(Self { nodes, root })
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub(crate) fn set_codeword(&mut self, id: NodeId, new: Codeword) {
        if let NodeKind::Leaf { codeword, .. } = &mut self.nodes[id].kind {
            *codeword = new;
        }
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; an empty table builds no tree.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the leaves in arena (catalog) order.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_leaf())
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of internal nodes.
    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    /// Sum of all leaf frequencies.
    pub fn total_frequency(&self) -> u64 {
        self.nodes[self.root].frequency
    }

    /// Depth of the deepest leaf; 0 for a single-leaf tree.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id].kind {
                NodeKind::Internal { left, right } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                NodeKind::Leaf { .. } => deepest = deepest.max(depth),
            }
        }
        deepest
    }
}

/// Indented preorder dump, two spaces per level.
///
/// Leaves print as `symbol:run_length:frequency:codeword_len codeword`,
/// internal nodes as `*:frequency`.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            write!(f, "{:indent$}", "", indent = depth * 2)?;
            match node.kind {
                NodeKind::Leaf { token, codeword } => writeln!(
                    f,
                    "{:02x}:{}:{}:{} {:x}",
                    token.symbol, token.run_length, node.frequency, codeword.len, codeword.bits
                )?,
                NodeKind::Internal { left, right } => {
                    writeln!(f, "*:{}", node.frequency)?;
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        Ok(())
    }
}
