//! Codeword assignment and the per-symbol leaf index.

use std::fmt;

use haagenti_core::{Error, Result};
use tracing::debug;

use crate::run::Token;
use crate::tree::{HuffmanTree, NodeId, NodeKind};

/// A variable-length codeword, right-aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Codeword {
    /// Codeword bits; only the low `len` bits are meaningful.
    pub bits: u64,
    /// Number of bits, equal to the leaf depth after assignment.
    pub len: u8,
}

impl Codeword {
    /// Zero-length codeword carried by unassigned leaves and the root.
    pub const EMPTY: Codeword = Codeword { bits: 0, len: 0 };

    /// Longest codeword the packer accepts.
    pub const MAX_LEN: u8 = 64;

    /// Create a codeword.
    pub const fn new(bits: u64, len: u8) -> Self {
        Self { bits, len }
    }

    /// `(self << 1) | bit`, or `None` past [`Codeword::MAX_LEN`].
    fn child(self, bit: u64) -> Option<Self> {
        if self.len >= Self::MAX_LEN {
            return None;
        }
        Some(Self {
            bits: (self.bits << 1) | bit,
            len: self.len + 1,
        })
    }

    /// Whether `self` is a bit-prefix of `other`.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        if self.len > other.len {
            return false;
        }
        if self.len == 0 {
            return true;
        }
        (other.bits >> (other.len - self.len)) == self.bits
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if (self.bits >> i) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Leaves grouped by raw byte value.
///
/// Each slot lists the leaves for one symbol (differing run lengths) and is
/// searched linearly on lookup. The index holds arena ids only; the tree
/// stays the owner of every node.
#[derive(Debug, Clone)]
pub struct SymbolIndex {
    slots: Vec<Vec<NodeId>>,
}

impl SymbolIndex {
    fn new() -> Self {
        Self {
            slots: vec![Vec::new(); 256],
        }
    }

    fn insert(&mut self, symbol: u8, leaf: NodeId) {
        self.slots[symbol as usize].push(leaf);
    }

    /// Leaves carrying `symbol`, in preorder.
    pub fn leaves_for(&self, symbol: u8) -> &[NodeId] {
        &self.slots[symbol as usize]
    }

    /// Codeword for `token`, if the tree has a leaf for it.
    pub fn lookup(&self, tree: &HuffmanTree, token: Token) -> Option<Codeword> {
        self.leaves_for(token.symbol)
            .iter()
            .find_map(|&id| match tree.node(id).kind {
                NodeKind::Leaf {
                    token: leaf,
                    codeword,
                } if leaf == token => Some(codeword),
                _ => None,
            })
    }

    /// Total number of indexed leaves.
    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    /// Check if no leaves are indexed.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }
}

/// Assign a codeword to every leaf and index the leaves by symbol.
///
/// Preorder walk from the root: the left child extends its parent's
/// codeword with a 0 bit, the right child with a 1 bit. A tree that is a
/// single leaf gives that leaf the 1-bit codeword `0`.
pub fn assign(tree: &mut HuffmanTree) -> Result<SymbolIndex> {
    let mut index = SymbolIndex::new();
    let root = tree.root();

    if let NodeKind::Leaf { token, .. } = tree.node(root).kind {
        tree.set_codeword(root, Codeword::new(0, 1));
        index.insert(token.symbol, root);
        return Ok(index);
    }

    let mut longest = 0u8;
    let mut stack = vec![(root, Codeword::EMPTY)];
    while let Some((id, code)) = stack.pop() {
        match tree.node(id).kind {
            NodeKind::Internal { left, right } => {
                let (Some(zero), Some(one)) = (code.child(0), code.child(1)) else {
                    return Err(Error::limit_exceeded(
                        "codeword length",
                        code.len as u64 + 1,
                        Codeword::MAX_LEN as u64,
                    ));
                };
                stack.push((right, one));
                stack.push((left, zero));
            }
            NodeKind::Leaf { token, .. } => {
                tree.set_codeword(id, code);
                index.insert(token.symbol, id);
                longest = longest.max(code.len);
            }
        }
    }

    debug!(leaves = index.len(), longest, "assigned codewords");
    Ok(index)
}
