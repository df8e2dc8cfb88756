//! Bit-by-bit decode walk over a Huffman tree.
//!
//! The decoder is a small state machine whose state is the current node.
//! Each bit moves to the left (`0`) or right (`1`) child; reaching a leaf
//! emits its symbol and resets the state to the root. The input must end with
//! the state back at the root.
//!
//! A tree whose root is a leaf encodes its only symbol as the single bit `0`:
//! every `0` emits the symbol, and a `1` is a corrupt stream.

use crate::bitio::BitString;
use crate::error::{HuffmanError, Result};
use crate::tree::{HuffmanTree, Node, NodeId};

/// Decode state bound to one tree.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    tree: &'t HuffmanTree,
    current: NodeId,
    /// Bits consumed so far
    position: usize,
}

impl<'t> Decoder<'t> {
    /// Create a decoder positioned at the root.
    ///
    /// # Errors
    /// `HuffmanError::MalformedTree` if the tree fails validation; no bits
    /// are read from a tree that has not passed.
    pub fn new(tree: &'t HuffmanTree) -> Result<Self> {
        tree.validate()?;
        Ok(Self {
            tree,
            current: tree.root(),
            position: 0,
        })
    }

    /// Feed one bit. Returns the symbol if this bit completed a code.
    ///
    /// # Errors
    /// `HuffmanError::CorruptStream` if the bit leads nowhere.
    pub fn step(&mut self, bit: bool) -> Result<Option<u8>> {
        let position = self.position;
        self.position += 1;

        let node = self.node(self.current, position)?;
        let next = match node.child(bit) {
            Some(child) => child,
            // only a lone-leaf root can be the current node here
            None if !bit => self.current,
            None => {
                return Err(HuffmanError::CorruptStream {
                    position,
                    reason: "bit 1 under a single-symbol tree",
                }
                .into())
            }
        };

        match *self.node(next, position)? {
            Node::Leaf { symbol, .. } => {
                self.current = self.tree.root();
                Ok(Some(symbol))
            }
            Node::Internal { .. } => {
                self.current = next;
                Ok(None)
            }
        }
    }

    /// Confirm the input ended on a code boundary.
    ///
    /// # Errors
    /// `HuffmanError::CorruptStream` if the walk stopped between root and leaf.
    pub fn finish(&self) -> Result<()> {
        if self.current != self.tree.root() {
            return Err(HuffmanError::CorruptStream {
                position: self.position,
                reason: "stream ended in the middle of a code",
            }
            .into());
        }
        Ok(())
    }

    /// True if no partial code is pending.
    pub fn at_root(&self) -> bool {
        self.current == self.tree.root()
    }

    /// Decode a whole depadded payload.
    pub fn decode(mut self, bits: &BitString) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(bits.len() / 2);
        for bit in bits.iter() {
            if let Some(symbol) = self.step(bit)? {
                out.push(symbol);
            }
        }
        self.finish()?;
        Ok(out)
    }

    fn node(&self, id: NodeId, position: usize) -> Result<&'t Node> {
        self.tree.node(id).ok_or_else(|| {
            HuffmanError::CorruptStream {
                position,
                reason: "bit leads to a missing child",
            }
            .into()
        })
    }
}
