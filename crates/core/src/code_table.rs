//! Symbol → code assignment from a finished tree.
//!
//! A code is the root-to-leaf path: `0` for every step left, `1` for every
//! step right. Only leaves carry symbols, so the codes are prefix-free.
//!
//! When the root is itself a leaf the lone symbol gets the code `0`.

use std::collections::HashMap;

use crate::bitio::BitString;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node, NodeId};

/// Forward (symbol → code) and inverse (code → symbol) code maps.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<BitString>>,
    symbols: HashMap<BitString, u8>,
}

impl CodeTable {
    /// Walk `tree` and record the path to every leaf.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self {
            codes: vec![None; 256],
            symbols: HashMap::new(),
        };

        if let Some(&Node::Leaf { symbol, .. }) = tree.node(tree.root()) {
            table.insert(symbol, BitString::from_iter([false]));
            return table;
        }

        let mut stack: Vec<(NodeId, BitString)> = vec![(tree.root(), BitString::new())];
        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                Some(&Node::Leaf { symbol, .. }) => table.insert(symbol, path),
                Some(&Node::Internal { left, right, .. }) => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((right, right_path));
                    stack.push((left, left_path));
                }
                None => {}
            }
        }
        table
    }

    fn insert(&mut self, symbol: u8, code: BitString) {
        self.symbols.insert(code.clone(), symbol);
        self.codes[symbol as usize] = Some(code);
    }

    /// Code assigned to `symbol`, if it occurs in the tree.
    pub fn code(&self, symbol: u8) -> Option<&BitString> {
        self.codes[symbol as usize].as_ref()
    }

    /// Symbol whose code is exactly `code`.
    pub fn symbol(&self, code: &BitString) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    /// Number of coded symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitString)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    /// Returns true if no code is a proper prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitString> = self.iter().map(|(_, code)| code).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }

    /// Payload length in bits for an input with these frequencies.
    pub fn encoded_len(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .map(|(symbol, count)| count * self.code(symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }

    /// Concatenate the codes of every symbol in `data`.
    ///
    /// # Errors
    /// `HuffmanError::UnknownSymbol` for the first symbol without a code.
    pub fn encode(&self, data: &[u8]) -> Result<BitString> {
        let mut out = BitString::with_capacity(data.len() * 2);
        for (position, &symbol) in data.iter().enumerate() {
            let code = self
                .code(symbol)
                .ok_or(HuffmanError::UnknownSymbol { symbol, position })?;
            out.extend_from(code);
        }
        Ok(out)
    }
}
