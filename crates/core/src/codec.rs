//! Compress and decompress entry points.
//!
//! # Compress path
//!
//! ```text
//! input ─► FrequencyTable ─► HuffmanTree ─► CodeTable ─► encode ─► pad ─► payload
//!                                 │
//!                                 └──────────────────────────────────────► tree
//! ```
//!
//! # Decompress path
//!
//! ```text
//! payload ─► depad ─► Decoder(tree) ─► output
//! ```
//!
//! # Empty input
//!
//! Empty input compresses to an empty payload and no tree. An empty payload
//! decompresses to empty output without looking at the tree.

use std::io::{Read, Write};

use log::debug;

use crate::bitio::{depad, pad};
use crate::code_table::CodeTable;
use crate::decoder::Decoder;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Output of a compression call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    /// Padding header followed by the packed code bits
    pub payload: Vec<u8>,
    /// Tree needed to decode `payload`; `None` only for empty input
    pub tree: Option<HuffmanTree>,
    /// Input length in symbols
    pub original_len: usize,
}

/// Codec context. Holds no state between calls; use one per input when
/// compressing several inputs concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    pub fn new() -> Self {
        Self
    }

    /// Compress `input`, building its tree from its own frequencies.
    pub fn compress(&self, input: &[u8]) -> Result<Compressed> {
        if input.is_empty() {
            debug!("compress: empty input, empty payload");
            return Ok(Compressed {
                payload: Vec::new(),
                tree: None,
                original_len: 0,
            });
        }

        let freqs = FrequencyTable::from_bytes(input);
        let tree = HuffmanTree::from_frequencies(&freqs)?;
        let payload = self.compress_with(input, &tree)?;

        debug!(
            "compress: {} symbols ({} distinct) -> {} bytes",
            input.len(),
            freqs.distinct(),
            payload.len()
        );

        Ok(Compressed {
            payload,
            tree: Some(tree),
            original_len: input.len(),
        })
    }

    /// Compress `input` with an existing tree.
    ///
    /// # Errors
    /// `HuffmanError::UnknownSymbol` if `input` holds a symbol the tree does
    /// not cover.
    pub fn compress_with(&self, input: &[u8], tree: &HuffmanTree) -> Result<Vec<u8>> {
        let table = CodeTable::from_tree(tree);
        let bits = table.encode(input)?;
        Ok(pad(&bits))
    }

    /// Decompress a payload produced by [`compress`](Self::compress).
    ///
    /// # Errors
    /// - `HuffmanError::MissingTree` if `payload` is not empty and `tree` is `None`
    /// - `HuffmanError::MalformedTree` if `tree` fails validation
    /// - `BitIoError` if the padding header is invalid
    /// - `HuffmanError::CorruptStream` if the bits do not decode cleanly
    pub fn decompress(&self, payload: &[u8], tree: Option<&HuffmanTree>) -> Result<Vec<u8>> {
        if payload.is_empty() {
            debug!("decompress: empty payload, empty output");
            return Ok(Vec::new());
        }

        let tree = tree.ok_or(HuffmanError::MissingTree)?;
        let decoder = Decoder::new(tree)?;
        let bits = depad(payload)?;
        let output = decoder.decode(&bits)?;

        debug!(
            "decompress: {} bytes ({} bits) -> {} symbols",
            payload.len(),
            bits.len(),
            output.len()
        );
        Ok(output)
    }

    /// Read `reader` to the end and compress everything read.
    pub fn compress_reader<R: Read>(&self, mut reader: R) -> Result<Compressed> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        self.compress(&input)
    }

    /// Decompress `payload` and write the whole result to `writer`.
    ///
    /// Nothing is written unless decoding succeeds. Returns the number of
    /// bytes written.
    pub fn decompress_to_writer<W: Write>(
        &self,
        payload: &[u8],
        tree: Option<&HuffmanTree>,
        mut writer: W,
    ) -> Result<usize> {
        let output = self.decompress(payload, tree)?;
        writer.write_all(&output)?;
        writer.flush()?;
        Ok(output.len())
    }
}
