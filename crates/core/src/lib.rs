//! hufftext-core: lossless text compression with Huffman coding
//!
//! This library builds a prefix-code tree from the symbol frequencies of an
//! input, encodes the input with it into a padded byte stream, and reverses
//! the process exactly given the same tree.
//!
//! # Architecture
//!
//! - `frequency`: one-pass symbol counting
//! - `queue`: min-heap with deterministic tie-breaking
//! - `tree`: arena-backed tree and the merge loop that builds it
//! - `code_table`: root-to-leaf paths as codes
//! - `bitio`: bit-strings, bit readers/writers, pad/depad
//! - `decoder`: bit-by-bit tree walk
//! - `snapshot`: tree persistence
//! - `codec`: compress/decompress entry points
//! - `metrics`: size and ratio reporting
//!
//! # Example
//!
//! ```
//! use hufftext_core::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(b"abracadabra").unwrap();
//! assert_eq!(compressed.payload.len(), 4);
//!
//! let restored = codec
//!     .decompress(&compressed.payload, compressed.tree.as_ref())
//!     .unwrap();
//! assert_eq!(restored, b"abracadabra");
//! ```

pub mod bitio;
pub mod code_table;
pub mod codec;
pub mod decoder;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod queue;
pub mod snapshot;
pub mod tree;

// Re-export commonly used types
pub use codec::{Compressed, HuffmanCodec};
pub use error::{Error, Result};
pub use snapshot::{BinarySnapshot, TreeStore};
pub use tree::HuffmanTree;
