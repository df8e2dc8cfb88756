//! Tree persistence.
//!
//! Decompression needs the exact tree used for compression. The codec only
//! sees persistence through the [`TreeStore`] trait; [`BinarySnapshot`] is
//! the format the command-line tool writes next to each compressed file.
//!
//! # Snapshot Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x46 0x54 0x52 ("HFTR")
//! +------------------+
//! | version (1)      |  u8, currently 1
//! +------------------+
//! | node_count (4)   |  u32 little-endian, 1..=511
//! +------------------+
//! | root (4)         |  u32 arena index of the root
//! +------------------+
//! | crc32 (4)        |  u32 over version, node_count, root, records
//! +------------------+
//! | node records     |  node_count records in arena order
//! | (variable)       |
//! +------------------+
//! ```
//!
//! Leaf record: tag `0`, symbol (1), weight u64 (8).
//! Internal record: tag `1`, weight u64 (8), left u32 (4), right u32 (4).
//!
//! Records are written in arena order, so a loaded tree has the same node
//! numbering as the one that was persisted.

use log::debug;

use crate::error::{Error, HuffmanError, Result, SnapshotError};
use crate::tree::{HuffmanTree, Node, NodeId};

/// Magic number for tree snapshots: "HFTR"
const MAGIC: [u8; 4] = [0x48, 0x46, 0x54, 0x52];

const VERSION: u8 = 1;

/// Size of the snapshot header in bytes
const HEADER_SIZE: usize = 17;

/// A strict binary tree over 256 symbols has at most 511 nodes.
const MAX_NODES: u32 = 511;

const TAG_LEAF: u8 = 0;
const TAG_INTERNAL: u8 = 1;

const LEAF_RECORD_SIZE: usize = 10;
const INTERNAL_RECORD_SIZE: usize = 17;

/// Persist/load capability for Huffman trees.
pub trait TreeStore {
    /// Serialize `tree` into an opaque blob.
    fn persist(&self, tree: &HuffmanTree) -> Vec<u8>;

    /// Rebuild a tree from a blob produced by [`persist`](Self::persist).
    fn load(&self, blob: &[u8]) -> Result<HuffmanTree>;
}

/// Compact little-endian binary tree snapshot with a CRC32 check.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySnapshot;

impl TreeStore for BinarySnapshot {
    fn persist(&self, tree: &HuffmanTree) -> Vec<u8> {
        let mut records = Vec::with_capacity(tree.len() * INTERNAL_RECORD_SIZE);
        for node in tree.nodes() {
            match *node {
                Node::Leaf { symbol, weight } => {
                    records.push(TAG_LEAF);
                    records.push(symbol);
                    records.extend_from_slice(&weight.to_le_bytes());
                }
                Node::Internal {
                    weight,
                    left,
                    right,
                } => {
                    records.push(TAG_INTERNAL);
                    records.extend_from_slice(&weight.to_le_bytes());
                    records.extend_from_slice(&left.get().to_le_bytes());
                    records.extend_from_slice(&right.get().to_le_bytes());
                }
            }
        }

        let node_count = tree.len() as u32;
        let root = tree.root().get();
        let crc32 = compute_crc(node_count, root, &records);

        let mut blob = Vec::with_capacity(HEADER_SIZE + records.len());
        blob.extend_from_slice(&MAGIC);
        blob.push(VERSION);
        blob.extend_from_slice(&node_count.to_le_bytes());
        blob.extend_from_slice(&root.to_le_bytes());
        blob.extend_from_slice(&crc32.to_le_bytes());
        blob.extend_from_slice(&records);
        blob
    }

    /// # Errors
    /// - `SnapshotError` for a short buffer, bad magic, unknown version, or
    ///   bytes after the last record
    /// - `Error::Crc` if the checksum does not match
    /// - `HuffmanError::MalformedTree` for an unknown record tag, a node count
    ///   out of range, or a structurally invalid tree
    fn load(&self, blob: &[u8]) -> Result<HuffmanTree> {
        if blob.len() < HEADER_SIZE {
            return Err(SnapshotError::TooShort {
                required: HEADER_SIZE,
                actual: blob.len(),
            }
            .into());
        }

        let magic = read_array::<4>(blob, 0)?;
        if magic != MAGIC {
            return Err(SnapshotError::InvalidMagic {
                expected: MAGIC,
                actual: magic,
            }
            .into());
        }

        let version = blob[4];
        if version != VERSION {
            return Err(SnapshotError::UnsupportedVersion(version).into());
        }

        let node_count = u32::from_le_bytes(read_array(blob, 5)?);
        let root = u32::from_le_bytes(read_array(blob, 9)?);
        let crc32 = u32::from_le_bytes(read_array(blob, 13)?);
        let records = &blob[HEADER_SIZE..];

        let computed = compute_crc(node_count, root, records);
        if computed != crc32 {
            return Err(Error::Crc {
                expected: crc32,
                actual: computed,
            });
        }

        if node_count == 0 || node_count > MAX_NODES {
            return Err(HuffmanError::MalformedTree {
                node: 0,
                reason: "node count out of range",
            }
            .into());
        }

        let mut nodes = Vec::with_capacity(node_count as usize);
        let mut offset = HEADER_SIZE;
        for index in 0..node_count as usize {
            let tag = *blob.get(offset).ok_or(SnapshotError::TooShort {
                required: offset + 1,
                actual: blob.len(),
            })?;
            let node = match tag {
                TAG_LEAF => {
                    let record = read_array::<LEAF_RECORD_SIZE>(blob, offset)?;
                    offset += LEAF_RECORD_SIZE;
                    Node::Leaf {
                        symbol: record[1],
                        weight: u64::from_le_bytes(read_array(&record, 2)?),
                    }
                }
                TAG_INTERNAL => {
                    let record = read_array::<INTERNAL_RECORD_SIZE>(blob, offset)?;
                    offset += INTERNAL_RECORD_SIZE;
                    Node::Internal {
                        weight: u64::from_le_bytes(read_array(&record, 1)?),
                        left: NodeId::new(u32::from_le_bytes(read_array(&record, 9)?)),
                        right: NodeId::new(u32::from_le_bytes(read_array(&record, 13)?)),
                    }
                }
                _ => {
                    return Err(HuffmanError::MalformedTree {
                        node: index,
                        reason: "unknown node tag",
                    }
                    .into())
                }
            };
            nodes.push(node);
        }

        if offset != blob.len() {
            return Err(SnapshotError::TrailingBytes(blob.len() - offset).into());
        }

        let tree = HuffmanTree::from_nodes(nodes, NodeId::new(root))?;
        debug!("loaded tree snapshot: {} nodes, weight {}", tree.len(), tree.weight());
        Ok(tree)
    }
}

/// Copy `N` bytes starting at `offset`, failing if the buffer is too short.
fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N]> {
    bytes
        .get(offset..offset + N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            SnapshotError::TooShort {
                required: offset + N,
                actual: bytes.len(),
            }
            .into()
        })
}

/// Compute CRC32 over the protected fields.
fn compute_crc(node_count: u32, root: u32, records: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[VERSION]);
    hasher.update(&node_count.to_le_bytes());
    hasher.update(&root.to_le_bytes());
    hasher.update(records);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data)).unwrap()
    }

    /// Rewrite the CRC so a hand-edited blob passes the checksum.
    fn reseal(blob: &mut [u8]) {
        let node_count = u32::from_le_bytes(blob[5..9].try_into().unwrap());
        let root = u32::from_le_bytes(blob[9..13].try_into().unwrap());
        let crc = compute_crc(node_count, root, &blob[HEADER_SIZE..]);
        blob[13..17].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn test_persist_load_same_shape() {
        let tree = tree_for(b"abracadabra");
        let blob = BinarySnapshot.persist(&tree);
        assert_eq!(blob.len(), HEADER_SIZE + 5 * LEAF_RECORD_SIZE + 4 * INTERNAL_RECORD_SIZE);

        let loaded = BinarySnapshot.load(&blob).unwrap();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_single_leaf_snapshot() {
        let tree = tree_for(b"qqq");
        let loaded = BinarySnapshot.load(&BinarySnapshot.persist(&tree)).unwrap();
        assert!(loaded.is_single_leaf());
        assert_eq!(loaded.weight(), 3);
    }

    #[test]
    fn test_persist_is_deterministic() {
        let text = b"she sells sea shells by the sea shore";
        assert_eq!(
            BinarySnapshot.persist(&tree_for(text)),
            BinarySnapshot.persist(&tree_for(text))
        );
    }

    #[test]
    fn test_too_short() {
        let result = BinarySnapshot.load(&[0x48, 0x46]);
        assert!(matches!(
            result,
            Err(Error::Snapshot(SnapshotError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_invalid_magic() {
        let mut blob = BinarySnapshot.persist(&tree_for(b"ab"));
        blob[0] = b'X';
        assert!(matches!(
            BinarySnapshot.load(&blob),
            Err(Error::Snapshot(SnapshotError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut blob = BinarySnapshot.persist(&tree_for(b"ab"));
        blob[4] = 9;
        assert!(matches!(
            BinarySnapshot.load(&blob),
            Err(Error::Snapshot(SnapshotError::UnsupportedVersion(9)))
        ));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut blob = BinarySnapshot.persist(&tree_for(b"abracadabra"));
        let len = blob.len();
        blob[len - 1] ^= 0x01;
        assert!(matches!(BinarySnapshot.load(&blob), Err(Error::Crc { .. })));
    }

    #[test]
    fn test_unknown_tag_is_malformed() {
        let mut blob = BinarySnapshot.persist(&tree_for(b"ab"));
        blob[HEADER_SIZE] = 7;
        reseal(&mut blob);
        assert!(matches!(
            BinarySnapshot.load(&blob),
            Err(Error::Huffman(HuffmanError::MalformedTree {
                node: 0,
                reason: "unknown node tag"
            }))
        ));
    }

    #[test]
    fn test_bad_child_index_is_malformed() {
        // "ab": leaf a, leaf b, internal(2, 0, 1)
        let mut blob = BinarySnapshot.persist(&tree_for(b"ab"));
        let left_offset = HEADER_SIZE + 2 * LEAF_RECORD_SIZE + 9;
        blob[left_offset..left_offset + 4].copy_from_slice(&40u32.to_le_bytes());
        reseal(&mut blob);
        assert!(matches!(
            BinarySnapshot.load(&blob),
            Err(Error::Huffman(HuffmanError::MalformedTree { .. }))
        ));
    }

    #[test]
    fn test_truncated_records() {
        let mut blob = BinarySnapshot.persist(&tree_for(b"abc"));
        blob.truncate(blob.len() - 3);
        reseal(&mut blob);
        assert!(matches!(
            BinarySnapshot.load(&blob),
            Err(Error::Snapshot(SnapshotError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut blob = BinarySnapshot.persist(&tree_for(b"abc"));
        blob.extend_from_slice(&[0, 0]);
        reseal(&mut blob);
        assert!(matches!(
            BinarySnapshot.load(&blob),
            Err(Error::Snapshot(SnapshotError::TrailingBytes(2)))
        ));
    }
}
