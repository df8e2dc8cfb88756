//! Integration tests for the full hufftext pipeline.
//!
//! These tests verify end-to-end behavior: input -> compress -> persist tree
//! -> load tree -> decompress -> output, with verification that output
//! matches input.

use hufftext_core::{
    bitio::{depad, pad},
    error::{BitIoError, Error, HuffmanError},
    frequency::FrequencyTable,
    metrics::CompressionReport,
    queue::MinQueue,
    BinarySnapshot, HuffmanCodec, HuffmanTree, TreeStore,
};

/// Compress, persist the tree, load it back, decompress.
fn through_snapshot(input: &[u8]) -> Vec<u8> {
    let codec = HuffmanCodec::new();
    let compressed = codec.compress(input).expect("compression failed");

    let blob = compressed.tree.as_ref().map(|tree| BinarySnapshot.persist(tree));
    let loaded = blob
        .as_deref()
        .map(|blob| BinarySnapshot.load(blob).expect("tree load failed"));

    codec
        .decompress(&compressed.payload, loaded.as_ref())
        .expect("decompression failed")
}

/// Scenario: "aaaa" has one distinct symbol and a single-leaf tree.
#[test]
fn test_single_distinct_symbol() {
    let compressed = HuffmanCodec::new().compress(b"aaaa").unwrap();
    let tree = compressed.tree.as_ref().unwrap();
    assert_eq!(tree.leaf_count(), 1);
    assert_eq!(tree.len(), 1);

    assert_eq!(through_snapshot(b"aaaa"), b"aaaa");
}

/// Scenario: empty input gives an empty payload and decompresses to nothing.
#[test]
fn test_empty_input() {
    let compressed = HuffmanCodec::new().compress(b"").unwrap();
    assert!(compressed.payload.is_empty());
    assert!(compressed.tree.is_none());

    assert_eq!(through_snapshot(b""), b"");
}

/// Scenario: "abracadabra" compresses to four hand-computed bytes.
#[test]
fn test_abracadabra() {
    let freqs = FrequencyTable::from_bytes(b"abracadabra");
    for (symbol, expected) in [(b'a', 5), (b'b', 2), (b'r', 2), (b'c', 1), (b'd', 1)] {
        assert_eq!(freqs.get(symbol), expected);
    }

    let compressed = HuffmanCodec::new().compress(b"abracadabra").unwrap();
    // header 1, then 0 110 111 0 100 0 101 0 110 111 0 and one filler bit
    assert_eq!(compressed.payload, vec![0x01, 0x6E, 0x8A, 0xDC]);
    assert!(compressed.payload.len() < 11);

    assert_eq!(through_snapshot(b"abracadabra"), b"abracadabra");
}

/// Scenario: a corrupted payload fails with CorruptStream instead of
/// decoding to the wrong text.
#[test]
fn test_corrupted_stream_detected() {
    let codec = HuffmanCodec::new();
    let compressed = codec.compress(b"aaaaaaa").unwrap();
    let tree = compressed.tree.as_ref().unwrap();

    // the single-leaf tree has no right child: any 1 bit is corrupt
    let mut payload = compressed.payload.clone();
    payload[1] ^= 0b0001_0000;
    let result = codec.decompress(&payload, Some(tree));
    assert!(matches!(
        result,
        Err(Error::Huffman(HuffmanError::CorruptStream { position: 3, .. }))
    ));
}

/// A stream that stops inside a code is rejected.
#[test]
fn test_truncated_code_detected() {
    let codec = HuffmanCodec::new();
    let compressed = codec.compress(b"abracadabra").unwrap();
    let tree = compressed.tree.as_ref().unwrap();

    let mut bits = depad(&compressed.payload).unwrap();
    let kept: Vec<bool> = bits.iter().take(bits.len() - 2).collect();
    bits = kept.into_iter().collect();

    let result = codec.decompress(&pad(&bits), Some(tree));
    assert!(matches!(
        result,
        Err(Error::Huffman(HuffmanError::CorruptStream { .. }))
    ));
}

/// Scenario: queue seeded with [5, 2, 2, 1, 1] pops [1, 1, 2, 2, 5].
#[test]
fn test_queue_pop_order() {
    let mut queue = MinQueue::from_items([5u64, 2, 2, 1, 1]);
    let mut popped = Vec::new();
    while let Ok(weight) = queue.pop() {
        popped.push(weight);
    }
    assert_eq!(popped, vec![1, 1, 2, 2, 5]);
}

/// Root weight equals the input length.
#[test]
fn test_weight_conservation() {
    let text = b"It was the best of times, it was the worst of times.";
    let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(text)).unwrap();
    assert_eq!(tree.weight(), text.len() as u64);
}

/// Compressing twice gives identical payloads and tree snapshots.
#[test]
fn test_determinism() {
    let text = b"determinism means the same bytes every single time";
    let codec = HuffmanCodec::new();
    let first = codec.compress(text).unwrap();
    let second = codec.compress(text).unwrap();

    assert_eq!(first.payload, second.payload);
    assert_eq!(
        BinarySnapshot.persist(first.tree.as_ref().unwrap()),
        BinarySnapshot.persist(second.tree.as_ref().unwrap())
    );
}

/// Every byte value round-trips.
#[test]
fn test_all_symbols() {
    let input: Vec<u8> = (0..=255u8).cycle().take(256 * 3 + 17).collect();
    assert_eq!(through_snapshot(&input), input);
}

/// Large skewed input compresses well and round-trips.
#[test]
fn test_large_text() {
    let input = b"The quick brown fox jumps over the lazy dog. ".repeat(500);
    let codec = HuffmanCodec::new();
    let compressed = codec.compress(&input).unwrap();
    assert!(compressed.payload.len() < input.len() * 3 / 4);

    assert_eq!(through_snapshot(&input), input);
}

/// A corrupted snapshot is caught before decoding starts.
#[test]
fn test_corrupted_snapshot() {
    let compressed = HuffmanCodec::new().compress(b"snapshot corruption").unwrap();
    let mut blob = BinarySnapshot.persist(compressed.tree.as_ref().unwrap());
    let len = blob.len();
    blob[len - 2] ^= 0xFF;

    assert!(matches!(BinarySnapshot.load(&blob), Err(Error::Crc { .. })));
}

/// An out-of-range padding header is rejected.
#[test]
fn test_invalid_padding_header() {
    let codec = HuffmanCodec::new();
    let compressed = codec.compress(b"header").unwrap();
    let mut payload = compressed.payload.clone();
    payload[0] = 0xFF;

    assert!(matches!(
        codec.decompress(&payload, compressed.tree.as_ref()),
        Err(Error::BitIo(BitIoError::InvalidPadding { .. }))
    ));
}

/// The report counts payload and tree together.
#[test]
fn test_report_from_real_run() {
    let input = b"aaaaaaaaaaaaaaaabbbbbbbbccccdd".repeat(20);
    let compressed = HuffmanCodec::new().compress(&input).unwrap();
    let blob = BinarySnapshot.persist(compressed.tree.as_ref().unwrap());

    let mut report = CompressionReport::new(input.len() as u64);
    report.compressed_size = compressed.payload.len() as u64;
    report.tree_size = blob.len() as u64;
    report.complete();

    assert!(report.ratio() > 1.0);
    assert!(report.percentage() > 0.0);
}
