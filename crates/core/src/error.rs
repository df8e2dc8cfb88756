//! Error types for the hufftext codec.
//!
//! Every failure in the codec is reported as a structured error. Nothing in
//! the compress or decompress path falls back to partial output.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Queue: priority queue misuse (internal invariant violation)
/// - Huffman: tree construction, code lookup, or decode failures
/// - Bit I/O: reading/writing bits, padding header problems
/// - Snapshot: persisted tree container problems
/// - CRC: persisted tree corruption detected
/// - I/O: caller-supplied streams
#[derive(Debug, Error)]
pub enum Error {
    /// Priority queue error
    #[error("priority queue error: {0}")]
    Queue(#[from] QueueError),

    /// Huffman codec error (unknown symbol, corrupt stream, malformed tree)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Tree snapshot container error
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// CRC validation failed, indicating a corrupted tree snapshot
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Read/write failure on a caller-supplied stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Priority queue errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Extract-min attempted on an empty queue
    #[error("extract-min on an empty queue")]
    EmptyQueue,
}

/// Huffman codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// Input contains a symbol the code table has no code for
    #[error("symbol {symbol:#04x} at position {position} has no code")]
    UnknownSymbol { symbol: u8, position: usize },

    /// Decode walk could not resolve a bit, or the stream ended mid-path
    #[error("corrupt stream at bit {position}: {reason}")]
    CorruptStream {
        position: usize,
        reason: &'static str,
    },

    /// Tree violates the leaf/internal structure invariants
    #[error("malformed tree at node {node}: {reason}")]
    MalformedTree { node: usize, reason: &'static str },

    /// A non-empty payload was supplied without the tree it was encoded with
    #[error("payload is not empty but no tree was supplied")]
    MissingTree,
}

/// Bit-level I/O and padding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Character other than '0' or '1' in a textual bit-string
    #[error("invalid binary digit {0:?}")]
    InvalidDigit(char),

    /// Packed stream has no padding header byte
    #[error("packed stream is missing its padding header")]
    MissingHeader,

    /// Padding header is out of range or exceeds the available bits
    #[error("invalid padding count {extra} for {available} payload bits")]
    InvalidPadding { extra: u8, available: usize },

    /// A filler bit after the payload was set
    #[error("padding bits are not zero")]
    NonZeroPadding,
}

/// Tree snapshot container errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// Buffer ends before the declared content
    #[error("snapshot too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Invalid magic number in header
    #[error("invalid snapshot magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Format version this build cannot read
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    /// Bytes left over after the last node record
    #[error("{0} trailing bytes after snapshot")]
    TrailingBytes(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
