//! Bit-level I/O: packed bit-strings, MSB-first readers and writers, and the
//! padded stream format.
//!
//! # Padded Stream Format
//!
//! ```text
//! +----------------+---------------------------+-------------------+
//! | extra (8 bits) | payload (n bits)          | extra zero bits   |
//! +----------------+---------------------------+-------------------+
//! ```
//!
//! `extra = (8 - n % 8) % 8`, so the header is always in `0..=7` and the whole
//! stream is byte aligned. Bits are packed most significant bit first.
//!
//! # Example
//! ```
//! use hufftext_core::bitio::{depad, pad, BitString};
//!
//! let payload: BitString = "10111".parse().unwrap();
//! let packed = pad(&payload);
//! assert_eq!(packed, vec![0b0000_0011, 0b1011_1000]);
//! assert_eq!(depad(&packed).unwrap(), payload);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{BitIoError, Result};

/// Number of zero bits needed to round `payload_bits` up to a byte boundary.
pub fn padding_for(payload_bits: usize) -> u8 {
    ((8 - payload_bits % 8) % 8) as u8
}

/// Pack a payload bit-string into bytes behind an 8-bit padding header.
///
/// The result is always `1 + ceil(len / 8)` bytes long.
pub fn pad(payload: &BitString) -> Vec<u8> {
    let extra = padding_for(payload.len());
    let mut writer = BitWriter::with_capacity(1 + payload.byte_len());
    writer.write_byte(extra);
    for bit in payload.iter() {
        writer.write_bit(bit);
    }
    // finish() fills the last partial byte with exactly `extra` zero bits
    writer.finish()
}

/// Strip the padding header and the trailing filler bits from a packed stream.
///
/// # Errors
/// - `BitIoError::MissingHeader` if `packed` is empty
/// - `BitIoError::InvalidPadding` if the header is above 7 or larger than the
///   number of bits following it
/// - `BitIoError::NonZeroPadding` if any filler bit is set
pub fn depad(packed: &[u8]) -> Result<BitString> {
    let mut reader = BitReader::new(packed);
    if reader.bits_remaining() < 8 {
        return Err(BitIoError::MissingHeader.into());
    }

    let extra = reader.read_bits(8)? as u8;
    let available = reader.bits_remaining();
    if extra > 7 || usize::from(extra) > available {
        return Err(BitIoError::InvalidPadding { extra, available }.into());
    }

    let payload_len = available - usize::from(extra);
    let mut payload = BitString::with_capacity(payload_len);
    for _ in 0..payload_len {
        payload.push(reader.read_bit()?);
    }

    if reader.read_bits(usize::from(extra))? != 0 {
        return Err(BitIoError::NonZeroPadding.into());
    }

    Ok(payload)
}

/// A growable sequence of bits packed MSB-first into bytes.
///
/// # Invariants
/// - `bytes.len() == ceil(len / 8)`
/// - bits past `len` in the last byte are always zero, so two bit-strings
///   with the same bits compare equal
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bytes: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Create an empty bit-string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bit-string with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> offset;
        }
        self.len += 1;
    }

    /// Append every bit of `other`.
    pub fn extend_from(&mut self, other: &BitString) {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(&other.bytes);
            self.len += other.len;
            return;
        }
        for bit in other.iter() {
            self.push(bit);
        }
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes backing the bits (last byte may be partial).
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &BitString) -> bool {
        self.len <= other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> Bits<'_> {
        Bits {
            bits: self,
            position: 0,
        }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitString::new();
        bits.extend(iter);
        bits
    }
}

impl Extend<bool> for BitString {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromStr for BitString {
    type Err = BitIoError;

    /// Parse a string of `'0'` and `'1'` characters.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bits = BitString::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => return Err(BitIoError::InvalidDigit(other)),
            }
        }
        Ok(bits)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a BitString {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`BitString`].
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    bits: &'a BitString,
    position: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.position)?;
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.len - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

/// Writes bits MSB-first into a byte buffer.
///
/// Accumulates bits in a buffer and flushes complete bytes to the output.
/// When finished, pads the final partial byte with zeros.
///
/// # Invariants
/// - `bit_buffer` contains up to 7 bits (never a full byte)
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a BitWriter expecting roughly `bytes` bytes of output.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        self.put(value, count);
        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.put(u64::from(bit), 1);
    }

    /// Write all eight bits of `byte`.
    pub fn write_byte(&mut self, byte: u8) {
        self.put(u64::from(byte), 8);
    }

    /// Core write loop; `count` must be at most 64.
    fn put(&mut self, value: u64, count: usize) {
        let mut remaining = count;
        let mut val = value;

        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Take the top bits_to_write bits of what is left
            let shift = remaining - bits_to_write;
            let bits = ((val >> shift) & ((1 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            val &= (1u64 << shift) - 1;
            remaining -= bits_to_write;
        }
    }

    /// Finish writing and return the output bytes.
    ///
    /// If there are any remaining bits in the buffer, they are padded with
    /// trailing zeros to complete the final byte.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// Caller must track how many bits are valid; padding bits at the end
/// of the buffer are not distinguishable from data.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader for the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read up to 64 bits from the input.
    ///
    /// Bits are read MSB-first. For example, reading 3 bits from byte 0b10110000
    /// returns 0b101.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        if count == 0 {
            return Ok(0);
        }

        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = self.bit_position / 8;
            let bit_offset = self.bit_position % 8;

            let bits_in_byte = 8 - bit_offset;
            let bits_to_read = remaining.min(bits_in_byte);

            let byte = self.data[byte_idx];
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (byte >> (bits_in_byte - bits_to_read)) & mask;

            result = (result << bits_to_read) | bits as u64;

            self.bit_position += bits_to_read;
            remaining -= bits_to_read;
        }

        Ok(result)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}
