//! Byte buffer payloads.
//!
//! [`Data`] is the opaque byte sequence carried by every storage transaction.
//! It supports index access, equality, and little-endian encode/decode of
//! fixed-width integers and floats at a byte offset. Encoding a value narrower
//! than the buffer either clears or preserves the untouched remainder,
//! selected per call.

use std::fmt;
use std::ops::{Index, IndexMut};

/// A fixed-length sequence of bytes.
///
/// The length is chosen at construction and never changes; cache lines rely
/// on this to keep payload sizes equal to the configured line size.
#[derive(Clone, PartialEq, Eq)]
pub struct Data {
    bytes: Vec<u8>,
}

impl Data {
    /// Creates a zero-filled buffer of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Creates a buffer holding a copy of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Returns the length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the buffer contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the buffer contents as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Copies `src` into the buffer starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + src.len()` exceeds the buffer length; callers
    /// split transactions before copying, so the range is always in bounds.
    pub fn copy_from_slice_at(&mut self, offset: usize, src: &[u8]) {
        self.bytes[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Encodes `width` little-endian bytes of `value` at `offset`.
    ///
    /// Bytes past the end of the buffer are silently dropped. When
    /// `clear_remainder` is set, every byte outside the encoded range is
    /// zeroed; otherwise the remainder is preserved.
    fn encode(&mut self, value: u64, width: usize, offset: usize, clear_remainder: bool) {
        if clear_remainder {
            self.bytes.fill(0);
        }
        for i in 0..width {
            if offset + i >= self.bytes.len() {
                break;
            }
            self.bytes[offset + i] = ((value >> (8 * i)) & 0xff) as u8;
        }
    }

    /// Decodes `width` little-endian bytes starting at `offset`.
    ///
    /// Bytes past the end of the buffer read as zero.
    fn decode(&self, width: usize, offset: usize) -> u64 {
        let mut value = 0u64;
        for i in 0..width {
            if offset + i >= self.bytes.len() {
                break;
            }
            value |= u64::from(self.bytes[offset + i]) << (8 * i);
        }
        value
    }

    /// Encodes a byte at `offset`.
    pub fn set_u8(&mut self, value: u8, offset: usize, clear_remainder: bool) {
        self.encode(u64::from(value), 1, offset, clear_remainder);
    }

    /// Encodes a half word (2 bytes, little-endian) at `offset`.
    pub fn set_u16(&mut self, value: u16, offset: usize, clear_remainder: bool) {
        self.encode(u64::from(value), 2, offset, clear_remainder);
    }

    /// Encodes a word (4 bytes, little-endian) at `offset`.
    pub fn set_u32(&mut self, value: u32, offset: usize, clear_remainder: bool) {
        self.encode(u64::from(value), 4, offset, clear_remainder);
    }

    /// Encodes a double word (8 bytes, little-endian) at `offset`.
    pub fn set_u64(&mut self, value: u64, offset: usize, clear_remainder: bool) {
        self.encode(value, 8, offset, clear_remainder);
    }

    /// Encodes a single-precision float (4 bytes, little-endian) at `offset`.
    pub fn set_f32(&mut self, value: f32, offset: usize, clear_remainder: bool) {
        self.encode(u64::from(value.to_bits()), 4, offset, clear_remainder);
    }

    /// Encodes a double-precision float (8 bytes, little-endian) at `offset`.
    pub fn set_f64(&mut self, value: f64, offset: usize, clear_remainder: bool) {
        self.encode(value.to_bits(), 8, offset, clear_remainder);
    }

    /// Decodes a byte at `offset`.
    pub fn get_u8(&self, offset: usize) -> u8 {
        self.decode(1, offset) as u8
    }

    /// Decodes a half word (2 bytes, little-endian) at `offset`.
    pub fn get_u16(&self, offset: usize) -> u16 {
        self.decode(2, offset) as u16
    }

    /// Decodes a word (4 bytes, little-endian) at `offset`.
    pub fn get_u32(&self, offset: usize) -> u32 {
        self.decode(4, offset) as u32
    }

    /// Decodes a double word (8 bytes, little-endian) at `offset`.
    pub fn get_u64(&self, offset: usize) -> u64 {
        self.decode(8, offset)
    }

    /// Decodes a single-precision float (4 bytes, little-endian) at `offset`.
    pub fn get_f32(&self, offset: usize) -> f32 {
        f32::from_bits(self.decode(4, offset) as u32)
    }

    /// Decodes a double-precision float (8 bytes, little-endian) at `offset`.
    pub fn get_f64(&self, offset: usize) -> f64 {
        f64::from_bits(self.decode(8, offset))
    }
}

impl Index<usize> for Data {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bytes[index]
    }
}

impl IndexMut<usize> for Data {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.bytes[index]
    }
}

impl fmt::Debug for Data {
    /// Formats the buffer as a contiguous hex string, most significant
    /// byte first, matching the convention of memory dump files.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.bytes.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
