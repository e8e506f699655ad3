//! Bounds-checked read cursor over a pickled payload.
//!
//! A pickle stores its payload length in the first four bytes. The
//! addressable content starts at `buffer.len() - payload_len`; anything
//! between the length header and that offset is header padding.

use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

use super::error::{Result, SnssError};

/// Placeholder returned for strings that are in bounds but not UTF-8.
pub const INVALID_STRING: &str = "Invalid string";

/// Read cursor over a borrowed byte slice.
///
/// The cursor never copies or mutates the buffer. Copying a `Pickle` gives
/// an independent cursor over the same bytes, which is how record accessors
/// decode fields without touching the record's own state.
#[derive(Debug, Clone, Copy)]
pub struct Pickle<'a> {
    buffer: &'a [u8],
    payload_len: u32,
    position: usize,
}

impl<'a> Pickle<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            payload_len: 0,
            position: 0,
        }
    }

    /// Read the payload length header and move to the start of the content.
    ///
    /// A length larger than the buffer is rejected and leaves the cursor
    /// uninitialized, so every later field read fails with `OutOfBounds`.
    pub fn initialize_payload(&mut self) -> Result<()> {
        let header = self.slice_at(0, 4)?;
        let payload_len = LittleEndian::read_u32(header);
        if payload_len as usize > self.buffer.len() {
            return Err(SnssError::OutOfBounds {
                offset: 0,
                requested: payload_len as usize,
                len: self.buffer.len(),
            });
        }

        self.payload_len = payload_len;
        self.reset_position();
        Ok(())
    }

    /// Move back to the start of the content without re-reading the header.
    pub fn reset_position(&mut self) {
        // payload_len <= buffer.len() is guaranteed by initialize_payload
        self.position = self.buffer.len() - self.payload_len as usize;
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Read `len` raw bytes, advancing past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.slice_at(self.position, len)?;
        self.position += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Read a length-prefixed UTF-8 string, failing on invalid UTF-8.
    pub fn read_string_strict(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let offset = self.position;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| SnssError::InvalidUtf8 { offset, len })
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// The declared length is bounds-checked. Invalid UTF-8 within bounds
    /// is not fatal: it is logged and replaced with [`INVALID_STRING`].
    pub fn read_string(&mut self) -> Result<String> {
        match self.read_string_strict() {
            Err(err @ SnssError::InvalidUtf8 { .. }) => {
                warn!(error = %err, "Replacing undecodable string");
                Ok(INVALID_STRING.to_string())
            }
            other => other,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn payload_len(&self) -> u32 {
        self.payload_len
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.buffer
    }

    fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.buffer.get(offset..end))
            .ok_or(SnssError::OutOfBounds {
                offset,
                requested: len,
                len: self.buffer.len(),
            })
    }
}
