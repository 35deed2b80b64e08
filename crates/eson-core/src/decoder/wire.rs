//! Low-level ESON wire format readers.
//!
//! Every reader takes the whole buffer plus an offset and returns the decoded
//! value together with the number of bytes it consumed. Nothing here holds a
//! cursor; the caller adds the consumed count to its own offset.
//!
//! ## Wire Format Overview
//!
//! All integers are little-endian. A length-prefixed payload is an 8-byte
//! size header (low 32-bit word, then high 32-bit word) followed by the
//! payload bytes. An element is a one-byte tag, a NUL-terminated UTF-8 key
//! and a tag-specific value:
//!
//! - 1: FLOAT64 (8 bytes, IEEE-754)
//! - 2: INT64 (8 bytes, two's complement)
//! - 3: BOOLEAN (1 byte, zero is false)
//! - 4: STRING (length-prefixed UTF-8)
//! - 5: ARRAY (length-prefixed sequence of tagged values)
//! - 6: BINARY (length-prefixed raw bytes)
//! - 7: OBJECT (length-prefixed sequence of elements)
//!
//! Tag 0 is the end marker of an element sequence.

use crate::error::{Error, Result};
use bytes::Buf;
use std::fmt;

/// Width of the 64-bit size header in front of every length-prefixed payload
pub const SIZE_HEADER_LEN: usize = 8;

/// Value kinds, one per element tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    /// End of an element sequence, carries no value
    End = 0,
    /// IEEE-754 double
    Float64 = 1,
    /// Signed 64-bit integer
    Int64 = 2,
    /// Single-byte boolean
    Boolean = 3,
    /// Length-prefixed UTF-8 text
    String = 4,
    /// Length-prefixed sequence of tagged values
    Array = 5,
    /// Length-prefixed raw bytes
    Binary = 6,
    /// Length-prefixed sequence of keyed elements
    Object = 7,
}

impl ValueKind {
    /// Returns the lowercase name used in dumps and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::End => "end",
            ValueKind::Float64 => "float64",
            ValueKind::Int64 => "int64",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Binary => "binary",
            ValueKind::Object => "object",
        }
    }

    /// Returns the tag byte for this kind
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Returns true for kinds that nest other values
    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for ValueKind {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ValueKind::End),
            1 => Ok(ValueKind::Float64),
            2 => Ok(ValueKind::Int64),
            3 => Ok(ValueKind::Boolean),
            4 => Ok(ValueKind::String),
            5 => Ok(ValueKind::Array),
            6 => Ok(ValueKind::Binary),
            7 => Ok(ValueKind::Object),
            _ => Err(Error::unknown_tag(value, 0)),
        }
    }
}

/// Borrow `width` bytes starting at `offset`.
fn take(data: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(width)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| Error::out_of_bounds(offset, width, data.len()))?;
    Ok(&data[offset..end])
}

/// Read a single byte.
pub fn read_u8(data: &[u8], offset: usize) -> Result<(u8, usize)> {
    let mut chunk = take(data, offset, 1)?;
    Ok((chunk.get_u8(), 1))
}

/// Read a little-endian `u32`.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<(u32, usize)> {
    let mut chunk = take(data, offset, 4)?;
    Ok((chunk.get_u32_le(), 4))
}

/// Read a little-endian IEEE-754 double.
pub fn read_f64_le(data: &[u8], offset: usize) -> Result<(f64, usize)> {
    let mut chunk = take(data, offset, 8)?;
    Ok((chunk.get_f64_le(), 8))
}

/// Read a little-endian signed 64-bit integer.
pub fn read_i64_le(data: &[u8], offset: usize) -> Result<(i64, usize)> {
    let mut chunk = take(data, offset, 8)?;
    Ok((chunk.get_i64_le(), 8))
}

/// Read an element tag and map it to its [`ValueKind`].
pub fn read_tag(data: &[u8], offset: usize) -> Result<(ValueKind, usize)> {
    let (byte, len) = read_u8(data, offset)?;
    let kind = ValueKind::try_from(byte).map_err(|_| Error::unknown_tag(byte, offset))?;
    Ok((kind, len))
}

/// Read the 8-byte size header.
///
/// Both 32-bit words are always consumed. Lengths whose high word is set are
/// rejected rather than truncated.
pub fn read_size(data: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut chunk = take(data, offset, SIZE_HEADER_LEN)?;
    let low = chunk.get_u32_le();
    let high = chunk.get_u32_le();

    if high != 0 {
        return Err(Error::unsupported_size(offset, high));
    }

    Ok((u64::from(low), SIZE_HEADER_LEN))
}

/// Read a NUL-terminated UTF-8 key.
///
/// The consumed count includes the terminator.
pub fn read_key(data: &[u8], offset: usize) -> Result<(&str, usize)> {
    let rest = data
        .get(offset..)
        .ok_or_else(|| Error::out_of_bounds(offset, 1, data.len()))?;

    let Some(nul) = rest.iter().position(|&b| b == 0) else {
        return Err(Error::out_of_bounds(offset, rest.len() + 1, data.len()));
    };

    let key = std::str::from_utf8(&rest[..nul]).map_err(|e| Error::invalid_utf8(offset, e))?;
    Ok((key, nul + 1))
}

/// Read a length-prefixed payload without interpreting it.
///
/// The returned slice borrows from `data`.
pub fn read_payload(data: &[u8], offset: usize) -> Result<(&[u8], usize)> {
    let (len, header_len) = read_size(data, offset)?;
    let len = usize::try_from(len)
        .map_err(|_| Error::out_of_bounds(offset + header_len, usize::MAX, data.len()))?;

    let payload = take(data, offset + header_len, len)?;
    Ok((payload, header_len + len))
}

/// Read a length-prefixed UTF-8 string.
pub fn read_string(data: &[u8], offset: usize) -> Result<(&str, usize)> {
    let (payload, consumed) = read_payload(data, offset)?;
    let text = std::str::from_utf8(payload)
        .map_err(|e| Error::invalid_utf8(offset + SIZE_HEADER_LEN, e))?;
    Ok((text, consumed))
}
