//! Wire record layout
//!
//! Offsets and sizes shared by the bulk codec, the operators and the
//! streaming reader. All integers are little-endian.
//!
//! ```text
//! ┌───────────────┬───────────────┬──────────┬──────────┬─────────────────┐
//! │ TotalSize (4) │ KeyLength (4) │   Key    │ Type (1) │ Value encoding  │
//! └───────────────┴───────────────┴──────────┴──────────┴─────────────────┘
//! ```

use crate::error::{RecordError, Result};

/// Width of the `totalSize` field
pub const SIZE_FIELD_LEN: usize = 4;

/// Width of the `keyLength` field
pub const KEY_LEN_FIELD_LEN: usize = 4;

/// Width of the type tag
pub const TYPE_SIZE: usize = 1;

/// Header size: TotalSize (4) + KeyLength (4) = 8 bytes
pub const HEADER_SIZE: usize = SIZE_FIELD_LEN + KEY_LEN_FIELD_LEN;

/// Width of a length prefix inside a value encoding
pub const LENGTH_SLOT: usize = 4;

/// Fixed overhead of the generic size formula: TotalSize + KeyLength + one length slot
pub const SIZE_OVERHEAD: usize = HEADER_SIZE + LENGTH_SLOT;

/// Offset of the key bytes
pub const KEY_OFFSET: usize = HEADER_SIZE;

/// Offset of the type tag for a record with the given key length
pub fn type_offset(key_len: usize) -> usize {
    KEY_OFFSET + key_len
}

/// Offset of the first value-encoding byte for the given key length
pub fn value_offset(key_len: usize) -> usize {
    type_offset(key_len) + TYPE_SIZE
}

/// Borrow `len` bytes at `start`, failing instead of indexing past the end
pub(crate) fn slice_at<'a>(input: &'a [u8], start: usize, len: usize, what: &str) -> Result<&'a [u8]> {
    let end = start
        .checked_add(len)
        .ok_or_else(|| RecordError::Decoding(format!("{}: length {} overflows", what, len)))?;

    input.get(start..end).ok_or_else(|| {
        RecordError::Decoding(format!(
            "{}: needs bytes {}..{}, buffer has {}",
            what,
            start,
            end,
            input.len()
        ))
    })
}

/// Read a little-endian u32 length field at `start`
pub(crate) fn u32_at(input: &[u8], start: usize, what: &str) -> Result<usize> {
    let bytes = slice_at(input, start, 4, what)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
}

/// Convert a length to its u32 wire form
pub(crate) fn wire_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| RecordError::Encoding(format!("{} length {} does not fit in u32", what, len)))
}
