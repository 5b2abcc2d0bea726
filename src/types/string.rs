//! STRING operator
//!
//! Length-prefixed UTF-8: value_len (4) + value bytes.

use std::io::BufRead;

use bytes::BufMut;
use tracing::trace;

use crate::error::{RecordError, Result};
use crate::record::layout::{slice_at, u32_at, value_offset, wire_len, LENGTH_SLOT};
use crate::stream::read_full;

use super::ValueOperator;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringOperator;

fn into_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| RecordError::Decoding(format!("STRING value is not valid UTF-8: {}", e)))
}

impl ValueOperator for StringOperator {
    fn payload_size(&self, value: &str) -> Result<usize> {
        Ok(value.len())
    }

    fn encoded_len(&self, value: &str) -> Result<usize> {
        Ok(LENGTH_SLOT + value.len())
    }

    fn encode_value(&self, value: &str, dst: &mut Vec<u8>) -> Result<()> {
        dst.put_u32_le(wire_len(value.len(), "value")?);
        dst.put_slice(value.as_bytes());
        Ok(())
    }

    fn decode_value(&self, record: &[u8], key_len: usize) -> Result<String> {
        let start = value_offset(key_len);
        let value_len = u32_at(record, start, "STRING value length")?;
        let bytes = slice_at(record, start + LENGTH_SLOT, value_len, "STRING value")?;
        into_text(bytes.to_vec())
    }

    fn stream_read(&self, reader: &mut dyn BufRead, limit: usize) -> Result<String> {
        let mut len_buf = [0u8; LENGTH_SLOT];
        read_full(reader, &mut len_buf)?;
        let value_len = u32::from_le_bytes(len_buf) as usize;

        if LENGTH_SLOT + value_len > limit {
            return Err(RecordError::Decoding(format!(
                "STRING value length {} exceeds record or value limit ({} bytes)",
                value_len,
                limit.saturating_sub(LENGTH_SLOT)
            )));
        }

        let mut data = vec![0u8; value_len];
        read_full(reader, &mut data)?;
        trace!(value_len, "Read STRING value");

        into_text(data)
    }
}
