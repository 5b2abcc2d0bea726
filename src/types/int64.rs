//! INT64 operator
//!
//! Fixed 8-byte two's complement, no length prefix.

use std::io::BufRead;

use bytes::BufMut;
use tracing::trace;

use crate::error::{RecordError, Result};
use crate::record::layout::{slice_at, value_offset};
use crate::stream::read_full;

use super::ValueOperator;

/// Encoded width of an INT64 value
pub const INT64_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct Int64Operator;

fn parse(value: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|e| {
        RecordError::Encoding(format!("INT64 value {:?} is not a signed 64-bit integer: {}", value, e))
    })
}

fn from_wire(bytes: &[u8]) -> String {
    let mut raw = [0u8; INT64_WIDTH];
    raw.copy_from_slice(bytes);
    i64::from_le_bytes(raw).to_string()
}

impl ValueOperator for Int64Operator {
    fn payload_size(&self, _value: &str) -> Result<usize> {
        Ok(INT64_WIDTH)
    }

    fn encoded_len(&self, _value: &str) -> Result<usize> {
        Ok(INT64_WIDTH)
    }

    fn encode_value(&self, value: &str, dst: &mut Vec<u8>) -> Result<()> {
        dst.put_i64_le(parse(value)?);
        Ok(())
    }

    fn decode_value(&self, record: &[u8], key_len: usize) -> Result<String> {
        let bytes = slice_at(record, value_offset(key_len), INT64_WIDTH, "INT64 value")?;
        Ok(from_wire(bytes))
    }

    fn stream_read(&self, reader: &mut dyn BufRead, limit: usize) -> Result<String> {
        if limit < INT64_WIDTH {
            return Err(RecordError::Decoding(format!(
                "INT64 value needs {} bytes, record leaves {}",
                INT64_WIDTH, limit
            )));
        }

        // Consume, not peek: the cursor must move past the value
        let mut raw = [0u8; INT64_WIDTH];
        read_full(reader, &mut raw)?;
        trace!("Read INT64 value");

        Ok(from_wire(&raw))
    }
}
