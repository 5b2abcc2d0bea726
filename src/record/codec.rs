//! Record codec
//!
//! Bulk encoding and decoding of whole wire records.
//!
//! ## Wire Format
//! ```text
//! ┌───────────────┬───────────────┬──────────┬──────────┬─────────────────┐
//! │ TotalSize (4) │ KeyLength (4) │   Key    │ Type (1) │ Value encoding  │
//! └───────────────┴───────────────┴──────────┴──────────┴─────────────────┘
//! ```
//!
//! ### Value encoding by type
//! - STRING: value_len (4 bytes) + value
//! - INT64:  8 bytes, two's complement
//!
//! `TotalSize` is `key_len + 1 + V + 12` where `V` is the operator's payload
//! size. For INT64 this reserves 4 bytes past the value, which are written
//! as zeros unless the codec runs in [`PaddingMode::Compact`].

use bytes::BufMut;
use tracing::debug;

use crate::config::{Config, PaddingMode};
use crate::error::{RecordError, Result};
use crate::types::{Operator, TypeRegistry, ValueOperator};

use super::layout::{
    slice_at, type_offset, u32_at, value_offset, wire_len, HEADER_SIZE, KEY_OFFSET,
    LENGTH_SLOT, SIZE_FIELD_LEN, SIZE_OVERHEAD, TYPE_SIZE,
};
use super::{Record, TypeTag};

/// Encoder/decoder bound to a configuration and a type registry
#[derive(Debug, Clone)]
pub struct RecordCodec<'r> {
    config: Config,
    registry: &'r TypeRegistry,
}

impl Default for RecordCodec<'static> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl RecordCodec<'static> {
    /// Create a codec over the global registry
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: TypeRegistry::global(),
        }
    }
}

impl<'r> RecordCodec<'r> {
    /// Create a codec over a caller-built registry
    pub fn with_registry(config: Config, registry: &'r TypeRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    /// Number of bytes `encode` will produce for this record
    pub fn encoded_size(&self, record: &Record) -> Result<usize> {
        let operator = self.encode_operator(record.value_type)?;
        self.total_size(operator, record)
    }

    /// Encode a record to a newly allocated wire buffer
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let operator = self.encode_operator(record.value_type)?;
        let key = record.key.as_bytes();
        let key_len = wire_len(key.len(), "key")?;

        let total = self.total_size(operator, record)?;
        let total_wire = wire_len(total, "record")?;

        let mut buf = Vec::with_capacity(total);
        buf.put_u32_le(total_wire);
        buf.put_u32_le(key_len);
        buf.put_slice(key);
        buf.put_u8(record.value_type.as_u8());
        operator.encode_value(&record.value, &mut buf)?;

        if buf.len() > total {
            return Err(RecordError::Encoding(format!(
                "{} value wrote {} bytes past the declared total size {}",
                record.value_type,
                buf.len() - total,
                total
            )));
        }

        // Reserved tail of fixed-width types stays zeroed
        buf.resize(total, 0);

        debug!(
            key_len = key.len(),
            value_type = record.value_type.as_u8(),
            total_size = total,
            "Encoded record"
        );

        Ok(buf)
    }

    fn encode_operator(&self, tag: TypeTag) -> Result<&'r Operator> {
        self.registry
            .operator(tag)
            .ok_or_else(|| RecordError::Encoding(format!("Unregistered type tag: 0x{:02x}", tag.0)))
    }

    fn total_size(&self, operator: &Operator, record: &Record) -> Result<usize> {
        let key_len = record.key.len();
        if key_len > self.config.max_key_size {
            return Err(RecordError::Encoding(format!(
                "Key too large: {} bytes (max {})",
                key_len, self.config.max_key_size
            )));
        }

        let payload = operator.payload_size(&record.value)?;
        if payload > self.config.max_value_size {
            return Err(RecordError::Encoding(format!(
                "Value too large: {} bytes (max {})",
                payload, self.config.max_value_size
            )));
        }

        let total = match self.config.padding {
            PaddingMode::Preserve => key_len + TYPE_SIZE + payload + SIZE_OVERHEAD,
            PaddingMode::Compact => {
                HEADER_SIZE + key_len + TYPE_SIZE + operator.encoded_len(&record.value)?
            }
        };

        Ok(total)
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    /// Decode a complete wire record
    ///
    /// The buffer may extend past the record; bytes after `totalSize` are ignored.
    pub fn decode(&self, input: &[u8]) -> Result<Record> {
        let total = u32_at(input, 0, "totalSize")?;
        let key_len = u32_at(input, SIZE_FIELD_LEN, "keyLength")?;

        if key_len > self.config.max_key_size {
            return Err(RecordError::Decoding(format!(
                "Key length {} exceeds limit {}",
                key_len, self.config.max_key_size
            )));
        }

        if input.len() < total {
            return Err(RecordError::Decoding(format!(
                "Incomplete record: declared {} bytes, buffer has {}",
                total,
                input.len()
            )));
        }

        if total < value_offset(key_len) {
            return Err(RecordError::Decoding(format!(
                "Declared total size {} cannot hold a {}-byte key",
                total, key_len
            )));
        }

        // Operators only ever see the declared record
        let record = &input[..total];

        let key_bytes = slice_at(record, KEY_OFFSET, key_len, "key")?;
        let key = String::from_utf8(key_bytes.to_vec())
            .map_err(|e| RecordError::Decoding(format!("Key is not valid UTF-8: {}", e)))?;

        let tag = TypeTag(slice_at(record, type_offset(key_len), TYPE_SIZE, "type tag")?[0]);
        let operator = self
            .registry
            .operator(tag)
            .ok_or_else(|| RecordError::Decoding(format!("Unregistered type tag: 0x{:02x}", tag.0)))?;

        // Value bytes past the configured limit are out of reach of the operator
        let value_bound = value_offset(key_len)
            .saturating_add(LENGTH_SLOT)
            .saturating_add(self.config.max_value_size)
            .min(total);
        let value = operator
            .decode_value(&record[..value_bound], key_len)
            .map_err(|e| self.value_limit_error(e, total, value_bound))?;

        debug!(
            key_len,
            value_type = tag.as_u8(),
            total_size = total,
            "Decoded record"
        );

        Ok(Record {
            key,
            value_type: tag,
            value,
        })
    }

    fn value_limit_error(&self, err: RecordError, total: usize, value_bound: usize) -> RecordError {
        match err {
            RecordError::Decoding(_) if value_bound < total => RecordError::Decoding(format!(
                "Value exceeds limit of {} bytes: {}",
                self.config.max_value_size, err
            )),
            other => other,
        }
    }

    /// Decode into an existing record, leaving it untouched on error
    pub fn decode_into(&self, input: &[u8], target: &mut Record) -> Result<()> {
        *target = self.decode(input)?;
        Ok(())
    }
}

/// Encode a record with the default configuration and the global registry
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    RecordCodec::default().encode(record)
}

/// Decode a wire record with the default configuration and the global registry
pub fn decode(input: &[u8]) -> Result<Record> {
    RecordCodec::default().decode(input)
}
