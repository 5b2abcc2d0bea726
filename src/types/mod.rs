//! Types Module
//!
//! Value operators and the tag registry that dispatches to them.
//!
//! ## Operator Contract
//! Every value type supplies three operations:
//! - bulk encode: write only the value encoding (the codec writes the header)
//! - bulk decode: locate and decode the value inside a full wire record
//! - stream read: consume exactly the value encoding from a buffered reader
//!
//! ### Built-in Tags
//! - 0x00: STRING - value_len (4) + bytes
//! - 0x01: INT64  - 8 bytes, two's complement

mod int64;
mod registry;
mod string;

use std::fmt;
use std::io::BufRead;
use std::sync::Arc;

use crate::error::Result;

pub use int64::Int64Operator;
pub use registry::{tag_to_type_name, type_name_to_tag, TypeRegistry, TypeRegistryBuilder};
pub use string::StringOperator;

/// Encode/decode/stream-read behavior for one value type
pub trait ValueOperator: Send + Sync + fmt::Debug {
    /// Payload size `V` used by the generic total-size formula
    fn payload_size(&self, value: &str) -> Result<usize>;

    /// Exact number of bytes `encode_value` writes
    fn encoded_len(&self, value: &str) -> Result<usize>;

    /// Append the value encoding for `value` to `dst`
    fn encode_value(&self, value: &str, dst: &mut Vec<u8>) -> Result<()>;

    /// Decode the value from a complete wire record whose key is `key_len` bytes
    ///
    /// `record` ends at the declared total size or at the configured value
    /// limit, whichever comes first.
    fn decode_value(&self, record: &[u8], key_len: usize) -> Result<String>;

    /// Read the value encoding from a reader positioned just after the type tag
    ///
    /// `limit` is the number of bytes the value may occupy: what the record
    /// header leaves, capped by the configured value limit. A declared length
    /// beyond it is rejected before allocating.
    fn stream_read(&self, reader: &mut dyn BufRead, limit: usize) -> Result<String>;
}

/// Registered operator: built-ins dispatch statically, extensions through a trait object
#[derive(Debug, Clone)]
pub enum Operator {
    String(StringOperator),
    Int64(Int64Operator),
    Custom(Arc<dyn ValueOperator>),
}

impl Operator {
    /// Wrap an extension operator
    pub fn custom(operator: impl ValueOperator + 'static) -> Self {
        Operator::Custom(Arc::new(operator))
    }
}

impl ValueOperator for Operator {
    fn payload_size(&self, value: &str) -> Result<usize> {
        match self {
            Operator::String(op) => op.payload_size(value),
            Operator::Int64(op) => op.payload_size(value),
            Operator::Custom(op) => op.payload_size(value),
        }
    }

    fn encoded_len(&self, value: &str) -> Result<usize> {
        match self {
            Operator::String(op) => op.encoded_len(value),
            Operator::Int64(op) => op.encoded_len(value),
            Operator::Custom(op) => op.encoded_len(value),
        }
    }

    fn encode_value(&self, value: &str, dst: &mut Vec<u8>) -> Result<()> {
        match self {
            Operator::String(op) => op.encode_value(value, dst),
            Operator::Int64(op) => op.encode_value(value, dst),
            Operator::Custom(op) => op.encode_value(value, dst),
        }
    }

    fn decode_value(&self, record: &[u8], key_len: usize) -> Result<String> {
        match self {
            Operator::String(op) => op.decode_value(record, key_len),
            Operator::Int64(op) => op.decode_value(record, key_len),
            Operator::Custom(op) => op.decode_value(record, key_len),
        }
    }

    fn stream_read(&self, reader: &mut dyn BufRead, limit: usize) -> Result<String> {
        match self {
            Operator::String(op) => op.stream_read(reader, limit),
            Operator::Int64(op) => op.stream_read(reader, limit),
            Operator::Custom(op) => op.stream_read(reader, limit),
        }
    }
}
