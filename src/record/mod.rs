//! Record Module
//!
//! In-memory key/type/value triple and the bulk (whole-buffer) codec.
//!
//! ## Responsibilities
//! - Own the key and the textual form of the value
//! - Serialize a record to a self-describing buffer
//! - Decode a complete buffer back into a record
//!
//! Values are held as text: an INT64 value is kept as its decimal string
//! and converted to binary only at the encode/decode boundary.

mod codec;
pub mod layout;

use std::fmt;
use std::str::FromStr;

use crate::error::{RecordError, Result};
use crate::types::TypeRegistry;

pub use codec::{decode, encode, RecordCodec};

// =============================================================================
// Type Tag
// =============================================================================

/// One-byte tag selecting the operator for a value
///
/// Defaults to `STRING` (tag 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeTag(pub u8);

impl TypeTag {
    pub const STRING: TypeTag = TypeTag(0);
    pub const INT64: TypeTag = TypeTag(1);

    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for TypeTag {
    fn from(byte: u8) -> Self {
        TypeTag(byte)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match TypeRegistry::global().tag_to_type_name(*self) {
            Some(name) => f.write_str(name),
            None => write!(f, "tag(0x{:02x})", self.0),
        }
    }
}

impl FromStr for TypeTag {
    type Err = RecordError;

    /// Resolve a type name ("string", "int64", ...) against the global registry
    fn from_str(name: &str) -> Result<Self> {
        TypeRegistry::global()
            .type_name_to_tag(name)
            .ok_or_else(|| RecordError::Encoding(format!("Unknown value type: {}", name)))
    }
}

// =============================================================================
// Record
// =============================================================================

/// A key/type/value triple
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// Record key (may be empty)
    pub key: String,

    /// Tag selecting the value operator
    pub value_type: TypeTag,

    /// Textual form of the value
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value_type: TypeTag, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type,
            value: value.into(),
        }
    }

    /// Create a STRING record
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, TypeTag::STRING, value)
    }

    /// Create an INT64 record from an integer
    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, TypeTag::INT64, value.to_string())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_type(&self) -> TypeTag {
        self.value_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Registered name of this record's type, if any
    pub fn type_name(&self) -> Option<&'static str> {
        TypeRegistry::global().tag_to_type_name(self.value_type)
    }

    /// Encode with the default codec
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decode a complete wire record with the default codec
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }

    /// Decode a complete wire record into `self`
    ///
    /// On error `self` is left unchanged.
    pub fn decode_into(&mut self, bytes: &[u8]) -> Result<()> {
        *self = decode(bytes)?;
        Ok(())
    }
}
