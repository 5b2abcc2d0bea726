//! # kvrecord
//!
//! A typed key/value record format with:
//! - A self-describing little-endian wire layout
//! - Bulk encode/decode of whole records
//! - Streaming value reads from buffered sources, aligned across records
//! - An append-only type registry (STRING, INT64, extensible)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Record                              │
//! │                 (key, type tag, textual value)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       RecordCodec                            │
//! │              (header, key, tag, size formula)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ dispatch on tag
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   STRING    │          │    INT64    │
//!   │  operator   │          │  operator   │
//!   └─────────────┘          └─────────────┘
//!          ▲                         ▲
//!          └────────────┬────────────┘
//!                       │
//!               ┌───────┴───────┐
//!               │  RecordStream │
//!               │   (BufRead)   │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod types;
pub mod stream;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, PaddingMode};
pub use error::{RecordError, Result};
pub use record::{decode, encode, Record, RecordCodec, TypeTag};
pub use stream::{read_record, stream_read_value, RecordStream, RecordWriter, StreamedValue};
pub use types::{tag_to_type_name, type_name_to_tag, TypeRegistry, ValueOperator};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvrecord
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
