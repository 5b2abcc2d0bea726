//! Stream Module
//!
//! Incremental decoding from buffered byte sources, plus the matching
//! append-side writer.
//!
//! ## Responsibilities
//! - Read a value without materializing the record or its key
//! - Keep the cursor aligned on record boundaries across many records
//! - Report short sources as `Truncated`, pass I/O errors through unchanged
//!
//! ## Stream Layout
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ Record 1                                            │
//! │ ┌──────────┬─────────┬─────┬──────┬───────┬──────┐ │
//! │ │ Size (4) │ KLen(4) │ Key │ Type │ Value │ Gap? │ │
//! │ └──────────┴─────────┴─────┴──────┴───────┴──────┘ │
//! ├─────────────────────────────────────────────────────┤
//! │ Record 2                                            │
//! │ ...                                                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Callers sharing one reader must serialize access themselves; nothing
//! here locks.

mod io;
mod reader;
mod writer;

pub use io::{read_full, skip, CountingReader};
pub use reader::{read_record, stream_read_value, RecordStream, StreamedValue};
pub use writer::RecordWriter;
