//! Record Writer
//!
//! Appends encoded records back to back to any writer.

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::record::{Record, RecordCodec};

/// Appends records contiguously, tracking where each one starts
pub struct RecordWriter<'r, W: Write> {
    codec: RecordCodec<'r>,
    writer: W,
    /// Bytes written so far
    offset: u64,
    /// Records written so far
    count: u64,
}

impl<W: Write> RecordWriter<'static, W> {
    /// Writer with the default codec
    pub fn new(writer: W) -> Self {
        Self::with_codec(RecordCodec::default(), writer)
    }
}

impl<'r, W: Write> RecordWriter<'r, W> {
    pub fn with_codec(codec: RecordCodec<'r>, writer: W) -> Self {
        Self {
            codec,
            writer,
            offset: 0,
            count: 0,
        }
    }

    /// Encode and append a record, returning the offset it was written at
    ///
    /// Nothing is written if encoding fails.
    pub fn append(&mut self, record: &Record) -> Result<u64> {
        let bytes = self.codec.encode(record)?;
        self.writer.write_all(&bytes)?;

        let start = self.offset;
        self.offset += bytes.len() as u64;
        self.count += 1;

        debug!(offset = start, size = bytes.len(), "Appended record");
        Ok(start)
    }

    /// Offset the next record will be written at
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records appended
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
