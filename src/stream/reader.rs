//! Streaming record reader
//!
//! Decodes values straight from a buffered source positioned at a record
//! boundary. The key is skipped by offset and never materialized.
//!
//! After a successful read the cursor sits on the next record's
//! `totalSize` field, whatever the value type: any bytes the header
//! reserves past the value encoding (the INT64 gap) are skipped too.

use std::io::BufRead;

use tracing::trace;

use crate::error::{RecordError, Result};
use crate::record::layout::{
    value_offset, HEADER_SIZE, LENGTH_SLOT, SIZE_FIELD_LEN, TYPE_SIZE,
};
use crate::record::{Record, RecordCodec, TypeTag};
use crate::types::ValueOperator;

use super::io::{at_eof, read_full, skip, CountingReader};

/// A value read from a stream, without its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedValue {
    /// Tag read from the stream
    pub value_type: TypeTag,
    /// Registered name for the tag
    pub type_name: String,
    /// Textual form of the value
    pub value: String,
    /// Declared size of the record the value came from
    pub record_size: usize,
}

impl<'r> RecordCodec<'r> {
    /// Largest `totalSize` this codec will accept from a stream
    fn max_record_size(&self) -> usize {
        let config = self.config();
        HEADER_SIZE
            .saturating_add(config.max_key_size)
            .saturating_add(TYPE_SIZE)
            .saturating_add(LENGTH_SLOT)
            .saturating_add(config.max_value_size)
    }

    fn check_declared_size(&self, total: usize) -> Result<()> {
        if total > self.max_record_size() {
            return Err(RecordError::Decoding(format!(
                "Record too large: {} bytes (max {})",
                total,
                self.max_record_size()
            )));
        }
        if total < HEADER_SIZE + TYPE_SIZE {
            return Err(RecordError::Decoding(format!(
                "Declared total size {} is smaller than a record header",
                total
            )));
        }
        Ok(())
    }

    /// Read the next record's value, leaving the cursor at the following record
    ///
    /// A record with an unregistered tag is skipped whole before the
    /// `Decoding` error is returned, so the cursor stays aligned.
    pub fn stream_read_value<R: BufRead + ?Sized>(&self, reader: &mut R) -> Result<StreamedValue> {
        self.read_value(reader, &mut None)
    }

    /// `skipped` is set to the record size when a failed read still left the
    /// cursor on the next record
    fn read_value<R: BufRead + ?Sized>(
        &self,
        reader: &mut R,
        skipped: &mut Option<usize>,
    ) -> Result<StreamedValue> {
        let mut reader = CountingReader::new(reader);

        let mut header = [0u8; HEADER_SIZE];
        read_full(&mut reader, &mut header)?;
        let total = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let key_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

        self.check_declared_size(total)?;
        if key_len > self.config().max_key_size || value_offset(key_len) > total {
            return Err(RecordError::Decoding(format!(
                "Key length {} does not fit record of {} bytes",
                key_len, total
            )));
        }

        skip(&mut reader, key_len)?;

        let mut tag = [0u8; TYPE_SIZE];
        read_full(&mut reader, &mut tag)?;
        let tag = TypeTag(tag[0]);

        let operator = match self.registry().operator(tag) {
            Some(operator) => operator,
            None => {
                let rest = total - reader.consumed();
                skip(&mut reader, rest)?;
                *skipped = Some(total);
                return Err(RecordError::Decoding(format!(
                    "Unregistered type tag: 0x{:02x}",
                    tag.0
                )));
            }
        };

        let limit = (total - reader.consumed())
            .min(LENGTH_SLOT.saturating_add(self.config().max_value_size));
        let value = operator.stream_read(&mut reader, limit)?;

        let consumed = reader.consumed();
        if consumed > total {
            return Err(RecordError::Decoding(format!(
                "Value overran record: consumed {} bytes of {}",
                consumed, total
            )));
        }

        let reserved = total - consumed;
        if reserved > 0 {
            trace!(reserved, "Skipping reserved record bytes");
            skip(&mut reader, reserved)?;
        }

        let type_name = self
            .registry()
            .tag_to_type_name(tag)
            .unwrap_or_default()
            .to_string();

        trace!(key_len, value_type = tag.as_u8(), total_size = total, "Streamed value");

        Ok(StreamedValue {
            value_type: tag,
            type_name,
            value,
            record_size: total,
        })
    }

    /// Read one whole record from a stream and bulk-decode it
    pub fn read_record<R: BufRead + ?Sized>(&self, reader: &mut R) -> Result<Record> {
        self.read_record_sized(reader).map(|(record, _)| record)
    }

    fn read_record_sized<R: BufRead + ?Sized>(&self, reader: &mut R) -> Result<(Record, usize)> {
        let mut size = [0u8; SIZE_FIELD_LEN];
        read_full(reader, &mut size)?;
        let total = u32::from_le_bytes(size) as usize;
        self.check_declared_size(total)?;

        let mut buf = vec![0u8; total];
        buf[..SIZE_FIELD_LEN].copy_from_slice(&size);
        read_full(reader, &mut buf[SIZE_FIELD_LEN..])?;

        Ok((self.decode(&buf)?, total))
    }
}

/// Stream the next value with the default codec
pub fn stream_read_value<R: BufRead + ?Sized>(reader: &mut R) -> Result<StreamedValue> {
    RecordCodec::default().stream_read_value(reader)
}

/// Read one whole record with the default codec
pub fn read_record<R: BufRead + ?Sized>(reader: &mut R) -> Result<Record> {
    RecordCodec::default().read_record(reader)
}

// =============================================================================
// Record Stream
// =============================================================================

/// Sequential reader over concatenated records
///
/// Ends with `None` at a clean record boundary. When reading values, a
/// record with an unregistered tag yields a `Decoding` error and the stream
/// moves on to the next record. A torn tail surfaces as a `Truncated` error;
/// after that, or any other error, the stream yields nothing more.
pub struct RecordStream<'r, R: BufRead> {
    codec: RecordCodec<'r>,
    reader: R,
    /// Byte offset of the next record
    offset: u64,
    done: bool,
}

impl<R: BufRead> RecordStream<'static, R> {
    /// Stream with the default codec
    pub fn new(reader: R) -> Self {
        Self::with_codec(RecordCodec::default(), reader)
    }
}

impl<'r, R: BufRead> RecordStream<'r, R> {
    pub fn with_codec(codec: RecordCodec<'r>, reader: R) -> Self {
        Self {
            codec,
            reader,
            offset: 0,
            done: false,
        }
    }

    /// Offset of the next record relative to where the stream started
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Next value, or `None` at end of stream
    pub fn next_value(&mut self) -> Result<Option<StreamedValue>> {
        if !self.ready()? {
            return Ok(None);
        }
        let mut skipped = None;
        let result = self.codec.read_value(&mut self.reader, &mut skipped);
        self.advance(match &result {
            Ok(value) => Some(value.record_size),
            Err(_) => skipped,
        });
        result.map(Some)
    }

    /// Next full record, or `None` at end of stream
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if !self.ready()? {
            return Ok(None);
        }
        let result = self.codec.read_record_sized(&mut self.reader);
        self.advance(result.as_ref().ok().map(|(_, size)| *size));
        result.map(|(record, _)| Some(record))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn ready(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        match at_eof(&mut self.reader) {
            Ok(true) => {
                self.done = true;
                Ok(false)
            }
            Ok(false) => Ok(true),
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    fn advance(&mut self, size: Option<usize>) {
        match size {
            Some(size) => self.offset += size as u64,
            None => self.done = true,
        }
    }
}

impl<R: BufRead> Iterator for RecordStream<'_, R> {
    type Item = Result<StreamedValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value().transpose()
    }
}
