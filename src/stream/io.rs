//! Stream I/O helpers
//!
//! Exact reads and skips over buffered sources, reporting short reads as
//! `Truncated` instead of a bare `UnexpectedEof`.

use std::io::{self, BufRead, Read};

use crate::error::{RecordError, Result};

/// Fill `buf` completely from `reader`
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(RecordError::Truncated {
                    expected: buf.len(),
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RecordError::Io(e)),
        }
    }
    Ok(())
}

/// Advance `reader` by `count` bytes without copying them out
pub fn skip<R: BufRead + ?Sized>(reader: &mut R, count: usize) -> Result<()> {
    let mut remaining = count;
    while remaining > 0 {
        let available = match reader.fill_buf() {
            Ok(buf) => buf.len(),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RecordError::Io(e)),
        };

        if available == 0 {
            return Err(RecordError::Truncated {
                expected: count,
                actual: count - remaining,
            });
        }

        let step = available.min(remaining);
        reader.consume(step);
        remaining -= step;
    }
    Ok(())
}

/// True if `reader` has no more bytes
pub fn at_eof<R: BufRead + ?Sized>(reader: &mut R) -> Result<bool> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.is_empty()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RecordError::Io(e)),
        }
    }
}

/// Buffered reader wrapper counting the bytes consumed through it
pub struct CountingReader<'a, R: BufRead + ?Sized> {
    inner: &'a mut R,
    consumed: usize,
}

impl<'a, R: BufRead + ?Sized> CountingReader<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Bytes consumed since creation
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<R: BufRead + ?Sized> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n;
        Ok(n)
    }
}

impl<R: BufRead + ?Sized> BufRead for CountingReader<'_, R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
        self.consumed += amt;
    }
}
