//! Byte output contract and the in-memory implementation

use crate::input::{check_range, stream_closed};
use crate::Closeable;
use std::fmt;
use valuekit_core::Result;

/// Sink for bytes
pub trait OutputStream: Closeable {
    /// Write one byte
    fn write(&mut self, b: u8) -> Result<()>;

    /// Write all of `buf`
    fn write_buffer(&mut self, buf: &[u8]) -> Result<()> {
        self.write_buffer_offset(buf, 0, buf.len())
    }

    /// Write `buf[off..off + len]`
    fn write_buffer_offset(&mut self, buf: &[u8], off: usize, len: usize) -> Result<()> {
        check_range(off, len, buf.len())?;
        for &b in &buf[off..off + len] {
            self.write(b)?;
        }
        Ok(())
    }

    /// Push buffered bytes to the destination
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Output stream that grows an in-memory buffer
#[derive(Debug, Clone, Default)]
pub struct ByteArrayOutputStream {
    buf: Vec<u8>,
    closed: bool,
}

impl ByteArrayOutputStream {
    /// Empty stream
    pub fn new() -> Self {
        ByteArrayOutputStream::default()
    }

    /// Empty stream with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        ByteArrayOutputStream {
            buf: Vec::with_capacity(capacity),
            closed: false,
        }
    }

    /// Copy of everything written so far
    pub fn to_byte_array(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Discard the written bytes
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Write the collected bytes to `out`
    pub fn write_to(&self, out: &mut dyn OutputStream) -> Result<()> {
        out.write_buffer(&self.buf)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(stream_closed())
        } else {
            Ok(())
        }
    }
}

/// Bytes decoded as UTF-8, invalid sequences replaced
impl fmt::Display for ByteArrayOutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.buf))
    }
}

impl Closeable for ByteArrayOutputStream {
    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

impl OutputStream for ByteArrayOutputStream {
    fn write(&mut self, b: u8) -> Result<()> {
        self.ensure_open()?;
        self.buf.push(b);
        Ok(())
    }

    fn write_buffer_offset(&mut self, buf: &[u8], off: usize, len: usize) -> Result<()> {
        self.ensure_open()?;
        check_range(off, len, buf.len())?;
        self.buf.extend_from_slice(&buf[off..off + len]);
        Ok(())
    }
}
