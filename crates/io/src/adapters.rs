//! Bridges between the byte-stream contracts and `std::io`
//!
//! `ReaderInputStream` adds bounded mark/reset to any `std::io::Read`: bytes
//! read after `mark(limit)` are recorded until more than `limit` of them
//! have passed, after which the mark is dropped and `reset` fails.

use crate::input::{stream_closed, InputStream};
use crate::output::OutputStream;
use crate::Closeable;
use std::io::{ErrorKind, Read, Write};
use valuekit_core::{Error, Result};

// ============================================================================
// ReaderInputStream
// ============================================================================

/// [`InputStream`] over a `std::io::Read`
#[derive(Debug)]
pub struct ReaderInputStream<R> {
    inner: Option<R>,
    /// Bytes read since the mark
    recorded: Vec<u8>,
    /// Replay position inside `recorded`; equal to its length when reading live
    cursor: usize,
    mark_limit: Option<usize>,
}

impl<R: Read> ReaderInputStream<R> {
    /// Wrap `inner`
    pub fn new(inner: R) -> Self {
        ReaderInputStream {
            inner: Some(inner),
            recorded: Vec::new(),
            cursor: 0,
            mark_limit: None,
        }
    }

    /// Unwrap the reader; `None` once closed
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }

    fn read_live(&mut self) -> Result<Option<u8>> {
        let inner = self.inner.as_mut().ok_or_else(stream_closed)?;
        let mut byte = [0u8; 1];
        loop {
            match inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn record(&mut self, b: u8) {
        if let Some(limit) = self.mark_limit {
            if self.recorded.len() < limit {
                self.recorded.push(b);
                self.cursor = self.recorded.len();
            } else {
                self.mark_limit = None;
                self.recorded.clear();
                self.cursor = 0;
            }
        }
    }
}

impl<R> Closeable for ReaderInputStream<R> {
    fn close(&mut self) -> Result<()> {
        self.inner = None;
        self.recorded.clear();
        self.cursor = 0;
        self.mark_limit = None;
        Ok(())
    }
}

impl<R: Read> InputStream for ReaderInputStream<R> {
    fn read(&mut self) -> Result<Option<u8>> {
        if self.inner.is_none() {
            return Err(stream_closed());
        }
        if let Some(&b) = self.recorded.get(self.cursor) {
            self.cursor += 1;
            return Ok(Some(b));
        }
        let next = self.read_live()?;
        if let Some(b) = next {
            self.record(b);
        }
        Ok(next)
    }

    fn available(&self) -> Result<usize> {
        if self.inner.is_none() {
            return Err(stream_closed());
        }
        Ok(self.recorded.len() - self.cursor)
    }

    fn mark(&mut self, read_limit: usize) {
        self.recorded.drain(..self.cursor);
        self.cursor = 0;
        self.mark_limit = Some(read_limit);
    }

    fn mark_supported(&self) -> bool {
        true
    }

    fn reset(&mut self) -> Result<()> {
        if self.inner.is_none() {
            return Err(stream_closed());
        }
        if self.mark_limit.is_none() {
            return Err(Error::io("Resetting to invalid mark"));
        }
        self.cursor = 0;
        Ok(())
    }
}

// ============================================================================
// WriterOutputStream
// ============================================================================

/// [`OutputStream`] over a `std::io::Write`
#[derive(Debug)]
pub struct WriterOutputStream<W: Write> {
    inner: Option<W>,
}

impl<W: Write> WriterOutputStream<W> {
    /// Wrap `inner`
    pub fn new(inner: W) -> Self {
        WriterOutputStream { inner: Some(inner) }
    }

    /// Unwrap the writer; `None` once closed
    pub fn into_inner(mut self) -> Option<W> {
        self.inner.take()
    }

    fn writer(&mut self) -> Result<&mut W> {
        self.inner.as_mut().ok_or_else(stream_closed)
    }
}

impl<W: Write> Closeable for WriterOutputStream<W> {
    /// Flushes, then releases the writer
    fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut w) => Ok(w.flush()?),
            None => Ok(()),
        }
    }
}

impl<W: Write> OutputStream for WriterOutputStream<W> {
    fn write(&mut self, b: u8) -> Result<()> {
        Ok(self.writer()?.write_all(&[b])?)
    }

    fn write_buffer_offset(&mut self, buf: &[u8], off: usize, len: usize) -> Result<()> {
        crate::input::check_range(off, len, buf.len())?;
        Ok(self.writer()?.write_all(&buf[off..off + len])?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.writer()?.flush()?)
    }
}
