//! Byte input contract and the in-memory implementation

use crate::Closeable;
use valuekit_core::{Error, Result};

pub(crate) fn stream_closed() -> Error {
    Error::io("Stream closed")
}

/// Fails with IndexOutOfRange unless `off..off + len` lies inside a buffer of `size`
pub(crate) fn check_range(off: usize, len: usize, size: usize) -> Result<()> {
    match off.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        Some(end) => Err(Error::index_out_of_range(end, size)),
        None => Err(Error::index_out_of_range(i64::MAX, size)),
    }
}

/// Source of bytes
///
/// Every read returns `None` once the end of the stream is reached. After
/// `close` every operation fails with `Error::Io("Stream closed")`.
pub trait InputStream: Closeable {
    /// Next byte, or `None` at end of stream
    fn read(&mut self) -> Result<Option<u8>>;

    /// Fill `buf` from the start; see [`InputStream::read_buffer_offset`]
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        let len = buf.len();
        self.read_buffer_offset(buf, 0, len)
    }

    /// Read up to `len` bytes into `buf[off..off + len]`.
    ///
    /// Returns the number of bytes read, `Some(0)` when `len` is zero, or
    /// `None` when the stream was already at its end.
    fn read_buffer_offset(&mut self, buf: &mut [u8], off: usize, len: usize) -> Result<Option<usize>> {
        check_range(off, len, buf.len())?;
        if len == 0 {
            return Ok(Some(0));
        }
        let mut n = 0;
        while n < len {
            match self.read()? {
                Some(b) => {
                    buf[off + n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(if n == 0 { None } else { Some(n) })
    }

    /// Bytes readable without touching the underlying source
    fn available(&self) -> Result<usize> {
        Ok(0)
    }

    /// Discard up to `n` bytes; returns how many were actually skipped
    fn skip(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n && self.read()?.is_some() {
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Remember the current position for a later `reset`, valid while at
    /// most `read_limit` further bytes are read
    fn mark(&mut self, _read_limit: usize) {}

    /// True if `mark`/`reset` work
    fn mark_supported(&self) -> bool {
        false
    }

    /// Return to the last mark
    fn reset(&mut self) -> Result<()> {
        Err(Error::io("mark/reset not supported"))
    }
}

// ============================================================================
// ByteArrayInputStream
// ============================================================================

/// Input stream over an owned byte buffer
///
/// The whole source is in memory, so `mark` ignores its read limit and
/// `reset` always succeeds.
#[derive(Debug, Clone)]
pub struct ByteArrayInputStream {
    buf: Vec<u8>,
    pos: usize,
    mark: usize,
    closed: bool,
}

impl ByteArrayInputStream {
    /// Stream over all of `buf`
    pub fn new(buf: impl Into<Vec<u8>>) -> Self {
        ByteArrayInputStream {
            buf: buf.into(),
            pos: 0,
            mark: 0,
            closed: false,
        }
    }

    /// Stream over `buf[offset..offset + length]`, clamped to the buffer
    pub fn with_range(buf: impl Into<Vec<u8>>, offset: usize, length: usize) -> Self {
        let buf = buf.into();
        let end = offset.saturating_add(length).min(buf.len());
        let start = offset.min(end);
        ByteArrayInputStream::new(buf[start..end].to_vec())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(stream_closed())
        } else {
            Ok(())
        }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl Closeable for ByteArrayInputStream {
    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

impl InputStream for ByteArrayInputStream {
    fn read(&mut self) -> Result<Option<u8>> {
        self.ensure_open()?;
        let next = self.buf.get(self.pos).copied();
        if next.is_some() {
            self.pos += 1;
        }
        Ok(next)
    }

    fn read_buffer_offset(&mut self, buf: &mut [u8], off: usize, len: usize) -> Result<Option<usize>> {
        self.ensure_open()?;
        check_range(off, len, buf.len())?;
        if len == 0 {
            return Ok(Some(0));
        }
        let n = len.min(self.remaining());
        if n == 0 {
            return Ok(None);
        }
        buf[off..off + n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Some(n))
    }

    fn available(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.remaining())
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        self.ensure_open()?;
        let k = usize::try_from(n).unwrap_or(usize::MAX).min(self.remaining());
        self.pos += k;
        Ok(k as u64)
    }

    fn mark(&mut self, _read_limit: usize) {
        self.mark = self.pos;
    }

    fn mark_supported(&self) -> bool {
        true
    }

    fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.pos = self.mark;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_until_end() {
        let mut s = ByteArrayInputStream::new(vec![1, 2]);
        assert_eq!(s.read().unwrap(), Some(1));
        assert_eq!(s.read().unwrap(), Some(2));
        assert_eq!(s.read().unwrap(), None);
        assert_eq!(s.read().unwrap(), None);
    }

    #[test]
    fn test_read_buffer_offset() {
        let mut s = ByteArrayInputStream::new(b"hello".to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(s.read_buffer_offset(&mut buf, 2, 3).unwrap(), Some(3));
        assert_eq!(&buf[2..5], b"hel");
        assert_eq!(s.read_buffer(&mut buf).unwrap(), Some(2));
        assert_eq!(s.read_buffer(&mut buf).unwrap(), None);
        assert_eq!(s.read_buffer_offset(&mut buf, 0, 0).unwrap(), Some(0));
    }

    #[test]
    fn test_offset_past_buffer_fails() {
        let mut s = ByteArrayInputStream::new(vec![1, 2, 3]);
        let mut buf = [0u8; 4];
        let err = s.read_buffer_offset(&mut buf, 3, 2).unwrap_err();
        assert!(err.is_index_out_of_range());
        assert_eq!(err.to_string(), "Index: 5, Size: 4");
    }

    #[test]
    fn test_skip_reports_actual_count() {
        let mut s = ByteArrayInputStream::new(vec![0; 5]);
        assert_eq!(s.skip(3).unwrap(), 3);
        assert_eq!(s.available().unwrap(), 2);
        assert_eq!(s.skip(10).unwrap(), 2);
        assert_eq!(s.skip(1).unwrap(), 0);
    }

    #[test]
    fn test_mark_reset() {
        let mut s = ByteArrayInputStream::new(vec![1, 2, 3, 4]);
        assert!(s.mark_supported());
        s.read().unwrap();
        s.mark(0);
        s.read().unwrap();
        s.read().unwrap();
        s.reset().unwrap();
        assert_eq!(s.read().unwrap(), Some(2));
    }

    #[test]
    fn test_closed_stream_fails() {
        let mut s = ByteArrayInputStream::new(vec![1]);
        s.close().unwrap();
        let err = s.read().unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.to_string(), "Stream closed");
        assert!(s.available().is_err());
    }

    #[test]
    fn test_with_range_clamps() {
        let mut s = ByteArrayInputStream::with_range(vec![1, 2, 3, 4], 1, 10);
        assert_eq!(s.available().unwrap(), 3);
        assert_eq!(s.read().unwrap(), Some(2));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn buffered_reads_cover_every_byte(
                data in proptest::collection::vec(any::<u8>(), 0..256),
                chunk in 1usize..32,
            ) {
                let mut s = ByteArrayInputStream::new(data.clone());
                let mut buf = vec![0u8; chunk];
                let mut seen = Vec::new();
                while let Some(n) = s.read_buffer(&mut buf).unwrap() {
                    prop_assert!(n > 0 && n <= chunk);
                    seen.extend_from_slice(&buf[..n]);
                }
                prop_assert_eq!(seen, data);
                prop_assert_eq!(s.available().unwrap(), 0);
            }
        }
    }
}
