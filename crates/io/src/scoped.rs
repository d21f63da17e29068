//! Scoped acquisition of closeable resources
//!
//! [`Scoped`] closes its resource exactly once: explicitly through
//! [`Scoped::close`], which reports the failure, or on drop, which can only
//! log it. [`with_resource`] runs a body and closes on every exit path.

use crate::input::InputStream;
use crate::output::OutputStream;
use crate::Closeable;
use std::ops::{Deref, DerefMut};
use tracing::warn;
use valuekit_core::{Error, Result};

/// Guard that closes its resource when dropped
#[derive(Debug)]
pub struct Scoped<R: Closeable> {
    resource: R,
    closed: bool,
}

impl<R: Closeable> Scoped<R> {
    /// Take ownership of `resource`
    pub fn new(resource: R) -> Self {
        Scoped {
            resource,
            closed: false,
        }
    }

    /// Close now and report the outcome
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.resource.close()
    }
}

impl<R: Closeable> Deref for Scoped<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<R: Closeable> DerefMut for Scoped<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

impl<R: Closeable> Drop for Scoped<R> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.resource.close() {
            warn!(target: "valuekit::io", error = %e, "scoped resource failed to close on drop");
        }
    }
}

/// Run `body` with `resource`, then close it.
///
/// A failure from `body` wins over a failure from `close`; the close
/// failure is then only logged.
pub fn with_resource<R, T>(resource: R, body: impl FnOnce(&mut R) -> Result<T>) -> Result<T>
where
    R: Closeable,
{
    let mut guard = Scoped::new(resource);
    let outcome = body(&mut guard);
    let closed = guard.close();
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!(target: "valuekit::io", error = %close_err, "close failed after body error");
            Err(e)
        }
    }
}

/// Copy every remaining byte of `input` to `output`; returns the count
pub fn transfer(input: &mut dyn InputStream, output: &mut dyn OutputStream) -> Result<u64> {
    let mut buf = [0u8; 8192];
    let mut total: u64 = 0;
    while let Some(n) = input.read_buffer(&mut buf)? {
        if n == 0 {
            return Err(Error::io("read returned no bytes before end of stream"));
        }
        output.write_buffer_offset(&buf, 0, n)?;
        total += n as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteArrayInputStream, ByteArrayOutputStream};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked {
        closes: Rc<Cell<u32>>,
        fail: bool,
    }

    impl Closeable for Tracked {
        fn close(&mut self) -> Result<()> {
            self.closes.set(self.closes.get() + 1);
            if self.fail {
                Err(Error::io("disk gone"))
            } else {
                Ok(())
            }
        }
    }

    fn tracked(fail: bool) -> (Tracked, Rc<Cell<u32>>) {
        let closes = Rc::new(Cell::new(0));
        (
            Tracked {
                closes: Rc::clone(&closes),
                fail,
            },
            closes,
        )
    }

    #[test]
    fn test_drop_closes_once() {
        let (r, closes) = tracked(false);
        {
            let _guard = Scoped::new(r);
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_explicit_close_reports_and_skips_drop() {
        let (r, closes) = tracked(true);
        let guard = Scoped::new(r);
        assert!(guard.close().unwrap_err().is_io());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_drop_swallows_close_failure() {
        let (r, closes) = tracked(true);
        drop(Scoped::new(r));
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_with_resource_closes_on_error() {
        let (r, closes) = tracked(false);
        let result: Result<()> = with_resource(r, |_| Err(Error::illegal_state("boom")));
        assert!(result.unwrap_err().is_illegal_state());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_with_resource_body_error_wins() {
        let (r, closes) = tracked(true);
        let result: Result<()> = with_resource(r, |_| Err(Error::illegal_state("boom")));
        assert!(result.unwrap_err().is_illegal_state());
        assert_eq!(closes.get(), 1);

        let (r, _) = tracked(true);
        let result = with_resource(r, |_| Ok(5));
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_with_resource_reads_stream() {
        let sum = with_resource(ByteArrayInputStream::new(vec![1, 2, 3]), |s| {
            let mut total = 0u32;
            while let Some(b) = s.read()? {
                total += u32::from(b);
            }
            Ok(total)
        })
        .unwrap();
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_transfer() {
        let mut input = ByteArrayInputStream::new(vec![9; 10_000]);
        let mut output = ByteArrayOutputStream::new();
        assert_eq!(transfer(&mut input, &mut output).unwrap(), 10_000);
        assert_eq!(output.size(), 10_000);
    }
}
