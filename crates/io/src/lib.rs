//! Scoped byte streams for valuekit
//!
//! - InputStream / OutputStream: byte-level read and write contracts
//! - ByteArrayInputStream / ByteArrayOutputStream: in-memory streams
//! - ReaderInputStream / WriterOutputStream: `std::io` adapters
//! - Scoped / with_resource: release on every exit path

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod input;
pub mod output;
pub mod scoped;

pub use adapters::{ReaderInputStream, WriterOutputStream};
pub use input::{ByteArrayInputStream, InputStream};
pub use output::{ByteArrayOutputStream, OutputStream};
pub use scoped::{transfer, with_resource, Scoped};

use valuekit_core::Result;

/// A resource released by `close`. Closing twice is harmless.
pub trait Closeable {
    /// Release the resource
    fn close(&mut self) -> Result<()>;
}
