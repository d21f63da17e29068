//! valuekit - boxed-value semantics for Rust hosts
//!
//! valuekit gives host code the value semantics of an object runtime with
//! boxed primitives: exact fixed-width integers, arbitrary-precision scaled
//! decimals, precision-tagged floats, an explicit equality/hash contract,
//! identity-keyed collections and lazy single-use streams.
//!
//! # Quick Start
//!
//! ```
//! use valuekit::prelude::*;
//!
//! let mut words: List<String> = List::new();
//! words.add("pear".to_string());
//! words.add("fig".to_string());
//! words.add("apple".to_string());
//!
//! let by_length = words
//!     .stream()
//!     .sorted_by(Comparator::comparing(|w: &String| w.len() as i32))
//!     .collect(collectors::joining_with(", "))?;
//! assert_eq!(by_length, "fig, pear, apple");
//!
//! let total = Decimal::parse("0.10")?.add(&Decimal::parse("0.20")?);
//! assert_eq!(total.to_string(), "0.30");
//! # Ok::<(), valuekit::Error>(())
//! ```
//!
//! # Crates
//!
//! - `valuekit-core`: errors, configuration, identity contract, numerics, throwables
//! - `valuekit-collections`: List, Set, Map, Stack, cursors, Comparator
//! - `valuekit-stream`: Stream, Optional, Collector and collectors
//! - `valuekit-io`: scoped byte streams

pub use valuekit_collections as collections;
pub use valuekit_io as io;
pub use valuekit_stream as stream;

pub use valuekit_core::*;

/// Common imports
pub mod prelude {
    pub use valuekit_collections::{
        Collection, Comparator, Cursor, List, ListCursor, Map, Set, Stack,
    };
    pub use valuekit_core::{
        Byte, Character, Comparable, Decimal, Double, Error, Float, Identity, Int, Long, Number, Result,
        RoundingMode, Short, Throwable,
    };
    pub use valuekit_io::{Closeable, InputStream, OutputStream, Scoped};
    pub use valuekit_stream::{collectors, Collector, Optional, Stream, ToStream};
}
