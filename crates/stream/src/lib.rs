//! Lazy streams and reductions for valuekit
//!
//! - Stream: single-use pipeline of recorded stages, run by a terminal op
//! - ToStream: stream over a snapshot of a collection
//! - Optional: present-or-absent result of `find_first`, `min`, `reduce`
//! - Collector / collectors: mutable reductions (lists, maps, grouping)
//! - Predicate / Function: shareable, composable function values

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collector;
pub mod collectors;
pub mod functional;
pub mod optional;
pub mod sources;
pub mod stream;

pub use collector::{Characteristics, Collector};
pub use functional::{Function, Predicate};
pub use optional::Optional;
pub use sources::ToStream;
pub use stream::{StageKind, Stream, StreamIterator};

/// Orderings accepted by `sorted_by`, `min` and `max`
pub use valuekit_collections::Comparator;
