//! Identity-keyed collections for valuekit
//!
//! This crate provides the containers and ordering functions built on the
//! `Identity` contract from `valuekit-core`:
//! - Collection: shared membership contract and bulk operations
//! - List / SubList: ordered sequence and its live window
//! - Set: insertion-ordered, duplicate-free
//! - Map: insertion-ordered keys with live key, value and entry views
//! - Stack: LIFO facade over List
//! - Cursor / ListCursor: iteration with in-place removal
//! - Comparator: composable orderings used by `List::sort` and streams

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod comparator;
pub mod cursor;
pub mod list;
pub mod map;
pub mod set;
pub mod stack;

mod table;

pub use collection::Collection;
pub use comparator::Comparator;
pub use cursor::{Cursor, EntryCursor, KeyCursor, ListCursor, SetCursor, TableCursor, ValueCursor};
pub use list::{List, SubList};
pub use map::{EntrySet, KeySet, Map, Values};
pub use set::Set;
pub use stack::Stack;
