//! Core value types for valuekit
//!
//! This crate defines the foundational types used throughout the workspace:
//! - Error: failure taxonomy and `Result` alias
//! - RuntimeConfig: `valuekit.toml` settings
//! - Identity / Comparable: equality-hash contract and natural ordering
//! - Long, Int, Short, Byte: wrapping fixed-width integers
//! - Character: boxed UTF-16 code unit with code-point helpers
//! - Decimal, RoundingMode: arbitrary-precision scaled decimals
//! - Float, Double, Number: precision-tagged boxed numbers
//! - Throwable, StackTraceElement: error values with cause chains

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boxed;
pub mod character;
pub mod config;
pub mod decimal;
pub mod error;
pub mod identity;
pub mod integer;
pub mod throwable;

pub use boxed::{Double, Float, Number};
pub use character::Character;
pub use config::{RuntimeConfig, CONFIG_FILE_NAME};
pub use decimal::{Decimal, RoundingMode};
pub use error::{Error, Result};
pub use identity::{compare_utf16, ordered_hash, string_hash, Comparable, Identity, IdentityKey};
pub use integer::{Byte, Int, Long, Short, MAX_RADIX, MIN_RADIX};
pub use throwable::{StackTraceElement, Throwable};

/// Re-exported so downstream crates share one big-integer type
pub use num_bigint::BigInt;
