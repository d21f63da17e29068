//! Error types for valuekit
//!
//! This module defines the failure taxonomy shared by every crate in the
//! workspace. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! ## Taxonomy
//!
//! - **Format**: malformed numeric text for the given radix or scale
//! - **Arithmetic**: division by zero, non-terminating exact division,
//!   rounding required under `RoundingMode::Unnecessary`, exact conversion overflow
//! - **IllegalState**: stream reuse, cursor `remove`/`set` out of protocol
//! - **NoSuchElement**: absent `Optional` access, exhausted cursor, empty stack
//! - **IndexOutOfRange**: out-of-bounds list or buffer access
//! - **IllegalArgument**: argument outside its documented domain
//! - **Io**: byte-stream failures
//! - **Config**: unreadable or malformed runtime configuration

use std::io;
use thiserror::Error;

/// Result type alias for valuekit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the valuekit runtime
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed numeric text
    #[error("{0}")]
    Format(String),

    /// Arithmetic precondition violated
    #[error("{0}")]
    Arithmetic(String),

    /// Operation invoked in a state that does not permit it
    #[error("{0}")]
    IllegalState(String),

    /// Requested element does not exist
    #[error("{0}")]
    NoSuchElement(String),

    /// Index outside the valid range
    #[error("Index: {index}, Size: {size}")]
    IndexOutOfRange {
        /// Offending index
        index: i64,
        /// Size of the addressed sequence
        size: usize,
    },

    /// Argument outside its documented domain
    #[error("{0}")]
    IllegalArgument(String),

    /// Byte-stream failure
    #[error("{0}")]
    Io(String),

    /// Runtime configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// Create an arithmetic error
    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Error::Arithmetic(msg.into())
    }

    /// Create an illegal-state error
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Error::IllegalState(msg.into())
    }

    /// Create a no-such-element error
    pub fn no_such_element(msg: impl Into<String>) -> Self {
        Error::NoSuchElement(msg.into())
    }

    /// Create an index-out-of-range error
    pub fn index_out_of_range(index: impl TryInto<i64>, size: usize) -> Self {
        Error::IndexOutOfRange {
            index: index.try_into().unwrap_or(i64::MAX),
            size,
        }
    }

    /// Create an illegal-argument error
    pub fn illegal_argument(msg: impl Into<String>) -> Self {
        Error::IllegalArgument(msg.into())
    }

    /// Create an I/O error
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// Canonical kind name, used as the `kind` of a [`crate::Throwable`]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Format(_) => "FormatError",
            Error::Arithmetic(_) => "ArithmeticError",
            Error::IllegalState(_) => "IllegalStateError",
            Error::NoSuchElement(_) => "NoSuchElementError",
            Error::IndexOutOfRange { .. } => "IndexOutOfRangeError",
            Error::IllegalArgument(_) => "IllegalArgumentError",
            Error::Io(_) => "IoError",
            Error::Config(_) => "ConfigError",
        }
    }

    /// Check whether this is an arithmetic error
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Error::Arithmetic(_))
    }

    /// Check whether this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// Check whether this is an illegal-state error
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Error::IllegalState(_))
    }

    /// Check whether this is a no-such-element error
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Error::NoSuchElement(_))
    }

    /// Check whether this is an index-out-of-range error
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Error::IndexOutOfRange { .. })
    }

    /// Check whether this is an illegal-argument error
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, Error::IllegalArgument(_))
    }

    /// Check whether this is an I/O error
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
