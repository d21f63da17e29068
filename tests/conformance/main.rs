//! Conformance suite for the valuekit workspace
//!
//! One module per area. Each module checks the observable contract of its
//! area through the public API only:
//! - numerics: radix round-trips, wrapping, decimal scale rules
//! - identity: equals/hash consistency across value types
//! - collections: list, set, map views, stack, cursor protocol
//! - streams: laziness, single use, collectors, comparators
//! - io: byte streams and scoped release
//! - config: TOML and serde round-trips
//!
//! ```bash
//! cargo test --test conformance
//! ```

mod collections;
mod config;
mod identity;
mod io;
mod numerics;
mod streams;
