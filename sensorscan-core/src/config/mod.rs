//! Configuration types
//!
//! Board-agnostic acquisition settings. With the `serde` feature enabled the
//! configuration can be decoded from postcard binary data.

pub mod types;

pub use types::*;
