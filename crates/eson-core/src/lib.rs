//! # eson-core
//!
//! A zero-copy decoder for ESON, a length-prefixed binary document format.
//!
//! An ESON document is an object: a 64-bit size header followed by a sequence
//! of elements, each made of a one-byte type tag, a NUL-terminated UTF-8 key
//! and a typed value. Values can be numbers, booleans, strings, binary blobs,
//! arrays or nested objects.
//!
//! ## Architecture
//!
//! - [`decoder`]: Wire format readers and the recursive document decoder
//! - [`value`]: The decoded tree, traversal and printing
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use eson_core::{Decoder, Value};
//!
//! // { "ok": true }
//! let buf = [14, 0, 0, 0, 0, 0, 0, 0, 3, b'o', b'k', 0, 1, 0];
//!
//! let doc = Decoder::new().decode(&buf)?;
//! assert_eq!(doc.get("ok"), Some(&Value::Boolean(true)));
//! # Ok::<(), eson_core::Error>(())
//! ```
//!
//! Strings, binary payloads and keys in the decoded tree borrow from the
//! input buffer.
//!
//! ## Extensibility
//!
//! - [`TreeVisitor`]: Walk a decoded tree depth-first
//! - [`DecoderConfig`]: Nesting limit, strict framing and array layout
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod decoder;
pub mod error;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience
pub use decoder::{
    decode, decode_at, ArrayLayout, Decoder, DecoderConfig, ObjectFraming, ValueKind,
    DEFAULT_MAX_DEPTH,
};
pub use error::{Error, Result};
pub use value::{
    Document, Element, NullVisitor, PrinterConfig, StatsVisitor, TreePrinter, TreeVisitor, Value,
};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
