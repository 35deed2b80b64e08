//! Error types for the eson-core library.
//!
//! Every variant records the byte offset at which decoding stopped, so a
//! caller can point at the offending region of the input buffer.

use thiserror::Error;

/// Result type alias for eson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all decoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A read would run past the end of the buffer
    #[error("read of {needed} bytes at offset {offset} exceeds buffer length {available}")]
    OutOfBounds {
        /// Byte offset where the read started
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Total length of the buffer
        available: usize,
    },

    /// A key or string payload is not valid UTF-8
    #[error("invalid UTF-8 at offset {offset}: {source}")]
    InvalidUtf8 {
        /// Byte offset of the start of the text
        offset: usize,
        /// Underlying UTF-8 error
        #[source]
        source: std::str::Utf8Error,
    },

    /// Element tag byte outside the known tag table
    #[error("unknown element tag 0x{tag:02x} at offset {offset}")]
    UnknownElementTag {
        /// The tag byte
        tag: u8,
        /// Byte offset of the tag
        offset: usize,
    },

    /// Size header whose high 32-bit word is non-zero
    #[error("unsupported size at offset {offset}: high word 0x{high:08x} is non-zero")]
    UnsupportedSize {
        /// Byte offset of the size header
        offset: usize,
        /// The rejected high word
        high: u32,
    },

    /// Objects or arrays nested beyond the configured limit
    #[error("nesting exceeds maximum depth {max} at offset {offset}")]
    NestingTooDeep {
        /// Byte offset of the container that tripped the limit
        offset: usize,
        /// Configured maximum depth
        max: usize,
    },

    /// Container reached its declared extent without an End tag (strict mode)
    #[error("missing end marker before offset {offset}")]
    MissingTerminator {
        /// Offset where the terminator was expected
        offset: usize,
    },

    /// An element ran past its container's declared extent (strict mode)
    #[error("element data runs to offset {offset}, past container extent {extent_end}")]
    ExtentOverrun {
        /// Offset reached by the last element
        offset: usize,
        /// End of the container's declared extent
        extent_end: usize,
    },
}

impl Error {
    /// Creates a new out-of-bounds error
    pub fn out_of_bounds(offset: usize, needed: usize, available: usize) -> Self {
        Self::OutOfBounds {
            offset,
            needed,
            available,
        }
    }

    /// Creates a new UTF-8 error
    pub fn invalid_utf8(offset: usize, source: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8 { offset, source }
    }

    /// Creates a new unknown tag error
    pub fn unknown_tag(tag: u8, offset: usize) -> Self {
        Self::UnknownElementTag { tag, offset }
    }

    /// Creates a new unsupported size error
    pub fn unsupported_size(offset: usize, high: u32) -> Self {
        Self::UnsupportedSize { offset, high }
    }

    /// Creates a new nesting error
    pub fn nesting_too_deep(offset: usize, max: usize) -> Self {
        Self::NestingTooDeep { offset, max }
    }

    /// Returns the byte offset the error refers to
    pub fn offset(&self) -> usize {
        match self {
            Self::OutOfBounds { offset, .. }
            | Self::InvalidUtf8 { offset, .. }
            | Self::UnknownElementTag { offset, .. }
            | Self::UnsupportedSize { offset, .. }
            | Self::NestingTooDeep { offset, .. }
            | Self::MissingTerminator { offset }
            | Self::ExtentOverrun { offset, .. } => *offset,
        }
    }

    /// Returns true if the input simply ended too early
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
