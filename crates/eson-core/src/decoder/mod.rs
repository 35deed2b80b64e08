//! Recursive decoder for ESON documents.
//!
//! ## Algorithm Overview
//!
//! 1. Read the 8-byte size header of the root object. The declared size `N`
//!    counts the header itself, so the object occupies `[start, start + N)`.
//!    A size of zero is an empty object; any other size below 8 spans the
//!    header alone.
//! 2. Read elements (tag, key, value) until an end marker or until the
//!    cursor reaches the declared extent.
//! 3. Objects and arrays recurse through the same loop with a depth counter
//!    one higher than their parent.
//! 4. Under [`ObjectFraming::TerminatorExcluded`], an object that reaches its
//!    extent takes a `0x00` right after it as its end marker.
//!
//! Every reader returns how many bytes it consumed; the loop adds that to its
//! own cursor. No offset is shared between nesting levels.
//!
//! ## Configuration
//!
//! ```
//! use eson_core::{ArrayLayout, Decoder, DecoderConfig};
//!
//! let config = DecoderConfig::new()
//!     .max_depth(16)
//!     .strict(true)
//!     .array_layout(ArrayLayout::Tagged);
//! let decoder = Decoder::with_config(config);
//!
//! let buf = [14, 0, 0, 0, 0, 0, 0, 0, 3, b'o', b'k', 0, 1, 0];
//! let doc = decoder.decode(&buf)?;
//! assert_eq!(doc.get("ok").and_then(|v| v.as_bool()), Some(true));
//! # Ok::<(), eson_core::Error>(())
//! ```

mod wire;

use crate::error::{Error, Result};
use crate::value::{Document, Element, Value};
use std::ops::Range;
use tracing::{debug, trace};

pub use wire::{
    read_f64_le, read_i64_le, read_key, read_payload, read_size, read_string, read_tag, read_u32_le,
    read_u8, ValueKind, SIZE_HEADER_LEN,
};

/// Default nesting limit; the root object counts as depth 1
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How array items are framed on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrayLayout {
    /// Each item is an element tag followed by its value, no key
    #[default]
    Tagged,
    /// Each item carries a key like an object element ("0", "1", ...);
    /// the keys are validated and discarded
    Indexed,
}

/// Whether an object's declared size counts its end marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectFraming {
    /// The end marker lies inside `[start, start + size)`
    #[default]
    TerminatorIncluded,
    /// The end marker is the byte right after `start + size`; an object that
    /// reaches its extent consumes one following `0x00` as its end marker
    TerminatorExcluded,
}

/// Configuration for the decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum container nesting depth (root object = 1)
    pub max_depth: usize,
    /// Require an explicit end marker in every object and array
    pub strict: bool,
    /// Framing of array items
    pub array_layout: ArrayLayout,
    /// Placement of an object's end marker relative to its declared size
    pub object_framing: ObjectFraming,
    /// Drop one trailing NUL byte from string payloads
    pub trim_string_nul: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
            array_layout: ArrayLayout::Tagged,
            object_framing: ObjectFraming::TerminatorIncluded,
            trim_string_nul: false,
        }
    }
}

impl DecoderConfig {
    /// Creates a new decoder config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets whether containers must end with an explicit end marker
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the array item framing
    pub fn array_layout(mut self, layout: ArrayLayout) -> Self {
        self.array_layout = layout;
        self
    }

    /// Sets where object end markers are expected
    pub fn object_framing(mut self, framing: ObjectFraming) -> Self {
        self.object_framing = framing;
        self
    }

    /// Sets whether a trailing NUL is stripped from strings
    pub fn trim_string_nul(mut self, trim: bool) -> Self {
        self.trim_string_nul = trim;
        self
    }
}

/// A decoded object or array body
struct Sequence<T> {
    items: Vec<T>,
    extent: Range<usize>,
    consumed: usize,
    terminated: bool,
}

/// ESON document decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a new decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new decoder with custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Returns the decoder configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the document starting at the beginning of `data`
    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<Document<'a>> {
        self.decode_at(data, 0)
    }

    /// Decode the document starting at `offset`
    pub fn decode_at<'a>(&self, data: &'a [u8], offset: usize) -> Result<Document<'a>> {
        debug!("Decoding document at offset {} of {} bytes", offset, data.len());

        let root = self.read_object(data, offset, 1)?;

        debug!(
            "Decoded {} top-level elements ({} bytes consumed)",
            root.items.len(),
            root.consumed
        );
        Ok(Document::new(root.items, root.extent, root.terminated))
    }

    /// Decode the value of kind `kind` whose payload starts at `offset`.
    ///
    /// `depth` is the depth of the enclosing container.
    fn read_value<'a>(
        &self,
        data: &'a [u8],
        kind: ValueKind,
        offset: usize,
        depth: usize,
    ) -> Result<(Value<'a>, usize)> {
        match kind {
            ValueKind::Float64 => {
                let (v, len) = wire::read_f64_le(data, offset)?;
                Ok((Value::Float64(v), len))
            }
            ValueKind::Int64 => {
                let (v, len) = wire::read_i64_le(data, offset)?;
                Ok((Value::Int64(v), len))
            }
            ValueKind::Boolean => {
                let (v, len) = wire::read_u8(data, offset)?;
                Ok((Value::Boolean(v != 0), len))
            }
            ValueKind::String => {
                let (mut text, len) = wire::read_string(data, offset)?;
                if self.config.trim_string_nul {
                    text = text.strip_suffix('\0').unwrap_or(text);
                }
                Ok((Value::String(text), len))
            }
            ValueKind::Binary => {
                let (bytes, len) = wire::read_payload(data, offset)?;
                Ok((Value::Binary(bytes), len))
            }
            ValueKind::Array => {
                let array = self.read_array(data, offset, depth + 1)?;
                Ok((Value::Array(array.items), array.consumed))
            }
            ValueKind::Object => {
                let object = self.read_object(data, offset, depth + 1)?;
                Ok((Value::Object(object.items), object.consumed))
            }
            // read_sequence stops on end markers and never hands them to read_item
            ValueKind::End => unreachable!("end marker dispatched as a value"),
        }
    }

    fn read_object<'a>(
        &self,
        data: &'a [u8],
        offset: usize,
        depth: usize,
    ) -> Result<Sequence<Element<'a>>> {
        let trailing_end = self.config.object_framing == ObjectFraming::TerminatorExcluded;
        self.read_sequence(data, offset, depth, trailing_end, |kind, pos| {
            let (key, key_len) = wire::read_key(data, pos)?;
            let (value, value_len) = self.read_value(data, kind, pos + key_len, depth)?;
            trace!("Element '{}' ({}) at offset {}", key, kind, pos);
            Ok((Element::new(key, value), key_len + value_len))
        })
    }

    fn read_array<'a>(
        &self,
        data: &'a [u8],
        offset: usize,
        depth: usize,
    ) -> Result<Sequence<Value<'a>>> {
        let layout = self.config.array_layout;
        self.read_sequence(data, offset, depth, false, |kind, pos| {
            let key_len = match layout {
                ArrayLayout::Tagged => 0,
                ArrayLayout::Indexed => wire::read_key(data, pos)?.1,
            };
            let (value, value_len) = self.read_value(data, kind, pos + key_len, depth)?;
            Ok((value, key_len + value_len))
        })
    }

    /// Shared framing for objects and arrays.
    ///
    /// `read_item` is called with the kind of each non-end tag and the offset
    /// just past it, and returns the item with the bytes it consumed.
    /// With `trailing_end` set, a container that reaches its extent without an
    /// end marker takes a `0x00` at the extent as its end marker.
    fn read_sequence<T, F>(
        &self,
        data: &[u8],
        offset: usize,
        depth: usize,
        trailing_end: bool,
        mut read_item: F,
    ) -> Result<Sequence<T>>
    where
        F: FnMut(ValueKind, usize) -> Result<(T, usize)>,
    {
        if depth > self.config.max_depth {
            return Err(Error::nesting_too_deep(offset, self.config.max_depth));
        }

        let (declared, header_len) = wire::read_size(data, offset)?;
        if declared == 0 {
            trace!("Empty container at offset {}", offset);
            return Ok(Sequence {
                items: Vec::new(),
                extent: offset..offset + header_len,
                consumed: header_len,
                terminated: false,
            });
        }

        // A size smaller than the header still spans the header
        let extent_end = usize::try_from(declared)
            .ok()
            .and_then(|n| offset.checked_add(n.max(header_len)))
            .ok_or_else(|| Error::out_of_bounds(offset, usize::MAX, data.len()))?;

        let mut cursor = offset + header_len;
        let mut items = Vec::new();
        let mut terminated = false;

        while cursor < extent_end {
            let (kind, tag_len) = wire::read_tag(data, cursor)?;
            if kind == ValueKind::End {
                cursor += tag_len;
                terminated = true;
                break;
            }

            let (item, item_len) = read_item(kind, cursor + tag_len)?;
            items.push(item);
            cursor += tag_len + item_len;
        }

        if self.config.strict && cursor > extent_end {
            return Err(Error::ExtentOverrun {
                offset: cursor,
                extent_end,
            });
        }

        if trailing_end
            && !terminated
            && cursor == extent_end
            && data.get(cursor) == Some(&ValueKind::End.tag())
        {
            cursor += 1;
            terminated = true;
        }

        if self.config.strict && !terminated {
            return Err(Error::MissingTerminator { offset: cursor });
        }

        if !terminated {
            trace!(
                "Container at offset {} reached its extent without an end marker",
                offset
            );
        }

        Ok(Sequence {
            items,
            extent: offset..extent_end,
            consumed: cursor.max(extent_end) - offset,
            terminated,
        })
    }
}

/// Decode a document from the start of `data` with the default configuration
pub fn decode(data: &[u8]) -> Result<Document<'_>> {
    Decoder::new().decode(data)
}

/// Decode a document starting at `offset` with the default configuration
pub fn decode_at(data: &[u8], offset: usize) -> Result<Document<'_>> {
    Decoder::new().decode_at(data, offset)
}
