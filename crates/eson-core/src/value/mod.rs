//! Decoded value tree.
//!
//! A decoded [`Document`] borrows from the buffer it was decoded from: keys,
//! strings and binary payloads are slices into the input, so the buffer must
//! outlive the tree.
//!
//! Element order is the encoding order. Duplicate keys are kept; lookups by
//! key return the first match.
//!
//! ## Traversal
//!
//! The [`TreeVisitor`] trait walks a tree depth-first. [`TreePrinter`] uses it
//! to render an indented dump and [`StatsVisitor`] to collect counts.

mod printer;
mod visitor;

use crate::decoder::ValueKind;
use std::ops::Range;

pub use printer::{PrinterConfig, TreePrinter};
pub use visitor::{walk_document, walk_value, NullVisitor, StatsVisitor, TreeVisitor};

/// A single decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// IEEE-754 double
    Float64(f64),
    /// Signed 64-bit integer
    Int64(i64),
    /// Boolean
    Boolean(bool),
    /// UTF-8 text borrowed from the input
    String(&'a str),
    /// Raw bytes borrowed from the input
    Binary(&'a [u8]),
    /// Ordered unkeyed values
    Array(Vec<Value<'a>>),
    /// Ordered keyed elements
    Object(Vec<Element<'a>>),
}

impl<'a> Value<'a> {
    /// Returns the kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float64(_) => ValueKind::Float64,
            Value::Int64(_) => ValueKind::Int64,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Returns the float if this is a `Float64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Boolean`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text if this is a `String`
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the payload if this is a `Binary`
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Value::Binary(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items if this is an `Array`
    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the elements if this is an `Object`
    pub fn as_object(&self) -> Option<&[Element<'a>]> {
        match self {
            Value::Object(elements) => Some(elements.as_slice()),
            _ => None,
        }
    }

    /// Returns true if this is an `Object`
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this is an `Array`
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Looks up the first element with `key` in an object value.
    ///
    /// Returns `None` for missing keys and for non-object values.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.as_object().and_then(|elements| find(elements, key))
    }

    /// Returns the array item at `index`, or `None` if out of range or not an array
    pub fn index(&self, index: usize) -> Option<&Value<'a>> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Number of items in an array or elements in an object, zero for scalars
    pub fn len(&self) -> usize {
        match self {
            Value::Array(items) => items.len(),
            Value::Object(elements) => elements.len(),
            _ => 0,
        }
    }

    /// Returns true if [`len`](Self::len) is zero
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One key/value pair inside an object
#[derive(Debug, Clone, PartialEq)]
pub struct Element<'a> {
    /// Element key, borrowed from the input
    pub key: &'a str,
    /// Element value
    pub value: Value<'a>,
}

impl<'a> Element<'a> {
    /// Creates a new element
    pub fn new(key: &'a str, value: Value<'a>) -> Self {
        Self { key, value }
    }

    /// Returns the kind of the element's value
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

fn find<'e, 'a>(elements: &'e [Element<'a>], key: &str) -> Option<&'e Value<'a>> {
    elements.iter().find(|e| e.key == key).map(|e| &e.value)
}

/// The decoded root object
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    elements: Vec<Element<'a>>,
    extent: Range<usize>,
    terminated: bool,
}

impl<'a> Document<'a> {
    pub(crate) fn new(elements: Vec<Element<'a>>, extent: Range<usize>, terminated: bool) -> Self {
        Self {
            elements,
            extent,
            terminated,
        }
    }

    /// Returns the elements in encoding order
    pub fn elements(&self) -> &[Element<'a>] {
        &self.elements
    }

    /// Declared byte range of the root object in the input.
    ///
    /// This is the range announced by the size header. It can extend past the
    /// end of the buffer when decoding stopped at an early end marker.
    pub fn extent(&self) -> Range<usize> {
        self.extent.clone()
    }

    /// Returns true if the root object ended on an explicit end marker
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Looks up the first element with `key`
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        find(&self.elements, key)
    }

    /// Returns true if any element has `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.elements.iter().any(|e| e.key == key)
    }

    /// Iterates over keys in encoding order, duplicates included
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.elements.iter().map(|e| e.key)
    }

    /// Iterates over elements in encoding order
    pub fn iter(&self) -> std::slice::Iter<'_, Element<'a>> {
        self.elements.iter()
    }

    /// Number of top-level elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the root object has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Converts the document into an `Object` value
    pub fn into_value(self) -> Value<'a> {
        Value::Object(self.elements)
    }
}

impl<'d, 'a> IntoIterator for &'d Document<'a> {
    type Item = &'d Element<'a>;
    type IntoIter = std::slice::Iter<'d, Element<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
