//! Depth-first traversal over decoded trees.
//!
//! This module provides the [`TreeVisitor`] trait for consumers that want to
//! react to each node of a decoded tree without matching on [`Value`] by hand.

use super::{Document, Value};
use std::fmt::Result;

/// Trait for receiving the nodes of a decoded tree.
///
/// Every hook receives the key of the element being visited, or `None` for
/// the root object and for array items. All hooks default to doing nothing.
///
/// # Example
///
/// ```
/// use eson_core::value::{walk_document, TreeVisitor, Value};
///
/// struct KeyCollector(Vec<String>);
///
/// impl TreeVisitor for KeyCollector {
///     fn visit_scalar(&mut self, key: Option<&str>, _value: &Value<'_>) -> std::fmt::Result {
///         if let Some(key) = key {
///             self.0.push(key.to_string());
///         }
///         Ok(())
///     }
/// }
///
/// let buf = [14, 0, 0, 0, 0, 0, 0, 0, 3, b'o', b'k', 0, 1, 0];
/// let doc = eson_core::decode(&buf)?;
/// let mut keys = KeyCollector(Vec::new());
/// walk_document(&doc, &mut keys).unwrap();
/// assert_eq!(keys.0, vec!["ok"]);
/// # Ok::<(), eson_core::Error>(())
/// ```
pub trait TreeVisitor {
    /// Called before the elements of an object
    fn enter_object(&mut self, key: Option<&str>, len: usize) -> Result {
        let _ = (key, len);
        Ok(())
    }

    /// Called after the elements of an object
    fn leave_object(&mut self, key: Option<&str>) -> Result {
        let _ = key;
        Ok(())
    }

    /// Called before the items of an array
    fn enter_array(&mut self, key: Option<&str>, len: usize) -> Result {
        let _ = (key, len);
        Ok(())
    }

    /// Called after the items of an array
    fn leave_array(&mut self, key: Option<&str>) -> Result {
        let _ = key;
        Ok(())
    }

    /// Called for every non-container value
    fn visit_scalar(&mut self, key: Option<&str>, value: &Value<'_>) -> Result {
        let _ = (key, value);
        Ok(())
    }
}

/// Walk a whole document, root object included.
pub fn walk_document<V: TreeVisitor + ?Sized>(doc: &Document<'_>, visitor: &mut V) -> Result {
    visitor.enter_object(None, doc.len())?;
    for element in doc {
        walk_value(Some(element.key), &element.value, visitor)?;
    }
    visitor.leave_object(None)
}

/// Walk a single value and everything nested below it.
pub fn walk_value<V: TreeVisitor + ?Sized>(
    key: Option<&str>,
    value: &Value<'_>,
    visitor: &mut V,
) -> Result {
    match value {
        Value::Object(elements) => {
            visitor.enter_object(key, elements.len())?;
            for element in elements {
                walk_value(Some(element.key), &element.value, visitor)?;
            }
            visitor.leave_object(key)
        }
        Value::Array(items) => {
            visitor.enter_array(key, items.len())?;
            for item in items {
                walk_value(None, item, visitor)?;
            }
            visitor.leave_array(key)
        }
        scalar => visitor.visit_scalar(key, scalar),
    }
}

/// A no-op visitor
pub struct NullVisitor;

impl TreeVisitor for NullVisitor {}

/// A visitor that collects statistics about a tree
#[derive(Debug, Default)]
pub struct StatsVisitor {
    /// Number of objects, root included
    pub object_count: usize,
    /// Number of arrays
    pub array_count: usize,
    /// Number of scalar values
    pub scalar_count: usize,
    /// Total size of all binary payloads
    pub binary_bytes: usize,
    /// Deepest container nesting seen (root object is 1)
    pub max_depth: usize,
    depth: usize,
}

impl StatsVisitor {
    fn enter(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl TreeVisitor for StatsVisitor {
    fn enter_object(&mut self, _key: Option<&str>, _len: usize) -> Result {
        self.object_count += 1;
        self.enter();
        Ok(())
    }

    fn leave_object(&mut self, _key: Option<&str>) -> Result {
        self.leave();
        Ok(())
    }

    fn enter_array(&mut self, _key: Option<&str>, _len: usize) -> Result {
        self.array_count += 1;
        self.enter();
        Ok(())
    }

    fn leave_array(&mut self, _key: Option<&str>) -> Result {
        self.leave();
        Ok(())
    }

    fn visit_scalar(&mut self, _key: Option<&str>, value: &Value<'_>) -> Result {
        self.scalar_count += 1;
        if let Value::Binary(bytes) = value {
            self.binary_bytes += bytes.len();
        }
        Ok(())
    }
}
