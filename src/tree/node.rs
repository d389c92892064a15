//! Node classification
//!
//! Every value in a typed tree is a [`Node`]. A node reports its shape as one
//! of four capability traits, and the category is derived from which
//! capability the type implements:
//!
//! - [`Record`]: fixed, named, heterogeneous fields (declared with `record!`)
//! - [`Association`]: keyed, homogeneous children
//! - [`Sequence`]: positional, homogeneous children
//! - [`Scalar`]: a leaf with an explicit document converter
//!
//! The category of a type never changes at runtime.

use crate::error::{CodecError, PathError};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;

/// The four node categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sequence,
    Association,
    Record,
    Scalar,
}

impl Category {
    pub fn is_container(self) -> bool {
        !matches!(self, Category::Scalar)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Sequence => "sequence",
            Category::Association => "association",
            Category::Record => "record",
            Category::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// How an association's keys map onto document object keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStyle {
    /// Keys are strings and become object keys directly.
    StringKeyed,
    /// Keys need conversion; entries are encoded as `[key, value]` pairs.
    ForeignKeyed,
}

/// Read-only view of a node's capability
pub enum Shape<'a> {
    Sequence(&'a dyn Sequence),
    Association(&'a dyn Association),
    Record(&'a dyn Record),
    Scalar(&'a dyn Scalar),
}

impl Shape<'_> {
    pub fn category(&self) -> Category {
        match self {
            Shape::Sequence(_) => Category::Sequence,
            Shape::Association(_) => Category::Association,
            Shape::Record(_) => Category::Record,
            Shape::Scalar(_) => Category::Scalar,
        }
    }
}

/// Mutable view of a node's capability
pub enum ShapeMut<'a> {
    Sequence(&'a mut dyn Sequence),
    Association(&'a mut dyn Association),
    Record(&'a mut dyn Record),
    Scalar(&'a mut dyn Scalar),
}

impl ShapeMut<'_> {
    pub fn category(&self) -> Category {
        match self {
            ShapeMut::Sequence(_) => Category::Sequence,
            ShapeMut::Association(_) => Category::Association,
            ShapeMut::Record(_) => Category::Record,
            ShapeMut::Scalar(_) => Category::Scalar,
        }
    }
}

/// A value that can live in a typed tree
pub trait Node: Any {
    fn shape(&self) -> Shape<'_>;

    fn shape_mut(&mut self) -> ShapeMut<'_>;

    fn category(&self) -> Category {
        self.shape().category()
    }

    /// Human-readable type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Concrete type identity, used together with the address to match nodes.
    fn node_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Report the category of a static node type.
pub fn classify<T: Node + Default>() -> Category {
    T::default().category()
}

/// A leaf convertible to and from the document's primitive value space
pub trait Scalar {
    fn to_value(&self) -> Result<Value, String>;

    /// Replace `self` with the converted value. On failure `self` is unchanged.
    fn set_from_value(&mut self, value: &Value) -> Result<(), String>;
}

/// Positional, homogeneous children
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_>;

    fn get(&self, index: usize) -> Option<&dyn Node> {
        self.elements().nth(index)
    }

    /// Run `visit` on the element at `index`. Returns false if out of bounds.
    fn element_mut(&mut self, index: usize, visit: &mut dyn FnMut(&mut dyn Node)) -> bool;

    /// Run `visit` once on every element with its position at entry.
    fn for_each_mut(&mut self, visit: &mut dyn FnMut(usize, &mut dyn Node)) {
        for index in 0..self.len() {
            self.element_mut(index, &mut |element| visit(index, element));
        }
    }

    fn clear(&mut self);

    /// Append a default-constructed element after `fill` has initialised it.
    fn push_with(&mut self, fill: &mut dyn FnMut(&mut dyn Node));
}

/// Borrowed view of an association key
pub trait KeyNode {
    /// Path segment text for this key.
    fn text(&self) -> String;

    /// Document value used for `[key, value]` pair encoding.
    fn value(&self) -> Result<Value, String>;
}

/// Keyed, homogeneous children
pub trait Association {
    fn key_style(&self) -> KeyStyle;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn KeyNode, &dyn Node)> + '_>;

    /// Text of every key, in iteration order.
    fn key_texts(&self) -> Vec<String> {
        self.entries().map(|(key, _)| key.text()).collect()
    }

    /// Look up a child by its path segment text.
    fn get(&self, key: &str) -> Result<Option<&dyn Node>, PathError>;

    /// Run `visit` on the child at `key`, inserting a default entry first when
    /// `insert` is set. Returns false if the key is absent and was not inserted.
    fn entry_mut(
        &mut self,
        key: &str,
        insert: bool,
        visit: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<bool, PathError>;

    fn clear(&mut self);

    /// Insert a default-constructed child under a textual key after `fill`
    /// has initialised it. An existing entry for the key is kept.
    fn insert_with(
        &mut self,
        key: &str,
        fill: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<(), CodecError>;

    /// Same as [`Association::insert_with`] with the key given as a document value.
    fn insert_value_with(
        &mut self,
        key: &Value,
        fill: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<(), CodecError>;
}

/// Fixed, named, heterogeneous fields
///
/// Implemented through the `record!` macro, which also provides the type's
/// canonical default instance used for diffing.
pub trait Record {
    fn field_names(&self) -> &'static [&'static str];

    fn field(&self, name: &str) -> Option<&dyn Node>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Node>;

    /// Whether the named field equals its value in the default instance.
    fn field_is_default(&self, name: &str) -> bool;

    /// Restore the named field to its value in the default instance.
    fn reset_field(&mut self, name: &str);

    fn fields(&self) -> Vec<(&'static str, &dyn Node)> {
        self.field_names()
            .iter()
            .filter_map(|name| self.field(name).map(|node| (*name, node)))
            .collect()
    }
}

/// Short name for a document value's type, as used in mismatch messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
