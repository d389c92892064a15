//! Change-set collection
//!
//! Builds the path -> JSON text map published by `get_all` and change
//! notifications. Sequences are published whole because positions shift on
//! partial updates. Non-empty associations publish one entry per key so each
//! can be applied on its own, while an empty association publishes itself so
//! receivers drop cached children.

use crate::bridge::{AccessFilter, AccessType, ValueMap};
use crate::codec::encode;
use crate::diagnostics::Diagnostics;
use crate::tree::node::{Node, Shape};
use crate::tree::walker::join_path;

pub(crate) struct ValuesBuilder<'a> {
    filter: Option<&'a AccessFilter>,
    diagnostics: &'a Diagnostics,
    values: ValueMap,
}

impl<'a> ValuesBuilder<'a> {
    pub(crate) fn new(filter: Option<&'a AccessFilter>, diagnostics: &'a Diagnostics) -> Self {
        Self {
            filter,
            diagnostics,
            values: ValueMap::new(),
        }
    }

    /// Collect `node`, which lives at `path`.
    pub(crate) fn collect(&mut self, path: &str, node: &dyn Node) {
        match node.shape() {
            Shape::Association(map) if !map.is_empty() => {
                for (key, child) in map.entries() {
                    self.collect(&join_path(path, &key.text()), child);
                }
            }
            Shape::Record(rec) => {
                for (name, field) in rec.fields() {
                    self.collect(&join_path(path, name), field);
                }
            }
            _ => self.push(path, node),
        }
    }

    fn push(&mut self, path: &str, node: &dyn Node) {
        if let Some(filter) = self.filter {
            if !filter(path, AccessType::Read) {
                return;
            }
        }
        let value = encode(node, false, self.diagnostics);
        self.values.insert(path.to_string(), value.to_string());
    }

    pub(crate) fn finish(self) -> ValueMap {
        self.values
    }
}
