//! Typed node -> document value

use crate::diagnostics::Diagnostics;
use crate::error::CodecError;
use crate::tree::node::{KeyStyle, Node, Shape};
use serde_json::{Map, Value};

/// Result of encoding one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// The node produced a non-empty value.
    Content,
    /// The node encoded successfully to an empty array or object.
    Empty,
    /// The node could not be converted; the target holds `null`.
    Failed,
}

impl Encoded {
    pub fn has_content(self) -> bool {
        self == Encoded::Content
    }

    fn from_len(len: usize) -> Self {
        if len == 0 {
            Encoded::Empty
        } else {
            Encoded::Content
        }
    }
}

/// Encode `node` into `out`.
///
/// Records merge into `out` when it already holds an object: fields are
/// written over their keys, fields equal to the record's defaults are removed
/// when `omit_defaults` is set, and keys the record does not know are kept.
/// Every other shape replaces `out`.
pub fn encode_into(
    node: &dyn Node,
    out: &mut Value,
    omit_defaults: bool,
    diag: &Diagnostics,
) -> Encoded {
    match node.shape() {
        Shape::Scalar(scalar) => match scalar.to_value() {
            Ok(value) => {
                *out = value;
                Encoded::Content
            }
            Err(reason) => {
                *out = Value::Null;
                diag.report(CodecError::Encode {
                    type_name: node.type_name(),
                    reason,
                });
                Encoded::Failed
            }
        },
        Shape::Sequence(seq) => {
            let items: Vec<Value> = seq
                .elements()
                .map(|element| {
                    let mut value = Value::Null;
                    encode_into(element, &mut value, omit_defaults, diag);
                    value
                })
                .collect();
            let encoded = Encoded::from_len(items.len());
            *out = Value::Array(items);
            encoded
        }
        Shape::Association(map) => match map.key_style() {
            KeyStyle::StringKeyed => {
                let mut object = Map::new();
                for (key, child) in map.entries() {
                    let mut value = Value::Null;
                    encode_into(child, &mut value, omit_defaults, diag);
                    object.insert(key.text(), value);
                }
                let encoded = Encoded::from_len(object.len());
                *out = Value::Object(object);
                encoded
            }
            KeyStyle::ForeignKeyed => {
                let mut pairs = Vec::with_capacity(map.len());
                for (key, child) in map.entries() {
                    let key = match key.value() {
                        Ok(key) => key,
                        Err(reason) => {
                            diag.report(CodecError::Encode {
                                type_name: node.type_name(),
                                reason: format!("map key '{}': {}", key.text(), reason),
                            });
                            continue;
                        }
                    };
                    let mut value = Value::Null;
                    encode_into(child, &mut value, omit_defaults, diag);
                    pairs.push(Value::Array(vec![key, value]));
                }
                let encoded = Encoded::from_len(pairs.len());
                *out = Value::Array(pairs);
                encoded
            }
        },
        Shape::Record(rec) => {
            if !out.is_object() {
                *out = Value::Object(Map::new());
            }
            let Value::Object(object) = out else {
                return Encoded::Failed;
            };

            for (name, field) in rec.fields() {
                // Start from the previous value so nested records keep
                // keys they do not know about.
                let mut value = object.remove(name).unwrap_or(Value::Null);
                if omit_defaults && rec.field_is_default(name) {
                    continue;
                }
                if encode_into(field, &mut value, omit_defaults, diag) != Encoded::Failed {
                    object.insert(name.to_string(), value);
                }
            }

            Encoded::from_len(object.len())
        }
    }
}

/// Encode `node` into a fresh document value.
pub fn encode(node: &dyn Node, omit_defaults: bool, diag: &Diagnostics) -> Value {
    let mut out = Value::Null;
    encode_into(node, &mut out, omit_defaults, diag);
    out
}
