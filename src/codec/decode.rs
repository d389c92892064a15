//! Document value -> typed node

use crate::diagnostics::Diagnostics;
use crate::error::CodecError;
use crate::tree::node::{value_kind, KeyStyle, Node, ShapeMut};
use serde_json::Value;

fn mismatch(type_name: &'static str, value: &Value) -> CodecError {
    CodecError::Mismatch {
        type_name,
        found: value_kind(value),
    }
}

/// Decode a child and report its failure without aborting the parent.
fn decode_child(value: &Value, node: &mut dyn Node, diag: &Diagnostics) {
    if let Err(err) = decode(value, node, diag) {
        diag.report(err);
    }
}

/// Decode `value` into `node`.
///
/// Containers are replaced wholesale: sequences and associations are cleared
/// before the document's children are added. Record fields missing from the
/// document are reset to the record's defaults.
///
/// An error is returned only when `value` does not match `node`'s own shape,
/// in which case `node` is left unchanged. Mismatches further down are sent
/// to `diag` and the affected child keeps its default value.
pub fn decode(value: &Value, node: &mut dyn Node, diag: &Diagnostics) -> Result<(), CodecError> {
    let type_name = node.type_name();
    match node.shape_mut() {
        ShapeMut::Scalar(scalar) => scalar
            .set_from_value(value)
            .map_err(|reason| CodecError::Scalar { type_name, reason }),
        ShapeMut::Sequence(seq) => {
            let Value::Array(items) = value else {
                return Err(mismatch(type_name, value));
            };
            seq.clear();
            for item in items {
                seq.push_with(&mut |element| decode_child(item, element, diag));
            }
            Ok(())
        }
        ShapeMut::Association(map) => match map.key_style() {
            KeyStyle::StringKeyed => {
                let Value::Object(object) = value else {
                    return Err(mismatch(type_name, value));
                };
                map.clear();
                for (key, item) in object {
                    if let Err(err) =
                        map.insert_with(key, &mut |child| decode_child(item, child, diag))
                    {
                        diag.report(err);
                    }
                }
                Ok(())
            }
            KeyStyle::ForeignKeyed => {
                let Value::Array(pairs) = value else {
                    return Err(mismatch(type_name, value));
                };
                map.clear();
                for pair in pairs {
                    match pair.as_array().map(Vec::as_slice) {
                        Some([key, item]) => {
                            if let Err(err) = map
                                .insert_value_with(key, &mut |child| decode_child(item, child, diag))
                            {
                                diag.report(err);
                            }
                        }
                        _ => diag.report(format_args!(
                            "ignoring unexpected map entry in '{}': {}",
                            type_name, pair
                        )),
                    }
                }
                Ok(())
            }
        },
        ShapeMut::Record(rec) => {
            let Value::Object(object) = value else {
                return Err(mismatch(type_name, value));
            };
            for name in rec.field_names() {
                match object.get(*name) {
                    Some(item) => {
                        if let Some(field) = rec.field_mut(name) {
                            if let Err(err) = decode(item, field, diag) {
                                diag.report(err);
                                rec.reset_field(name);
                            }
                        }
                    }
                    None => {
                        if !rec.field_is_default(name) {
                            rec.reset_field(name);
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

/// Decode `value` into a fresh default instance of `T`.
pub fn decode_new<T: Node + Default>(value: &Value, diag: &Diagnostics) -> Result<T, CodecError> {
    let mut node = T::default();
    decode(value, &mut node, diag)?;
    Ok(node)
}
