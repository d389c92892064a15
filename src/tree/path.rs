//! Path resolution
//!
//! Paths are `/`-separated segments relative to a tree root; the empty path
//! is the root itself. A segment is an element index inside a sequence, a
//! key inside an association, or a field name inside a record.

use crate::error::PathError;
use crate::tree::node::{Node, Shape, ShapeMut};

/// Split the first segment from the remainder of `path`.
///
/// A trailing slash is rejected; a leading slash yields an empty first
/// segment, which the caller rejects according to the node's category.
pub fn split_path(path: &str) -> Result<(&str, &str), PathError> {
    match path.split_once('/') {
        None => Ok((path, "")),
        Some((head, "")) => Err(PathError::TrailingSlash(head.to_string())),
        Some((head, rest)) => Ok((head, rest)),
    }
}

/// Parse a sequence index: base-10 digits only, no sign.
fn parse_index(segment: &str) -> Result<usize, PathError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::MalformedIndex(segment.to_string()));
    }
    segment
        .parse()
        .map_err(|_| PathError::MalformedIndex(segment.to_string()))
}

fn unreachable_segment(node: &dyn Node, path: &str) -> PathError {
    PathError::Unreachable {
        path: path.to_string(),
        type_name: node.type_name(),
    }
}

/// Resolve `path` against `node` and call `visitor` on the addressed node.
///
/// Returns `Ok(false)` when the path is well-formed but does not exist.
/// Never modifies the tree.
pub fn resolve(
    node: &dyn Node,
    path: &str,
    visitor: &mut dyn FnMut(&dyn Node),
) -> Result<bool, PathError> {
    if path.is_empty() {
        visitor(node);
        return Ok(true);
    }

    match node.shape() {
        Shape::Scalar(_) => Err(unreachable_segment(node, path)),
        Shape::Sequence(seq) => {
            let (segment, rest) = split_path(path)?;
            let index = parse_index(segment)?;
            match seq.get(index) {
                Some(element) => resolve(element, rest, visitor),
                None => Ok(false),
            }
        }
        Shape::Association(map) => {
            let (segment, rest) = split_path(path)?;
            if segment.is_empty() {
                return Err(PathError::EmptyKey);
            }
            match map.get(segment)? {
                Some(value) => resolve(value, rest, visitor),
                None => Ok(false),
            }
        }
        Shape::Record(rec) => {
            let (segment, rest) = split_path(path)?;
            match rec.field(segment) {
                Some(field) => resolve(field, rest, visitor),
                None => Ok(false),
            }
        }
    }
}

/// Resolve `path` against `node` and call `visitor` with mutable access.
///
/// With `insert_missing`, absent association keys along the path are
/// created with default values. Inserted entries stay in place even when
/// resolution fails further down the path. Sequences never grow.
pub fn resolve_mut(
    node: &mut dyn Node,
    path: &str,
    insert_missing: bool,
    visitor: &mut dyn FnMut(&mut dyn Node),
) -> Result<bool, PathError> {
    if path.is_empty() {
        visitor(node);
        return Ok(true);
    }

    if !node.category().is_container() {
        return Err(unreachable_segment(node, path));
    }

    let (segment, rest) = split_path(path)?;
    let mut result = Ok(false);

    match node.shape_mut() {
        ShapeMut::Sequence(seq) => {
            let index = parse_index(segment)?;
            seq.element_mut(index, &mut |element| {
                result = resolve_mut(element, rest, insert_missing, visitor);
            });
        }
        ShapeMut::Association(map) => {
            if segment.is_empty() {
                return Err(PathError::EmptyKey);
            }
            map.entry_mut(segment, insert_missing, &mut |value| {
                result = resolve_mut(value, rest, insert_missing, visitor);
            })?;
        }
        ShapeMut::Record(rec) => {
            if let Some(field) = rec.field_mut(segment) {
                result = resolve_mut(field, rest, insert_missing, visitor);
            }
        }
        ShapeMut::Scalar(_) => {}
    }

    result
}
