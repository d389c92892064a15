//! Tree walker for traversing typed trees
//!
//! Visits nodes depth-first, in each container's natural iteration order,
//! passing the slash-delimited path of every visited node.

use crate::tree::node::{Node, Shape, ShapeMut};
use std::ptr;

/// Which nodes a walk reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Scalars only.
    Leaves,
    /// Sequences, associations and records only.
    Containers,
    /// Every node.
    All,
}

impl Traversal {
    fn leaves(self) -> bool {
        matches!(self, Traversal::Leaves | Traversal::All)
    }

    fn containers(self) -> bool {
        matches!(self, Traversal::Containers | Traversal::All)
    }
}

/// Append `segment` to `parent`. The root path is empty, so its children
/// have no leading slash.
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", parent, segment)
    }
}

/// Walk `node` and call `visitor` with the path and node of every match.
pub fn walk(node: &dyn Node, traversal: Traversal, visitor: &mut dyn FnMut(&str, &dyn Node)) {
    walk_at(node, "", traversal, visitor);
}

fn walk_at(
    node: &dyn Node,
    path: &str,
    traversal: Traversal,
    visitor: &mut dyn FnMut(&str, &dyn Node),
) {
    let shape = node.shape();
    if let Shape::Scalar(_) = shape {
        if traversal.leaves() {
            visitor(path, node);
        }
        return;
    }

    if traversal.containers() {
        visitor(path, node);
    }

    match shape {
        Shape::Sequence(seq) => {
            for (index, element) in seq.elements().enumerate() {
                walk_at(element, &join_path(path, &index.to_string()), traversal, visitor);
            }
        }
        Shape::Association(map) => {
            for (key, value) in map.entries() {
                walk_at(value, &join_path(path, &key.text()), traversal, visitor);
            }
        }
        Shape::Record(rec) => {
            for (name, field) in rec.fields() {
                walk_at(field, &join_path(path, name), traversal, visitor);
            }
        }
        Shape::Scalar(_) => {}
    }
}

/// Mutable variant of [`walk`]. The visitor may modify each node; a
/// container is visited before its children, so children reflect the change.
///
/// Every sequence element is visited exactly once. Set elements are reported
/// at their sorted position before the walk and may be reordered by it.
pub fn walk_mut(
    node: &mut dyn Node,
    traversal: Traversal,
    visitor: &mut dyn FnMut(&str, &mut dyn Node),
) {
    walk_mut_at(node, "", traversal, visitor);
}

fn walk_mut_at(
    node: &mut dyn Node,
    path: &str,
    traversal: Traversal,
    visitor: &mut dyn FnMut(&str, &mut dyn Node),
) {
    if !node.category().is_container() {
        if traversal.leaves() {
            visitor(path, node);
        }
        return;
    }

    if traversal.containers() {
        visitor(path, node);
    }

    match node.shape_mut() {
        ShapeMut::Sequence(seq) => {
            seq.for_each_mut(&mut |index, element| {
                walk_mut_at(element, &join_path(path, &index.to_string()), traversal, visitor)
            });
        }
        ShapeMut::Association(map) => {
            for key in map.key_texts() {
                let child = join_path(path, &key);
                // Keys come from the map itself, so they always parse back.
                let _ = map.entry_mut(&key, false, &mut |value| {
                    walk_mut_at(value, &child, traversal, visitor)
                });
            }
        }
        ShapeMut::Record(rec) => {
            for name in rec.field_names() {
                if let Some(field) = rec.field_mut(name) {
                    walk_mut_at(field, &join_path(path, name), traversal, visitor);
                }
            }
        }
        ShapeMut::Scalar(_) => {}
    }
}

/// Find the path of `target` inside `root` by node identity.
///
/// Identity is the node's address together with its concrete type, so a
/// record never matches its own first field. Returns `None` when `target`
/// is not part of the tree.
pub fn path_to(root: &dyn Node, target: &dyn Node) -> Option<String> {
    let address = target as *const dyn Node as *const ();
    let type_id = target.node_type_id();
    let mut found = None;

    walk(root, Traversal::All, &mut |path, node| {
        if found.is_none()
            && node.node_type_id() == type_id
            && ptr::eq(node as *const dyn Node as *const (), address)
        {
            found = Some(path.to_string());
        }
    });

    found
}
