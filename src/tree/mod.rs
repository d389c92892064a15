//! Typed Trees
//!
//! Classifies native Rust values into sequence, association, record and
//! scalar nodes, and provides generic traversal and path addressing over
//! any tree built from them.

pub mod containers;
pub mod node;
pub mod path;
pub mod record;
pub mod scalar;
pub mod walker;

pub use node::{classify, Category, KeyStyle, Node, Shape, ShapeMut};
pub use path::{resolve, resolve_mut};
pub use record::DefaultSet;
pub use scalar::MapKey;
pub use walker::{join_path, path_to, walk, walk_mut, Traversal};
