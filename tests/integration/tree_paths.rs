//! Integration tests for classification, traversal and path addressing

use super::test_utils::Sample;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use treestore::tree::node::ShapeMut;
use treestore::tree::{classify, path_to, resolve, resolve_mut, walk, walk_mut, Traversal};
use treestore::{Category, Node, PathError};

#[derive(Debug, Clone, PartialEq, Default)]
struct Inventory {
    owner: Option<String>,
    bins: Vec<BTreeSet<u16>>,
    labels: HashMap<char, Sample>,
}

treestore::record!(Inventory { owner, bins, labels });

fn inventory() -> Inventory {
    Inventory {
        owner: Some("ops".to_string()),
        bins: vec![[3, 1].into_iter().collect(), BTreeSet::new()],
        labels: [('a', Sample::default())].into_iter().collect(),
    }
}

fn leaf_paths(node: &dyn Node) -> Vec<String> {
    let mut paths = Vec::new();
    walk(node, Traversal::Leaves, &mut |path, _| paths.push(path.to_string()));
    paths
}

#[test]
fn test_classification() {
    assert_eq!(classify::<Inventory>(), Category::Record);
    assert_eq!(classify::<Vec<BTreeSet<u16>>>(), Category::Sequence);
    assert_eq!(classify::<HashMap<char, Sample>>(), Category::Association);
    assert_eq!(classify::<Option<String>>(), Category::Scalar);
}

#[test]
fn test_walk_nested_containers() {
    let paths = leaf_paths(&inventory());
    assert_eq!(
        paths,
        vec![
            "owner",
            "bins/0/0",
            "bins/0/1",
            "labels/a/b",
            "labels/a/s",
            "labels/a/i",
            "labels/a/j",
            "labels/a/m/x",
            "labels/a/m/y",
        ]
    );

    let mut containers = Vec::new();
    walk(&inventory(), Traversal::Containers, &mut |path, node| {
        containers.push((path.to_string(), node.category()))
    });
    assert_eq!(containers[0], (String::new(), Category::Record));
    assert!(containers.contains(&("bins/1".to_string(), Category::Sequence)));
    assert!(containers.contains(&("labels/a/m2".to_string(), Category::Association)));
}

#[test]
fn test_every_walked_path_resolves_to_the_same_node() {
    let tree = inventory();
    let mut visited = Vec::new();
    walk(&tree, Traversal::All, &mut |path, node| {
        visited.push((path.to_string(), node as *const dyn Node as *const ()))
    });

    for (path, address) in visited {
        let mut hit = None;
        assert_eq!(
            resolve(&tree, &path, &mut |node| hit = Some(node as *const dyn Node as *const ())),
            Ok(true),
            "path {:?}",
            path
        );
        assert_eq!(hit, Some(address));
    }
}

#[test]
fn test_resolve_through_set_and_char_keys() {
    let mut tree = inventory();

    let found = resolve_mut(&mut tree, "bins/0/0", false, &mut |node| {
        if let ShapeMut::Scalar(scalar) = node.shape_mut() {
            scalar.set_from_value(&serde_json::json!(10)).unwrap();
        }
    });
    assert_eq!(found, Ok(true));
    assert_eq!(tree.bins[0].iter().copied().collect::<Vec<_>>(), vec![3, 10]);

    assert_eq!(resolve_mut(&mut tree, "labels/b/i", true, &mut |_| {}), Ok(true));
    assert!(tree.labels.contains_key(&'b'));

    let err = resolve(&tree, "labels/ab", &mut |_| {}).unwrap_err();
    assert!(matches!(err, PathError::MalformedKey { .. }));
}

#[test]
fn test_optional_scalar_has_no_children() {
    let tree = inventory();
    let err = resolve(&tree, "owner/name", &mut |_| {}).unwrap_err();
    assert!(matches!(err, PathError::Unreachable { .. }));
}

#[test]
fn test_walk_mut_and_reverse_lookup() {
    let mut tree = inventory();
    walk_mut(&mut tree, Traversal::Leaves, &mut |path, node| {
        if path.ends_with("/i") {
            if let ShapeMut::Scalar(scalar) = node.shape_mut() {
                scalar.set_from_value(&serde_json::json!(1)).unwrap();
            }
        }
    });
    assert_eq!(tree.labels[&'a'].i, 1);

    let sample = &tree.labels[&'a'];
    assert_eq!(path_to(&tree, sample).as_deref(), Some("labels/a"));
    assert_eq!(path_to(&tree, &sample.m).as_deref(), Some("labels/a/m"));

    let by_name: BTreeMap<String, Sample> = BTreeMap::new();
    assert_eq!(path_to(&tree, &by_name), None);
}
