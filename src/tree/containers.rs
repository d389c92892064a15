//! Sequence and association implementations for standard collections

use crate::error::{CodecError, PathError};
use crate::tree::node::{
    Association, KeyNode, KeyStyle, Node, Sequence, Shape, ShapeMut,
};
use crate::tree::scalar::MapKey;
use serde_json::Value;
use std::collections::{btree_map, hash_map, BTreeMap, BTreeSet, HashMap, VecDeque};
use std::hash::Hash;

impl<T: Node + Default> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Node))
    }

    fn get(&self, index: usize) -> Option<&dyn Node> {
        self.as_slice().get(index).map(|e| e as &dyn Node)
    }

    fn element_mut(&mut self, index: usize, visit: &mut dyn FnMut(&mut dyn Node)) -> bool {
        match self.get_mut(index) {
            Some(element) => {
                visit(element);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn push_with(&mut self, fill: &mut dyn FnMut(&mut dyn Node)) {
        let mut element = T::default();
        fill(&mut element);
        self.push(element);
    }
}

impl<T: Node + Default> Sequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Node))
    }

    fn get(&self, index: usize) -> Option<&dyn Node> {
        VecDeque::get(self, index).map(|e| e as &dyn Node)
    }

    fn element_mut(&mut self, index: usize, visit: &mut dyn FnMut(&mut dyn Node)) -> bool {
        match self.get_mut(index) {
            Some(element) => {
                visit(element);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        VecDeque::clear(self)
    }

    fn push_with(&mut self, fill: &mut dyn FnMut(&mut dyn Node)) {
        let mut element = T::default();
        fill(&mut element);
        self.push_back(element);
    }
}

/// Set elements are addressed by their position in sorted order. Mutation
/// takes the element out, applies the change and reinserts it, so the
/// element may move to a different position afterwards.
impl<T: Node + Default + Ord + Clone> Sequence for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Node))
    }

    fn element_mut(&mut self, index: usize, visit: &mut dyn FnMut(&mut dyn Node)) -> bool {
        let Some(mut element) = self.iter().nth(index).cloned() else {
            return false;
        };
        self.remove(&element);
        visit(&mut element);
        self.insert(element);
        true
    }

    /// Drains the set and rebuilds it, so a visit that reorders an element
    /// cannot cause another to be skipped or seen twice.
    fn for_each_mut(&mut self, visit: &mut dyn FnMut(usize, &mut dyn Node)) {
        let elements = std::mem::take(self);
        for (index, mut element) in elements.into_iter().enumerate() {
            visit(index, &mut element);
            self.insert(element);
        }
    }

    fn clear(&mut self) {
        BTreeSet::clear(self)
    }

    fn push_with(&mut self, fill: &mut dyn FnMut(&mut dyn Node)) {
        let mut element = T::default();
        fill(&mut element);
        self.insert(element);
    }
}

macro_rules! sequence_node {
    ($ty:ident < T > where $($bound:tt)+) => {
        impl<T> Node for $ty<T>
        where
            $($bound)+
        {
            fn shape(&self) -> Shape<'_> {
                Shape::Sequence(self)
            }

            fn shape_mut(&mut self) -> ShapeMut<'_> {
                ShapeMut::Sequence(self)
            }
        }
    };
}

sequence_node!(Vec<T> where T: Node + Default);
sequence_node!(VecDeque<T> where T: Node + Default);
sequence_node!(BTreeSet<T> where T: Node + Default + Ord + Clone);

fn parse_path_key<K: MapKey>(segment: &str) -> Result<K, PathError> {
    K::parse_key(segment).map_err(|reason| PathError::MalformedKey {
        segment: segment.to_string(),
        reason,
    })
}

fn parse_text_key<K: MapKey>(key: &str) -> Result<K, CodecError> {
    K::parse_key(key).map_err(|reason| CodecError::Scalar {
        type_name: std::any::type_name::<K>(),
        reason,
    })
}

fn parse_value_key<K: MapKey>(key: &Value) -> Result<K, CodecError> {
    K::from_key_value(key).map_err(|reason| CodecError::Scalar {
        type_name: std::any::type_name::<K>(),
        reason,
    })
}

impl<K, V> Association for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Node + Default,
{
    fn key_style(&self) -> KeyStyle {
        K::STYLE
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn KeyNode, &dyn Node)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k as &dyn KeyNode, v as &dyn Node)))
    }

    fn get(&self, key: &str) -> Result<Option<&dyn Node>, PathError> {
        let key: K = parse_path_key(key)?;
        Ok(BTreeMap::get(self, &key).map(|v| v as &dyn Node))
    }

    fn entry_mut(
        &mut self,
        key: &str,
        insert: bool,
        visit: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<bool, PathError> {
        let key: K = parse_path_key(key)?;
        let value = if insert {
            Some(self.entry(key).or_default())
        } else {
            self.get_mut(&key)
        };
        Ok(match value {
            Some(value) => {
                visit(value);
                true
            }
            None => false,
        })
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn insert_with(
        &mut self,
        key: &str,
        fill: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<(), CodecError> {
        let key: K = parse_text_key(key)?;
        if let btree_map::Entry::Vacant(slot) = self.entry(key) {
            fill(slot.insert(V::default()));
        }
        Ok(())
    }

    fn insert_value_with(
        &mut self,
        key: &Value,
        fill: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<(), CodecError> {
        let key: K = parse_value_key(key)?;
        if let btree_map::Entry::Vacant(slot) = self.entry(key) {
            fill(slot.insert(V::default()));
        }
        Ok(())
    }
}

impl<K, V> Association for HashMap<K, V>
where
    K: MapKey + Eq + Hash,
    V: Node + Default,
{
    fn key_style(&self) -> KeyStyle {
        K::STYLE
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn KeyNode, &dyn Node)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k as &dyn KeyNode, v as &dyn Node)))
    }

    fn get(&self, key: &str) -> Result<Option<&dyn Node>, PathError> {
        let key: K = parse_path_key(key)?;
        Ok(HashMap::get(self, &key).map(|v| v as &dyn Node))
    }

    fn entry_mut(
        &mut self,
        key: &str,
        insert: bool,
        visit: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<bool, PathError> {
        let key: K = parse_path_key(key)?;
        let value = if insert {
            Some(self.entry(key).or_default())
        } else {
            self.get_mut(&key)
        };
        Ok(match value {
            Some(value) => {
                visit(value);
                true
            }
            None => false,
        })
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn insert_with(
        &mut self,
        key: &str,
        fill: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<(), CodecError> {
        let key: K = parse_text_key(key)?;
        if let hash_map::Entry::Vacant(slot) = self.entry(key) {
            fill(slot.insert(V::default()));
        }
        Ok(())
    }

    fn insert_value_with(
        &mut self,
        key: &Value,
        fill: &mut dyn FnMut(&mut dyn Node),
    ) -> Result<(), CodecError> {
        let key: K = parse_value_key(key)?;
        if let hash_map::Entry::Vacant(slot) = self.entry(key) {
            fill(slot.insert(V::default()));
        }
        Ok(())
    }
}

impl<K, V> Node for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Node + Default,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Association(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Association(self)
    }
}

impl<K, V> Node for HashMap<K, V>
where
    K: MapKey + Eq + Hash,
    V: Node + Default,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Association(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Association(self)
    }
}
