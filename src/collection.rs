//! Keyed-collection nodes: key-ordered maps from scalar keys to elements.
//!
//! Each entry is written as an `item` holding the key under `first` and the
//! value under `second`:
//!
//! ```xml
//! <layers>
//!   <item><first>new</first><second><value>3</value></second></item>
//!   <item><first>old</first><second/></item>
//! </layers>
//! ```

use std::any::Any;
use std::collections::btree_map::{self, BTreeMap};

use crate::document::{Node, KEY, VALUE};
use crate::error::ParamError;
use crate::field::{same_shape, Element, Field};
use crate::sequence::{collect_items, wrap_items};
use crate::value::{decode_scalar, ParamValue};

/// Keyed collection that persists its entry count.
pub type CountedCollection<K, V> = Collection<K, V, true>;

/// A named mapping from keys to same-shaped values, iterated in key order.
#[derive(Debug, Clone)]
pub struct Collection<K: ParamValue + Ord, V: Element, const COUNTED: bool = false> {
    field_name: &'static str,
    entries: BTreeMap<K, V>,
}

impl<K: ParamValue + Ord, V: Element, const COUNTED: bool> Collection<K, V, COUNTED> {
    pub fn new(name: &'static str) -> Self {
        Self {
            field_name: name,
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up `key` without inserting.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Look up `key`, inserting a default value when it is absent.
    ///
    /// This is a read that can grow the collection: the new entry is saved
    /// like any other, even if never modified.
    pub fn get_or_insert(&mut self, key: K) -> &mut V {
        self.entries.entry(key).or_default()
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, K, V> {
        self.entries.iter_mut()
    }
}

impl<'a, K: ParamValue + Ord, V: Element, const COUNTED: bool> IntoIterator
    for &'a Collection<K, V, COUNTED>
{
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: ParamValue + Ord, V: Element, const COUNTED: bool> Field for Collection<K, V, COUNTED> {
    fn name(&self) -> &'static str {
        self.field_name
    }

    fn changed(&self) -> bool {
        !self.entries.is_empty()
    }

    fn equal(&self, other: &dyn Field) -> bool {
        same_shape(self, other).is_some_and(|other| {
            self.entries.len() == other.entries.len()
                && self
                    .entries
                    .iter()
                    .zip(&other.entries)
                    .all(|((ka, va), (kb, vb))| ka == kb && va.equal(vb))
        })
    }

    fn assign(&mut self, other: &dyn Field) -> bool {
        match same_shape(self, other) {
            Some(other) => {
                self.entries.clone_from(&other.entries);
                true
            }
            None => false,
        }
    }

    fn encode(&self, full: bool) -> Option<Node> {
        if !(full || self.changed()) {
            return None;
        }
        let items = self
            .entries
            .iter()
            .map(|(key, value)| {
                Node::map()
                    .with(KEY, Node::scalar(key.to_text()))
                    .with(VALUE, value.encode(full))
            })
            .collect();
        Some(wrap_items(items, COUNTED))
    }

    /// Merge items into the collection; keys absent from the document are kept.
    fn decode(&mut self, node: &Node) -> Result<(), ParamError> {
        let items = collect_items(node, self.field_name, COUNTED)?;
        for item in items {
            let key_node = item
                .child(KEY)
                .ok_or_else(|| ParamError::shape(self.field_name, "keyed item", item))?;
            let key: K = decode_scalar(key_node, self.field_name)?;
            let slot = self.entries.entry(key).or_default();
            if let Some(value) = item.child(VALUE) {
                slot.decode(value, self.field_name)?;
            }
        }
        tracing::debug!(field = self.field_name, len = self.entries.len(), "loaded collection");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
