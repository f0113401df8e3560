//! Sequence nodes: resizable ordered lists of same-shaped elements.
//!
//! ```xml
//! <points>
//!   <item><x>1</x></item>
//!   <item/>
//! </points>
//! ```
//!
//! The counted variant also writes the element count and checks it on load:
//!
//! ```xml
//! <points>
//!   <count>2</count>
//!   <item><x>1</x></item>
//!   <item/>
//! </points>
//! ```

use std::any::Any;
use std::ops::{Index, IndexMut};

use crate::document::{Node, COUNT, ITEM};
use crate::error::ParamError;
use crate::field::{same_shape, Element, Field};
use crate::value::decode_scalar;

/// Sequence that persists its element count.
pub type CountedSequence<E> = Sequence<E, true>;

/// A named, ordered, resizable list of elements.
#[derive(Debug, Clone)]
pub struct Sequence<E: Element, const COUNTED: bool = false> {
    field_name: &'static str,
    items: Vec<E>,
}

impl<E: Element, const COUNTED: bool> Sequence<E, COUNTED> {
    pub fn new(name: &'static str) -> Self {
        Self {
            field_name: name,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Default-construct new trailing elements or drop trailing ones.
    pub fn resize(&mut self, len: usize) {
        self.items.resize_with(len, E::default);
    }

    pub fn push(&mut self, item: E) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<E> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.items
    }
}

impl<E: Element, const COUNTED: bool> Index<usize> for Sequence<E, COUNTED> {
    type Output = E;

    fn index(&self, index: usize) -> &E {
        &self.items[index]
    }
}

impl<E: Element, const COUNTED: bool> IndexMut<usize> for Sequence<E, COUNTED> {
    fn index_mut(&mut self, index: usize) -> &mut E {
        &mut self.items[index]
    }
}

impl<'a, E: Element, const COUNTED: bool> IntoIterator for &'a Sequence<E, COUNTED> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Wrap encoded items in the plain or counted collection form.
pub(crate) fn wrap_items(items: Vec<Node>, counted: bool) -> Node {
    if !counted {
        return Node::Seq(items);
    }
    let mut node = Node::map().with(COUNT, Node::scalar(items.len().to_string()));
    for item in items {
        node.append(ITEM, item);
    }
    node
}

/// Collect the item nodes of a collection, checking a persisted count.
///
/// The count is optional; when present on a counted collection it must
/// match the number of items.
pub(crate) fn collect_items<'a>(
    node: &'a Node,
    field: &str,
    counted: bool,
) -> Result<Vec<&'a Node>, ParamError> {
    let items = node
        .items()
        .ok_or_else(|| ParamError::shape(field, "collection", node))?;
    if counted {
        if let Some(count) = node.child(COUNT) {
            let count: usize = decode_scalar(count, field)?;
            if count != items.len() {
                return Err(ParamError::CountMismatch {
                    field: field.to_string(),
                    count,
                    items: items.len(),
                });
            }
        }
    }
    Ok(items)
}

impl<E: Element, const COUNTED: bool> Field for Sequence<E, COUNTED> {
    fn name(&self) -> &'static str {
        self.field_name
    }

    fn changed(&self) -> bool {
        !self.items.is_empty()
    }

    fn equal(&self, other: &dyn Field) -> bool {
        same_shape(self, other).is_some_and(|other| {
            self.items.len() == other.items.len()
                && self.items.iter().zip(&other.items).all(|(a, b)| a.equal(b))
        })
    }

    fn assign(&mut self, other: &dyn Field) -> bool {
        match same_shape(self, other) {
            Some(other) => {
                self.items.clone_from(&other.items);
                true
            }
            None => false,
        }
    }

    fn encode(&self, full: bool) -> Option<Node> {
        if !(full || self.changed()) {
            return None;
        }
        let items = self.items.iter().map(|item| item.encode(full)).collect();
        Some(wrap_items(items, COUNTED))
    }

    /// Resize to the number of items found, then load each item into its slot.
    fn decode(&mut self, node: &Node) -> Result<(), ParamError> {
        let items = collect_items(node, self.field_name, COUNTED)?;
        self.resize(items.len());
        for (slot, item) in self.items.iter_mut().zip(items) {
            slot.decode(item, self.field_name)?;
        }
        tracing::debug!(field = self.field_name, len = self.items.len(), "loaded sequence");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
