//! The field-node protocol.
//!
//! Every node of a parameter tree implements [`Field`]: it has a fixed name,
//! knows whether it differs from its compiled-in default, compares and copies
//! structurally, and reads/writes itself against a document [`Node`].
//!
//! Groups enumerate their children through a [`Schema`]'s `CHILDREN` table,
//! an ordered list of accessor pairs generated once by `param_group!`.
//! Parents walk that table by index.

use std::any::Any;
use std::fmt;

use crate::document::Node;
use crate::error::ParamError;
use crate::leaf::Leaf;

/// A named node of a parameter tree.
pub trait Field: Any {
    /// Serialization key; fixed at construction.
    fn name(&self) -> &'static str;

    /// True when the current value differs from the compiled-in default.
    fn changed(&self) -> bool;

    /// Structural equality. Nodes of a different concrete type compare unequal.
    fn equal(&self, other: &dyn Field) -> bool;

    /// Structural copy from `other`.
    ///
    /// Returns `false`, leaving `self` untouched, when `other` has a different shape.
    fn assign(&mut self, other: &dyn Field) -> bool;

    /// Encode this node's value. `None` means nothing is emitted.
    fn encode(&self, full: bool) -> Option<Node>;

    /// Decode this node's value from its own document node.
    fn decode(&mut self, node: &Node) -> Result<(), ParamError>;

    fn as_any(&self) -> &dyn Any;

    /// Number of schema children (zero for leaves and collections).
    fn child_count(&self) -> usize {
        0
    }

    fn child_at(&self, _index: usize) -> Option<&dyn Field> {
        None
    }

    fn child_at_mut(&mut self, _index: usize) -> Option<&mut dyn Field> {
        None
    }

    /// True for group nodes.
    fn is_group(&self) -> bool {
        false
    }

    /// Text access for scalar leaves.
    fn as_leaf(&self) -> Option<&dyn Leaf> {
        None
    }

    fn as_leaf_mut(&mut self) -> Option<&mut dyn Leaf> {
        None
    }

    /// Append this node under its name to `parent`, subject to the `full` policy.
    fn save(&self, parent: &mut Node, full: bool) {
        if let Some(node) = self.encode(full) {
            parent.append(self.name(), node);
        }
    }

    /// Load from the child of `parent` named after this node.
    ///
    /// A missing child is not an error: the current value is kept.
    fn load(&mut self, parent: &Node) -> Result<(), ParamError> {
        match parent.child(self.name()) {
            Some(node) => self.decode(node),
            None => Ok(()),
        }
    }
}

/// Downcast `other` to the concrete type of `this`.
pub(crate) fn same_shape<'a, T: Field>(this: &T, other: &'a dyn Field) -> Option<&'a T> {
    let found = other.as_any().downcast_ref::<T>();
    if found.is_none() {
        tracing::warn!(
            field = this.name(),
            other = other.name(),
            "field shapes differ"
        );
    }
    found
}

/// A member of a sequence or keyed collection: a schema group or a scalar.
///
/// Elements carry no name of their own; the owning collection writes them as
/// anonymous items. Every item is written whether or not it differs from a
/// default element, so elements do not track changes.
pub trait Element: Default + Clone + fmt::Debug + 'static {
    fn equal(&self, other: &Self) -> bool;

    /// Encode as an item. Always yields a node: an unchanged group encodes as
    /// an empty placeholder map in diff mode.
    fn encode(&self, full: bool) -> Node;

    fn decode(&mut self, node: &Node, field: &str) -> Result<(), ParamError>;
}

/// Accessor pair for one schema child.
pub struct Child<G> {
    pub name: &'static str,
    pub get: fn(&G) -> &dyn Field,
    pub get_mut: fn(&mut G) -> &mut dyn Field,
}

impl<G> fmt::Debug for Child<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Child").field("name", &self.name).finish()
    }
}

/// A group shape: a struct whose fields are tree nodes.
///
/// Implemented by `param_group!`. The provided methods walk `CHILDREN` in
/// declaration order.
pub trait Schema: Default + Clone + fmt::Debug + 'static {
    /// Children in declaration order.
    const CHILDREN: &'static [Child<Self>];

    fn any_changed(&self) -> bool {
        Self::CHILDREN.iter().any(|child| (child.get)(self).changed())
    }

    fn fields_equal(&self, other: &Self) -> bool {
        Self::CHILDREN
            .iter()
            .all(|child| (child.get)(self).equal((child.get)(other)))
    }

    fn assign_fields(&mut self, other: &Self) {
        for child in Self::CHILDREN {
            let copied = (child.get_mut)(self).assign((child.get)(other));
            debug_assert!(copied, "schema child '{}' changed shape", child.name);
        }
    }

    /// Encode every child into a fresh map, respecting `full`.
    fn encode_fields(&self, full: bool) -> Node {
        let mut node = Node::map();
        for child in Self::CHILDREN {
            (child.get)(self).save(&mut node, full);
        }
        node
    }

    /// Load every child from `node`, stopping at the first failure.
    fn decode_fields(&mut self, node: &Node, field: &str) -> Result<(), ParamError> {
        match node {
            Node::Map(_) => {}
            blank if blank.is_blank() => return Ok(()),
            other => return Err(ParamError::shape(field, "map", other)),
        }
        for child in Self::CHILDREN {
            (child.get_mut)(self).load(node)?;
        }
        Ok(())
    }
}
