//! Named group node.

use std::any::Any;
use std::ops::{Deref, DerefMut};

use crate::document::Node;
use crate::error::ParamError;
use crate::field::{same_shape, Field, Schema};

/// A named node owning the fixed child set of schema `G`.
///
/// Dereferences to `G`, so children are reached as plain struct fields.
#[derive(Debug, Clone)]
pub struct Group<G: Schema> {
    field_name: &'static str,
    schema: G,
}

impl<G: Schema> Group<G> {
    pub fn new(name: &'static str) -> Self {
        Self {
            field_name: name,
            schema: G::default(),
        }
    }

    pub fn schema(&self) -> &G {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut G {
        &mut self.schema
    }

    /// Restore every child to its compiled-in default.
    pub fn reset(&mut self) {
        self.schema = G::default();
    }
}

impl<G: Schema> Deref for Group<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.schema
    }
}

impl<G: Schema> DerefMut for Group<G> {
    fn deref_mut(&mut self) -> &mut G {
        &mut self.schema
    }
}

impl<G: Schema> Field for Group<G> {
    fn name(&self) -> &'static str {
        self.field_name
    }

    fn changed(&self) -> bool {
        self.schema.any_changed()
    }

    fn equal(&self, other: &dyn Field) -> bool {
        same_shape(self, other).is_some_and(|other| self.schema.fields_equal(&other.schema))
    }

    fn assign(&mut self, other: &dyn Field) -> bool {
        match same_shape(self, other) {
            Some(other) => {
                self.schema.assign_fields(&other.schema);
                true
            }
            None => false,
        }
    }

    /// In diff mode the group is written when any child emits something:
    /// a change, or an always-written property.
    fn encode(&self, full: bool) -> Option<Node> {
        let node = self.schema.encode_fields(full);
        (full || !node.is_blank()).then_some(node)
    }

    fn decode(&mut self, node: &Node) -> Result<(), ParamError> {
        self.schema.decode_fields(node, self.field_name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn child_count(&self) -> usize {
        G::CHILDREN.len()
    }

    fn child_at(&self, index: usize) -> Option<&dyn Field> {
        G::CHILDREN.get(index).map(|child| (child.get)(&self.schema))
    }

    fn child_at_mut(&mut self, index: usize) -> Option<&mut dyn Field> {
        G::CHILDREN
            .get(index)
            .map(|child| (child.get_mut)(&mut self.schema))
    }

    fn is_group(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::Param;

    param_group! {
        struct Entry {
            name: Param<String> = ("Name".to_string()),
            value: Param<i32> = (0),
        }
    }

    param_group! {
        struct Outer {
            entry: Group<Entry>,
            enabled: Param<bool> = (true),
        }
    }

    #[test]
    fn test_diff_save_emits_only_changed_children() {
        let mut entry: Group<Entry> = Group::new("entry");
        entry.value.set(9);

        let mut doc = Node::map();
        entry.save(&mut doc, false);
        assert_eq!(
            doc,
            Node::map().with("entry", Node::map().with("value", Node::scalar("9")))
        );

        let mut doc = Node::map();
        entry.save(&mut doc, true);
        let saved = doc.child("entry").unwrap();
        assert_eq!(saved.child("name"), Some(&Node::scalar("Name")));
        assert_eq!(saved.child("value"), Some(&Node::scalar("9")));
    }

    #[test]
    fn test_unchanged_group_is_omitted_in_diff_mode() {
        let outer: Group<Outer> = Group::new("outer");
        assert_eq!(outer.encode(false), None);

        let full = outer.encode(true).unwrap();
        let entry = full.child("entry").unwrap();
        assert_eq!(entry.entries().len(), 2);
    }

    #[test]
    fn test_nested_changes_propagate() {
        let mut outer: Group<Outer> = Group::new("outer");
        outer.entry.name.set("Other".to_string());
        assert!(outer.changed());

        let diff = outer.encode(false).unwrap();
        assert_eq!(
            diff,
            Node::map().with(
                "entry",
                Node::map().with("name", Node::scalar("Other"))
            )
        );
    }

    #[test]
    fn test_load_stops_at_first_failure() {
        let mut outer: Group<Outer> = Group::new("outer");
        let doc = Node::map().with(
            "outer",
            Node::map()
                .with(
                    "entry",
                    Node::map()
                        .with("name", Node::scalar("Loaded"))
                        .with("value", Node::scalar("many")),
                )
                .with("enabled", Node::scalar("false")),
        );
        let err = outer.load(&doc).unwrap_err();
        assert_eq!(err.code(), "INVALID_VALUE");
        // In-place loads are not rolled back.
        assert_eq!(outer.entry.name.get(), "Loaded");
        assert!(*outer.enabled.get());
    }

    #[test]
    fn test_assign_and_equal() {
        let mut a: Group<Outer> = Group::new("outer");
        let mut b: Group<Outer> = Group::new("outer");
        a.entry.value.set(5);
        a.enabled.set(false);
        assert!(!a.equal(&b));
        assert!(b.assign(&a));
        assert!(a.equal(&b));

        let other: Group<Entry> = Group::new("outer");
        assert!(!a.equal(&other));
        assert!(!b.assign(&other));
    }

    #[test]
    fn test_child_access_by_index() {
        let outer: Group<Outer> = Group::new("outer");
        assert_eq!(outer.child_count(), 2);
        assert!(outer.child_at(0).unwrap().is_group());
        assert_eq!(outer.child_at(1).unwrap().name(), "enabled");
        assert!(outer.child_at(2).is_none());
    }
}
