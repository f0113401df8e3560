//! Property leaves and the flattened named-property index.
//!
//! A property is a scalar leaf with a human-readable description. It is
//! written with its metadata so that editors can present it:
//!
//! ```xml
//! <exposure>
//!   <value>2.5</value>
//!   <desc>Exposure multiplier</desc>
//!   <value_min>0</value_min>
//!   <value_max>10</value_max>
//!   <value_default>1</value_default>
//! </exposure>
//! ```
//!
//! `value_min`/`value_max` are blank for unvalidated properties. Properties
//! are written in diff saves as well, changed or not.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::document::Node;
use crate::error::{ParamError, ValueError};
use crate::field::{same_shape, Field};
use crate::leaf::{Leaf, Limited, Param};
use crate::value::ParamValue;

/// Property wrapping an unvalidated leaf.
pub type PlainProperty<T> = Property<Param<T>>;
/// Property wrapping a validated leaf.
pub type LimitedProperty<T> = Property<Limited<T>>;

/// A leaf carrying a description for metadata export.
#[derive(Debug, Clone)]
pub struct Property<L> {
    leaf: L,
    description: &'static str,
}

impl<T: ParamValue> Property<Param<T>> {
    pub fn new(name: &'static str, default: T, description: &'static str) -> Self {
        Self {
            leaf: Param::new(name, default),
            description,
        }
    }
}

impl<T: ParamValue + PartialOrd> Property<Limited<T>> {
    pub fn new(name: &'static str, default: T, min: T, max: T, description: &'static str) -> Self {
        Self {
            leaf: Limited::new(name, default, min, max),
            description,
        }
    }
}

impl<L> Property<L> {
    /// The wrapped leaf.
    pub fn leaf(&self) -> &L {
        &self.leaf
    }

    pub fn leaf_mut(&mut self) -> &mut L {
        &mut self.leaf
    }
}

impl<L: Leaf> Property<L> {
    /// True when the wrapped leaf is range-validated.
    pub fn is_limited(&self) -> bool {
        self.leaf.range_text().is_some()
    }
}

impl<L> std::ops::Deref for Property<L> {
    type Target = L;

    fn deref(&self) -> &L {
        &self.leaf
    }
}

impl<L> std::ops::DerefMut for Property<L> {
    fn deref_mut(&mut self) -> &mut L {
        &mut self.leaf
    }
}

impl<L: Field + Leaf + Clone + fmt::Debug> Field for Property<L> {
    fn name(&self) -> &'static str {
        self.leaf.name()
    }

    fn changed(&self) -> bool {
        self.leaf.changed()
    }

    fn equal(&self, other: &dyn Field) -> bool {
        same_shape(self, other).is_some_and(|other| self.leaf.equal(&other.leaf))
    }

    fn assign(&mut self, other: &dyn Field) -> bool {
        match same_shape(self, other) {
            Some(other) => self.leaf.assign(&other.leaf),
            None => false,
        }
    }

    /// Always emitted, in diff mode too, so editors see every property.
    fn encode(&self, _full: bool) -> Option<Node> {
        let (min, max) = self.leaf.range_text().unwrap_or_default();
        Some(
            Node::map()
                .with("value", Node::scalar(self.leaf.text()))
                .with("desc", Node::scalar(self.description))
                .with("value_min", Node::scalar(min))
                .with("value_max", Node::scalar(max))
                .with("value_default", Node::scalar(self.leaf.default_text())),
        )
    }

    /// Reads the `value` child; a bare scalar is accepted as the value itself.
    fn decode(&mut self, node: &Node) -> Result<(), ParamError> {
        match node {
            Node::Scalar(_) => self.leaf.decode(node),
            Node::Map(_) => match node.child("value") {
                Some(value) => self.leaf.decode(value),
                None => Ok(()),
            },
            Node::Seq(_) => Err(ParamError::shape(self.name(), "property", node)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_leaf(&self) -> Option<&dyn Leaf> {
        Some(self)
    }

    fn as_leaf_mut(&mut self) -> Option<&mut dyn Leaf> {
        Some(self)
    }
}

impl<L: Leaf> Leaf for Property<L> {
    fn text(&self) -> String {
        self.leaf.text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        self.leaf.set_text(text)
    }

    fn default_text(&self) -> String {
        self.leaf.default_text()
    }

    fn range_text(&self) -> Option<(String, String)> {
        self.leaf.range_text()
    }

    fn description(&self) -> Option<&str> {
        Some(self.description)
    }

    fn is_changed(&self) -> bool {
        self.leaf.is_changed()
    }
}

/// Metadata row for one named property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyInfo {
    /// `"<group>.<leaf>"`
    pub path: String,
    pub value: String,
    pub default: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub limited: bool,
    pub changed: bool,
}

impl PropertyInfo {
    fn from_leaf(path: &str, leaf: &dyn Leaf) -> Self {
        let range = leaf.range_text();
        Self {
            path: path.to_string(),
            value: leaf.text(),
            default: leaf.default_text(),
            limited: range.is_some(),
            min: range.as_ref().map(|(min, _)| min.clone()),
            max: range.map(|(_, max)| max),
            description: leaf.description().map(str::to_string),
            changed: leaf.is_changed(),
        }
    }
}

/// Flattened `"<group>.<leaf>"` → leaf lookup over a group tree.
///
/// Covers every leaf of every immediate child group of the root. Slots are
/// child positions, so the index stays valid for the lifetime of the tree it
/// was built from and for any tree of the same shape.
#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    slots: HashMap<String, (usize, usize)>,
    order: Vec<String>,
}

impl PropertyIndex {
    pub fn build(root: &dyn Field) -> Self {
        let mut index = Self::default();
        for group_slot in 0..root.child_count() {
            let Some(group) = root.child_at(group_slot) else {
                continue;
            };
            if !group.is_group() {
                continue;
            }
            for leaf_slot in 0..group.child_count() {
                let Some(leaf) = group.child_at(leaf_slot) else {
                    continue;
                };
                if leaf.as_leaf().is_none() {
                    continue;
                }
                let path = format!("{}.{}", group.name(), leaf.name());
                index.order.push(path.clone());
                index.slots.insert(path, (group_slot, leaf_slot));
            }
        }
        tracing::debug!(
            root = root.name(),
            properties = index.order.len(),
            "built property index"
        );
        index
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.slots.contains_key(path)
    }

    /// Registered paths in schema order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn slot(&self, path: &str) -> Result<(usize, usize), ParamError> {
        self.slots
            .get(path)
            .copied()
            .ok_or_else(|| ParamError::UnknownProperty(path.to_string()))
    }

    pub fn leaf<'a>(&self, root: &'a dyn Field, path: &str) -> Result<&'a dyn Leaf, ParamError> {
        let (group, leaf) = self.slot(path)?;
        root.child_at(group)
            .and_then(|group| group.child_at(leaf))
            .and_then(|field| field.as_leaf())
            .ok_or_else(|| ParamError::UnknownProperty(path.to_string()))
    }

    pub fn leaf_mut<'a>(
        &self,
        root: &'a mut dyn Field,
        path: &str,
    ) -> Result<&'a mut dyn Leaf, ParamError> {
        let (group, leaf) = self.slot(path)?;
        root.child_at_mut(group)
            .and_then(|group| group.child_at_mut(leaf))
            .and_then(|field| field.as_leaf_mut())
            .ok_or_else(|| ParamError::UnknownProperty(path.to_string()))
    }

    pub fn get(&self, root: &dyn Field, path: &str) -> Result<String, ParamError> {
        Ok(self.leaf(root, path)?.text())
    }

    /// Parse `text` into the leaf at `path`. Unknown paths and unparsable text
    /// leave the tree untouched.
    pub fn set(&self, root: &mut dyn Field, path: &str, text: &str) -> Result<(), ParamError> {
        self.leaf_mut(root, path)?
            .set_text(text)
            .map_err(|source| ParamError::invalid(path, source))
    }

    pub fn describe(&self, root: &dyn Field) -> Vec<PropertyInfo> {
        self.order
            .iter()
            .filter_map(|path| {
                self.leaf(root, path)
                    .ok()
                    .map(|leaf| PropertyInfo::from_leaf(path, leaf))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::sequence::Sequence;

    param_group! {
        struct Camera {
            exposure: LimitedProperty<f64> = (1.0, 0.0, 10.0, "Exposure multiplier"),
            label: PlainProperty<String> = ("main".to_string(), "Display label"),
            iso: Param<u32> = (100),
        }
    }

    param_group! {
        struct Rig {
            camera: Group<Camera>,
            shots: Sequence<u32>,
            scale: Param<f64> = (1.0),
        }
    }

    #[test]
    fn test_property_encodes_metadata() {
        let mut camera = Camera::default();
        camera.exposure.set(2.5);
        let node = camera.exposure.encode(false).unwrap();
        assert_eq!(
            node,
            Node::map()
                .with("value", Node::scalar("2.5"))
                .with("desc", Node::scalar("Exposure multiplier"))
                .with("value_min", Node::scalar("0"))
                .with("value_max", Node::scalar("10"))
                .with("value_default", Node::scalar("1"))
        );

        let label = camera.label.encode(true).unwrap();
        assert_eq!(label.child("value_min"), Some(&Node::scalar("")));
        assert_eq!(label.child("value_max"), Some(&Node::scalar("")));
        assert_eq!(camera.label.encode(false), Some(label));
    }

    #[test]
    fn test_diff_save_keeps_unchanged_properties() {
        let rig: Group<Rig> = Group::new("rig");
        assert!(!rig.changed());

        let node = rig.encode(false).unwrap();
        let camera = node.child("camera").unwrap();
        let names: Vec<_> = camera.entries().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["exposure", "label"]);

        let exposure = camera.child("exposure").unwrap();
        assert_eq!(exposure.child("value"), Some(&Node::scalar("1")));
        assert_eq!(exposure.entries().len(), 5);
        assert!(node.child("scale").is_none());
    }

    #[test]
    fn test_property_decodes_value_child_or_scalar() {
        let mut camera = Camera::default();
        camera
            .exposure
            .decode(&Node::map().with("value", Node::scalar("3")))
            .unwrap();
        assert_eq!(*camera.exposure.get(), 3.0);

        camera.label.decode(&Node::scalar("side")).unwrap();
        assert_eq!(camera.label.get(), "side");
    }

    #[test]
    fn test_limited_flag() {
        let camera = Camera::default();
        assert!(camera.exposure.is_limited());
        assert!(!camera.label.is_limited());
    }

    #[test]
    fn test_index_covers_leaves_of_child_groups() {
        let rig: Group<Rig> = Group::new("rig");
        let index = PropertyIndex::build(&rig);
        let paths: Vec<_> = index.paths().collect();
        assert_eq!(
            paths,
            vec!["camera.exposure", "camera.label", "camera.iso"]
        );
        assert!(!index.contains("rig.scale"));
        assert!(!index.contains("rig.shots"));
    }

    #[test]
    fn test_index_get_and_set() {
        let mut rig: Group<Rig> = Group::new("rig");
        let index = PropertyIndex::build(&rig);

        index.set(&mut rig, "camera.iso", "400").unwrap();
        assert_eq!(*rig.camera.iso.get(), 400);
        assert_eq!(index.get(&rig, "camera.iso").unwrap(), "400");

        index.set(&mut rig, "camera.exposure", "50").unwrap();
        assert_eq!(index.get(&rig, "camera.exposure").unwrap(), "1");

        let err = index.set(&mut rig, "camera.iso", "fast").unwrap_err();
        assert_eq!(err.code(), "INVALID_VALUE");
        assert_eq!(*rig.camera.iso.get(), 400);

        let err = index.get(&rig, "camera.focus").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_PROPERTY");
    }

    #[test]
    fn test_describe_rows() {
        let mut rig: Group<Rig> = Group::new("rig");
        rig.camera.label.set("top".to_string());
        let index = PropertyIndex::build(&rig);
        let rows = index.describe(&rig);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].path, "camera.exposure");
        assert!(rows[0].limited);
        assert_eq!(rows[0].min.as_deref(), Some("0"));
        assert_eq!(rows[0].description.as_deref(), Some("Exposure multiplier"));

        assert_eq!(rows[1].value, "top");
        assert!(rows[1].changed);

        assert_eq!(rows[2].description, None);
        assert!(!rows[2].limited);
    }
}
