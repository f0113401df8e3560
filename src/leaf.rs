//! Scalar leaves: plain parameters and range-validated parameters.

use std::any::Any;

use crate::document::Node;
use crate::error::{ParamError, ValueError};
use crate::field::{same_shape, Field};
use crate::value::{decode_scalar, ParamValue};

/// Untyped text access to a scalar leaf.
///
/// Used by the named-property index and metadata export, which work on
/// leaves without knowing their value type.
pub trait Leaf {
    fn text(&self) -> String;

    /// Parse and store `text`. Validated leaves clamp out-of-range values to
    /// their default.
    fn set_text(&mut self, text: &str) -> Result<(), ValueError>;

    fn default_text(&self) -> String;

    /// `(min, max)` for validated leaves.
    fn range_text(&self) -> Option<(String, String)> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn is_changed(&self) -> bool;
}

/// A scalar leaf with a compiled-in default.
#[derive(Debug, Clone)]
pub struct Param<T: ParamValue> {
    name: &'static str,
    value: T,
    default: T,
}

impl<T: ParamValue> Param<T> {
    pub fn new(name: &'static str, default: T) -> Self {
        Self {
            name,
            value: default.clone(),
            default,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Restore the compiled-in default.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

impl<T: ParamValue> Field for Param<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn changed(&self) -> bool {
        self.value != self.default
    }

    fn equal(&self, other: &dyn Field) -> bool {
        same_shape(self, other).is_some_and(|other| self.value == other.value)
    }

    fn assign(&mut self, other: &dyn Field) -> bool {
        match same_shape(self, other) {
            Some(other) => {
                self.value = other.value.clone();
                true
            }
            None => false,
        }
    }

    fn encode(&self, full: bool) -> Option<Node> {
        (full || self.changed()).then(|| Node::scalar(self.value.to_text()))
    }

    fn decode(&mut self, node: &Node) -> Result<(), ParamError> {
        self.value = decode_scalar(node, self.name)?;
        Ok(())
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

impl<T: ParamValue> Leaf for Param<T> {
    fn text(&self) -> String {
        self.value.to_text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        self.value = T::from_text(text)?;
        Ok(())
    }

    fn default_text(&self) -> String {
        self.default.to_text()
    }

    fn is_changed(&self) -> bool {
        self.changed()
    }
}

/// A scalar leaf whose value always lies in `[min, max]`.
///
/// Out-of-range writes store the default instead and log a warning.
#[derive(Debug, Clone)]
pub struct Limited<T: ParamValue + PartialOrd> {
    name: &'static str,
    value: T,
    default: T,
    min: T,
    max: T,
}

impl<T: ParamValue + PartialOrd> Limited<T> {
    pub fn new(name: &'static str, default: T, min: T, max: T) -> Self {
        debug_assert!(
            min <= default && default <= max,
            "default of '{name}' lies outside its range"
        );
        Self {
            name,
            value: default.clone(),
            default,
            min,
            max,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value` if it lies in `[min, max]`, otherwise store the default.
    ///
    /// Returns whether `value` was accepted.
    pub fn set(&mut self, value: T) -> bool {
        if self.contains(&value) {
            self.value = value;
            true
        } else {
            tracing::warn!(
                field = self.name,
                value = %value.to_text(),
                min = %self.min.to_text(),
                max = %self.max.to_text(),
                "value outside valid range, using default"
            );
            self.value = self.default.clone();
            false
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min <= *value && *value <= self.max
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn min(&self) -> &T {
        &self.min
    }

    pub fn max(&self) -> &T {
        &self.max
    }

    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

impl<T: ParamValue + PartialOrd> Field for Limited<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn changed(&self) -> bool {
        self.value != self.default
    }

    fn equal(&self, other: &dyn Field) -> bool {
        same_shape(self, other).is_some_and(|other| self.value == other.value)
    }

    fn assign(&mut self, other: &dyn Field) -> bool {
        match same_shape(self, other) {
            Some(other) => {
                self.value = other.value.clone();
                true
            }
            None => false,
        }
    }

    fn encode(&self, full: bool) -> Option<Node> {
        (full || self.changed()).then(|| Node::scalar(self.value.to_text()))
    }

    fn decode(&mut self, node: &Node) -> Result<(), ParamError> {
        let value = decode_scalar(node, self.name)?;
        self.set(value);
        Ok(())
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

impl<T: ParamValue + PartialOrd> Leaf for Limited<T> {
    fn text(&self) -> String {
        self.value.to_text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        let value = T::from_text(text)?;
        self.set(value);
        Ok(())
    }

    fn default_text(&self) -> String {
        self.default.to_text()
    }

    fn range_text(&self) -> Option<(String, String)> {
        Some((self.min.to_text(), self.max.to_text()))
    }

    fn is_changed(&self) -> bool {
        self.changed()
    }
}
