//! Scalar codec: conversion between typed leaf values and document text.
//!
//! Numbers use the locale-free `Display`/`FromStr` forms, which round-trip
//! exactly. Booleans and enums match their declared names case-insensitively.
//! Lists are whitespace-separated tokens.

use std::fmt;

use crate::document::Node;
use crate::error::{ParamError, ValueError};
use crate::field::Element;

/// A value that can live in a leaf and be written as document text.
pub trait ParamValue: Clone + PartialEq + fmt::Debug + 'static {
    /// Name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Canonical text form.
    fn to_text(&self) -> String;

    /// Parse the canonical text form.
    fn from_text(text: &str) -> Result<Self, ValueError>;
}

macro_rules! impl_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn from_text(text: &str) -> Result<Self, ValueError> {
                    text.trim()
                        .parse()
                        .map_err(|_| ValueError::new(text, Self::TYPE_NAME))
                }
            }
        )*
    };
}

impl_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl ParamValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> Result<Self, ValueError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ValueError::new(text, Self::TYPE_NAME))
        }
    }
}

impl ParamValue for String {
    const TYPE_NAME: &'static str = "string";

    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }
}

fn join_tokens<'a, T: ParamValue>(items: impl Iterator<Item = &'a T>) -> String {
    items.map(ParamValue::to_text).collect::<Vec<_>>().join(" ")
}

impl<T: ParamValue> ParamValue for Vec<T> {
    const TYPE_NAME: &'static str = "list";

    fn to_text(&self) -> String {
        join_tokens(self.iter())
    }

    fn from_text(text: &str) -> Result<Self, ValueError> {
        text.split_whitespace().map(T::from_text).collect()
    }
}

impl<T: ParamValue, const N: usize> ParamValue for [T; N] {
    const TYPE_NAME: &'static str = "fixed list";

    fn to_text(&self) -> String {
        join_tokens(self.iter())
    }

    fn from_text(text: &str) -> Result<Self, ValueError> {
        let tokens = Vec::<T>::from_text(text)?;
        <[T; N]>::try_from(tokens).map_err(|_| ValueError::new(text, Self::TYPE_NAME))
    }
}

/// Read a scalar document node as a typed value.
///
/// `field` names the reading field in the returned error.
pub fn decode_scalar<T: ParamValue>(node: &Node, field: &str) -> Result<T, ParamError> {
    match node.text() {
        Some(text) => T::from_text(text).map_err(|source| ParamError::invalid(field, source)),
        None => Err(ParamError::shape(field, "scalar", node)),
    }
}

macro_rules! impl_scalar_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                fn equal(&self, other: &Self) -> bool {
                    self == other
                }

                fn encode(&self, _full: bool) -> Node {
                    Node::scalar(self.to_text())
                }

                fn decode(&mut self, node: &Node, field: &str) -> Result<(), ParamError> {
                    *self = decode_scalar(node, field)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar_element!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, String);

impl<T: ParamValue> Element for Vec<T> {
    fn equal(&self, other: &Self) -> bool {
        self == other
    }

    fn encode(&self, _full: bool) -> Node {
        Node::scalar(self.to_text())
    }

    fn decode(&mut self, node: &Node, field: &str) -> Result<(), ParamError> {
        *self = decode_scalar(node, field)?;
        Ok(())
    }
}
