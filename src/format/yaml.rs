//! Block-text adapter backed by serde_yaml.
//!
//! Maps become mappings and sequences become sequences. Repeated map keys,
//! as produced by counted collections, fold into a single sequence-valued
//! key. Scalars are written as plain numbers or booleans only when that
//! rendering reads back to the identical text.

use std::collections::HashSet;
use std::fmt;

use serde_yaml::{Mapping, Number, Value};

use super::Format;
use crate::document::Node;
use crate::error::ParamError;

fn syntax(message: impl fmt::Display) -> ParamError {
    ParamError::Syntax {
        format: Format::Yaml,
        message: message.to_string(),
    }
}

fn key_text(key: &Value) -> Result<String, ParamError> {
    match key {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(syntax(format!("unsupported mapping key {:?}", other))),
    }
}

fn from_value(value: &Value) -> Result<Node, ParamError> {
    Ok(match value {
        Value::Null => Node::scalar(""),
        Value::Bool(flag) => Node::scalar(flag.to_string()),
        Value::Number(number) => Node::scalar(number.to_string()),
        Value::String(text) => Node::scalar(text.clone()),
        Value::Sequence(items) => Node::Seq(items.iter().map(from_value).collect::<Result<_, _>>()?),
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, child) in mapping {
                entries.push((key_text(key)?, from_value(child)?));
            }
            Node::Map(entries)
        }
        Value::Tagged(tagged) => from_value(&tagged.value)?,
    })
}

/// Plain YAML scalar for `text` when it reads back unchanged.
fn scalar_value(text: &str) -> Value {
    if text == "true" || text == "false" {
        return Value::Bool(text == "true");
    }
    if let Ok(int) = text.parse::<i64>() {
        let number = Number::from(int);
        if number.to_string() == text {
            return Value::Number(number);
        }
    } else if let Ok(int) = text.parse::<u64>() {
        let number = Number::from(int);
        if number.to_string() == text {
            return Value::Number(number);
        }
    } else if let Ok(float) = text.parse::<f64>() {
        let number = Number::from(float);
        if float.is_finite() && number.to_string() == text {
            return Value::Number(number);
        }
    }
    Value::String(text.to_string())
}

fn to_value(node: &Node) -> Value {
    match node {
        Node::Scalar(text) => scalar_value(text),
        Node::Seq(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Node::Map(entries) => {
            let mut mapping = Mapping::new();
            let mut seen = HashSet::new();
            for (key, _) in entries {
                if !seen.insert(key.as_str()) {
                    continue;
                }
                let mut repeated: Vec<&Node> = entries
                    .iter()
                    .filter(|(other, _)| other == key)
                    .map(|(_, child)| child)
                    .collect();
                let value = if repeated.len() == 1 {
                    to_value(repeated.remove(0))
                } else {
                    Value::Sequence(repeated.into_iter().map(to_value).collect())
                };
                mapping.insert(Value::String(key.clone()), value);
            }
            Value::Mapping(mapping)
        }
    }
}

pub(super) fn parse(text: &str) -> Result<Node, ParamError> {
    let value: Value = serde_yaml::from_str(text).map_err(syntax)?;
    from_value(&value)
}

pub(super) fn render(doc: &Node) -> Result<String, ParamError> {
    serde_yaml::to_string(&to_value(doc)).map_err(|err| ParamError::Write {
        format: Format::Yaml,
        message: err.to_string(),
    })
}
