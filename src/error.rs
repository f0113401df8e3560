//! Error types for parameter trees and their document codecs.

use std::path::PathBuf;
use thiserror::Error;

use crate::document::Node;
use crate::format::Format;

/// A scalar text that could not be converted into its typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse '{text}' as {type_name}")]
pub struct ValueError {
    /// The offending text.
    pub text: String,
    /// Name of the target type.
    pub type_name: &'static str,
}

impl ValueError {
    pub fn new(text: impl Into<String>, type_name: &'static str) -> Self {
        Self {
            text: text.into(),
            type_name,
        }
    }
}

/// Errors raised while loading, saving or editing a parameter tree.
#[derive(Debug, Error)]
pub enum ParamError {
    /// The document text is malformed for its format.
    #[error("{format} syntax error: {message}")]
    Syntax { format: Format, message: String },

    /// The document could not be rendered.
    #[error("{format} write error: {message}")]
    Write { format: Format, message: String },

    /// A document node has the wrong kind for the field reading it.
    #[error("field '{field}': expected {expected}, found {found}")]
    Shape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A counted collection whose persisted count disagrees with its items.
    #[error("field '{field}': persisted count {count} does not match {items} item(s)")]
    CountMismatch {
        field: String,
        count: usize,
        items: usize,
    },

    /// Scalar text that does not parse as the field's type.
    #[error("field '{field}': {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: ValueError,
    },

    /// The file extension does not name a supported format.
    #[error("unrecognised document format for '{}'", path.display())]
    UnknownFormat { path: PathBuf },

    /// No property is registered under this path.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParamError {
    pub(crate) fn shape(field: &str, expected: &'static str, found: &Node) -> Self {
        Self::Shape {
            field: field.to_string(),
            expected,
            found: found.kind(),
        }
    }

    pub(crate) fn invalid(field: &str, source: ValueError) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            source,
        }
    }

    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "SYNTAX",
            Self::Write { .. } => "WRITE",
            Self::Shape { .. } => "SHAPE",
            Self::CountMismatch { .. } => "COUNT_MISMATCH",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::UnknownFormat { .. } => "UNKNOWN_FORMAT",
            Self::UnknownProperty(_) => "UNKNOWN_PROPERTY",
            Self::Io { .. } => "IO",
        }
    }

    /// True for errors caused by the document's structure rather than its syntax or I/O.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Shape { .. } | Self::CountMismatch { .. } | Self::InvalidValue { .. }
        )
    }
}
