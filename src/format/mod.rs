//! Document formats: the markup tree (XML) and block text (YAML).
//!
//! Both adapters translate between concrete syntax and the neutral
//! [`Node`] tree. The document root is a map with a single entry named
//! after the tree root.

mod xml;
mod yaml;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::document::Node;
use crate::error::ParamError;

/// A supported document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Xml,
    Yaml,
}

impl Format {
    /// Pick a format from a file extension (`.xml`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Result<Self, ParamError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| ParamError::UnknownFormat {
                path: path.to_path_buf(),
            })
    }

    /// Parse document text into a neutral tree.
    pub fn parse(self, text: &str) -> Result<Node, ParamError> {
        match self {
            Self::Xml => xml::parse(text),
            Self::Yaml => yaml::parse(text),
        }
    }

    /// Render a neutral tree as document text.
    pub fn render(self, doc: &Node) -> Result<String, ParamError> {
        match self {
            Self::Xml => xml::render(doc),
            Self::Yaml => yaml::render(doc),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml => write!(f, "XML"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// Parses a format tag (`xml`, `yaml`, `yml`), ignoring case.
impl FromStr for Format {
    type Err = ParamError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ParamError::UnknownFormat { path: tag.into() }),
        }
    }
}
