//! Parameter tree: owner of a root group and its named-property index.

use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::document::Node;
use crate::error::ParamError;
use crate::field::{Field, Schema};
use crate::format::Format;
use crate::group::Group;
use crate::property::{PropertyIndex, PropertyInfo};

/// A root group of schema `G` plus the entry points to persist and edit it.
///
/// Document loads are all-or-nothing: the document is applied to a scratch
/// copy of the tree, which replaces the current tree only if every field
/// loads. The tree is not synchronised; share it behind a lock if needed.
#[derive(Debug, Clone)]
pub struct ParamTree<G: Schema> {
    root: Group<G>,
    index: PropertyIndex,
}

impl<G: Schema> ParamTree<G> {
    /// Build a default tree whose root is named `name`.
    pub fn new(name: &'static str) -> Self {
        let root = Group::new(name);
        let index = PropertyIndex::build(&root);
        Self { root, index }
    }

    pub fn name(&self) -> &'static str {
        self.root.name()
    }

    pub fn root(&self) -> &Group<G> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Group<G> {
        &mut self.root
    }

    pub fn index(&self) -> &PropertyIndex {
        &self.index
    }

    /// True when any field differs from its compiled-in default.
    pub fn changed(&self) -> bool {
        self.root.changed()
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.root.equal(&other.root)
    }

    /// Copy every field from `other`.
    pub fn assign(&mut self, other: &Self) {
        self.root.assign(&other.root);
    }

    /// Restore every field to its compiled-in default.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    /// Encode as a document. The root node is always present, even in diff
    /// mode with nothing changed.
    pub fn to_document(&self, full: bool) -> Node {
        let root = self.root.encode(full).unwrap_or_default();
        Node::map().with(self.name(), root)
    }

    /// Apply a document. On failure the tree is left unchanged.
    pub fn load_document(&mut self, doc: &Node) -> Result<(), ParamError> {
        if !matches!(doc, Node::Map(_)) && !doc.is_blank() {
            return Err(ParamError::shape(self.name(), "document map", doc));
        }
        let mut scratch = self.root.clone();
        scratch.load(doc)?;
        self.root = scratch;
        Ok(())
    }

    pub fn save_str(&self, format: Format, full: bool) -> Result<String, ParamError> {
        format.render(&self.to_document(full)).inspect_err(|err| {
            tracing::error!(tree = self.name(), %format, error = %err, "failed to render parameters");
        })
    }

    pub fn load_str(&mut self, format: Format, text: &str) -> Result<(), ParamError> {
        let result = format
            .parse(text)
            .and_then(|doc| self.load_document(&doc));
        match &result {
            Ok(()) => tracing::debug!(tree = self.name(), %format, "loaded parameters"),
            Err(err) => {
                tracing::warn!(tree = self.name(), %format, error = %err, "failed to load parameters")
            }
        }
        result
    }

    /// Save to `path`, choosing the format from its extension.
    ///
    /// An unrecognised extension fails before the file system is touched.
    pub fn save_file(&self, path: impl AsRef<Path>, full: bool) -> Result<(), ParamError> {
        let path = path.as_ref();
        let format = Format::from_path(path).inspect_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "refusing to save parameters");
        })?;
        self.save_file_as(path, format, full)
    }

    pub fn save_file_as(
        &self,
        path: impl AsRef<Path>,
        format: Format,
        full: bool,
    ) -> Result<(), ParamError> {
        let path = path.as_ref();
        let text = self.save_str(format, full)?;
        fs::write(path, text).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "failed to write parameters");
            ParamError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(tree = self.name(), path = %path.display(), full, "saved parameters");
        Ok(())
    }

    /// Load from `path`, choosing the format from its extension.
    ///
    /// An unrecognised extension fails before the file system is touched.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ParamError> {
        let path = path.as_ref();
        let format = Format::from_path(path).inspect_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "refusing to load parameters");
        })?;
        self.load_file_as(path, format)
    }

    pub fn load_file_as(&mut self, path: impl AsRef<Path>, format: Format) -> Result<(), ParamError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "failed to read parameters");
            ParamError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.load_str(format, &text)?;
        tracing::info!(tree = self.name(), path = %path.display(), "loaded parameters");
        Ok(())
    }

    /// Set the leaf at `"<group>.<leaf>"` from text.
    pub fn set_property(&mut self, path: &str, text: &str) -> Result<(), ParamError> {
        self.index
            .set(&mut self.root, path, text)
            .inspect_err(|err| tracing::warn!(path, error = %err, "property not set"))
    }

    /// Text of the leaf at `"<group>.<leaf>"`.
    pub fn get_property(&self, path: &str) -> Result<String, ParamError> {
        self.index.get(&self.root, path)
    }

    pub fn property_paths(&self) -> impl Iterator<Item = &str> {
        self.index.paths()
    }

    /// Apply a `"<group>.<leaf>=<value>"` assignment.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ParamError> {
        let (path, text) = assignment
            .split_once('=')
            .ok_or_else(|| ParamError::UnknownProperty(assignment.to_string()))?;
        self.set_property(path.trim(), text.trim())
    }

    /// Apply assignments in order, stopping at the first failure.
    pub fn apply_overrides<'a>(
        &mut self,
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ParamError> {
        for assignment in assignments {
            self.apply_override(assignment)?;
        }
        Ok(())
    }

    /// Metadata rows for every named property, in schema order.
    pub fn properties(&self) -> Vec<PropertyInfo> {
        self.index.describe(&self.root)
    }
}

impl<G: Schema> Deref for ParamTree<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.root
    }
}

impl<G: Schema> DerefMut for ParamTree<G> {
    fn deref_mut(&mut self) -> &mut G {
        &mut self.root
    }
}

impl<G: Schema> PartialEq for ParamTree<G> {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}
