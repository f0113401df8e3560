//! Neutral document tree shared by the markup and block-text adapters.
//!
//! A document is a tree of three node kinds: scalar text, a map of named
//! children (ordered, names may repeat), and a sequence of anonymous items.
//! Fields read and write this tree; the format adapters translate it to and
//! from concrete syntax.

/// Name of a sequence item child.
pub const ITEM: &str = "item";
/// Name of the persisted element count of a counted sequence or collection.
pub const COUNT: &str = "count";
/// Name of the key child of a keyed-collection item.
pub const KEY: &str = "first";
/// Name of the value child of a keyed-collection item.
pub const VALUE: &str = "second";

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Scalar text.
    Scalar(String),
    /// Named children in document order.
    Map(Vec<(String, Node)>),
    /// Anonymous items in document order.
    Seq(Vec<Node>),
}

impl Default for Node {
    fn default() -> Self {
        Self::map()
    }
}

impl Node {
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::Scalar(text.into())
    }

    /// An empty map.
    pub fn map() -> Self {
        Self::Map(Vec::new())
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Map(_) => "map",
            Self::Seq(_) => "sequence",
        }
    }

    /// The text of a scalar node.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// True for whitespace-only text and for maps or sequences without children.
    ///
    /// Markup cannot tell an empty element from empty text, so readers treat a
    /// blank node as an empty container.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Scalar(text) => text.trim().is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Seq(items) => items.is_empty(),
        }
    }

    /// Named children of a map node; empty for other kinds.
    pub fn entries(&self) -> &[(String, Node)] {
        match self {
            Self::Map(entries) => entries,
            _ => &[],
        }
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.entries()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Every child named `name`, in order.
    ///
    /// A sequence stored under the name contributes each of its items, so a
    /// repeated element and a block-text list read the same way.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.entries()
            .iter()
            .filter(move |(key, _)| key == name)
            .flat_map(|(_, node)| match node {
                Self::Seq(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
    }

    /// Items of a collection node.
    ///
    /// Accepts a sequence, a map of repeated `item` children, or blank text.
    /// Returns `None` when the node holds non-blank scalar text.
    pub fn items(&self) -> Option<Vec<&Node>> {
        match self {
            Self::Seq(items) => Some(items.iter().collect()),
            Self::Map(_) => Some(self.children(ITEM).collect()),
            Self::Scalar(text) if text.trim().is_empty() => Some(Vec::new()),
            Self::Scalar(_) => None,
        }
    }

    /// Append a named child.
    ///
    /// Turns the node into a map first if it is not one already.
    pub fn append(&mut self, name: impl Into<String>, child: Node) {
        if !matches!(self, Self::Map(_)) {
            *self = Self::map();
        }
        if let Self::Map(entries) = self {
            entries.push((name.into(), child));
        }
    }

    /// Builder form of [`Node::append`].
    pub fn with(mut self, name: impl Into<String>, child: Node) -> Self {
        self.append(name, child);
        self
    }
}
