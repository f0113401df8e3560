//! Declarative parameter trees.
//!
//! A parameter tree is a nested structure of named, typed values declared
//! once with [`param_group!`]. Every leaf remembers its compiled-in default,
//! so a tree can report whether it changed, be compared and copied as a
//! whole, and be saved either in full or as a diff holding only what
//! differs from the defaults. Trees persist to XML or YAML, chosen from the
//! file extension.
//!
//! # Node kinds
//!
//! - [`Param`]: a typed scalar leaf.
//! - [`Limited`]: a leaf whose value is held inside `[min, max]`.
//! - [`Property`]: a leaf with a description, addressable by path through
//!   the tree's [`PropertyIndex`].
//! - [`Group`]: a nested schema.
//! - [`Sequence`] / [`CountedSequence`]: ordered lists of elements.
//! - [`Collection`] / [`CountedCollection`]: key-ordered maps of elements.
//!
//! # Example
//!
//! ```
//! use paramtree::{param_group, Format, Group, Limited, ParamTree, PlainProperty};
//!
//! param_group! {
//!     pub struct Output {
//!         pub quality: Limited<u32> = (80, 0, 100),
//!         pub path: PlainProperty<String> = ("out.png".to_string(), "Target file"),
//!     }
//! }
//!
//! param_group! {
//!     pub struct Job {
//!         pub output: Group<Output>,
//!     }
//! }
//!
//! let mut job: ParamTree<Job> = ParamTree::new("job");
//! job.output.quality.set(95);
//! job.set_property("output.path", "final.png").unwrap();
//!
//! let text = job.save_str(Format::Yaml, false).unwrap();
//! let mut copy: ParamTree<Job> = ParamTree::new("job");
//! copy.load_str(Format::Yaml, &text).unwrap();
//! assert!(copy == job);
//! ```

#[macro_use]
mod macros;

mod collection;
mod document;
mod error;
mod field;
pub mod format;
mod group;
mod leaf;
pub mod logging;
mod property;
mod sequence;
mod tree;
mod value;

pub use collection::{Collection, CountedCollection};
pub use document::{Node, COUNT, ITEM, KEY, VALUE};
pub use error::{ParamError, ValueError};
pub use field::{Child, Element, Field, Schema};
pub use format::Format;
pub use group::Group;
pub use leaf::{Leaf, Limited, Param};
pub use property::{LimitedProperty, PlainProperty, Property, PropertyIndex, PropertyInfo};
pub use sequence::{CountedSequence, Sequence};
pub use tree::ParamTree;
pub use value::{decode_scalar, ParamValue};
