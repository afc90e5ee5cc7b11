//! # Tilemark Tags
//!
//! Generic tree-tag protocol for persisted world state (players, entities,
//! block entities). The storage layer decodes bytes into a [`Tag`] tree and
//! encodes it back; this crate only navigates and edits the tree.
//!
//! ## Editing Contract
//!
//! ```text
//! read_field(tree, path, kind)   -> &Tag | MissingField | WrongKind | IndexOutOfRange
//! write_field(tree, path, value) -> old  | (same errors, tree untouched)
//! TagPatch::apply(tree)          -> inverse patch | first validation error
//! ```
//!
//! A patch validates every write before performing any of them, so a tree
//! handed to the storage layer is never half edited.

#![deny(unsafe_code)]

pub mod edit;
pub mod error;
pub mod path;
pub mod tag;

pub use edit::{read_field, read_list, resolve, write_field, TagPatch};
pub use error::{TagError, TagResult};
pub use path::{PathSegment, TagPath};
pub use tag::{Tag, TagKind};
