//! # Tag Error Types
//!
//! Every way a tag tree can fail validation.

use thiserror::Error;

use crate::tag::TagKind;

/// Errors raised while navigating or editing a tag tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// A named child is absent.
    #[error("missing field: {path}")]
    MissingField {
        /// Path of the missing field.
        path: String,
    },

    /// A node exists but holds a different kind of value.
    #[error("wrong kind at {path}: expected {expected}, found {found}")]
    WrongKind {
        /// Path of the offending node.
        path: String,
        /// Kind the caller required.
        expected: TagKind,
        /// Kind actually stored.
        found: TagKind,
    },

    /// A list index points past the end of the list.
    #[error("index out of range at {path}: list has {len} elements")]
    IndexOutOfRange {
        /// Path including the bad index.
        path: String,
        /// Actual list length.
        len: usize,
    },

    /// A list has the wrong number of elements.
    #[error("wrong length at {path}: expected {expected} elements, found {found}")]
    WrongLength {
        /// Path of the list.
        path: String,
        /// Required element count.
        expected: usize,
        /// Actual element count.
        found: usize,
    },

    /// A textual path could not be parsed.
    #[error("invalid tag path: {0:?}")]
    InvalidPath(String),
}

/// Result type for tag operations.
pub type TagResult<T> = Result<T, TagError>;
