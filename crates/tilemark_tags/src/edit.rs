//! # Validated Editing
//!
//! Reads and writes go through a [`TagPath`] and an expected [`TagKind`].
//! A write only ever replaces an existing node with a value of the same
//! kind, so the shape of the tree never changes underneath its owner.
//!
//! [`TagPatch`] groups several writes into one all-or-nothing edit:
//!
//! 1. every target is resolved and kind-checked against the current tree
//! 2. only then are the values written
//! 3. the previous values come back as an inverse patch, so a caller whose
//!    later save fails can put the tree back exactly as it was

use tracing::debug;

use crate::error::{TagError, TagResult};
use crate::path::{PathSegment, TagPath};
use crate::tag::{Tag, TagKind};

/// Resolves a path to a node.
///
/// # Errors
///
/// - `MissingField` if a compound lacks a named child
/// - `IndexOutOfRange` if a list is too short
/// - `WrongKind` if a step walks into a node that is not a container
pub fn resolve<'t>(tree: &'t Tag, path: &TagPath) -> TagResult<&'t Tag> {
    let mut node = tree;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step(node, segment, path, depth)?;
    }
    Ok(node)
}

fn step<'t>(node: &'t Tag, segment: &PathSegment, path: &TagPath, depth: usize) -> TagResult<&'t Tag> {
    match (segment, node) {
        (PathSegment::Key(name), Tag::Compound(children)) => {
            children.get(name).ok_or_else(|| TagError::MissingField {
                path: path.prefix(depth + 1).to_string(),
            })
        }
        (PathSegment::Index(index), Tag::List(items)) => {
            items.get(*index).ok_or_else(|| TagError::IndexOutOfRange {
                path: path.prefix(depth + 1).to_string(),
                len: items.len(),
            })
        }
        (PathSegment::Key(_), other) => Err(wrong_kind(path, depth, TagKind::Compound, other)),
        (PathSegment::Index(_), other) => Err(wrong_kind(path, depth, TagKind::List, other)),
    }
}

fn resolve_mut<'t>(tree: &'t mut Tag, path: &TagPath) -> TagResult<&'t mut Tag> {
    let mut node = tree;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = match (segment, node) {
            (PathSegment::Key(name), Tag::Compound(children)) => {
                children.get_mut(name).ok_or_else(|| TagError::MissingField {
                    path: path.prefix(depth + 1).to_string(),
                })?
            }
            (PathSegment::Index(index), Tag::List(items)) => {
                let len = items.len();
                items.get_mut(*index).ok_or_else(|| TagError::IndexOutOfRange {
                    path: path.prefix(depth + 1).to_string(),
                    len,
                })?
            }
            (PathSegment::Key(_), other) => {
                return Err(wrong_kind(path, depth, TagKind::Compound, other))
            }
            (PathSegment::Index(_), other) => {
                return Err(wrong_kind(path, depth, TagKind::List, other))
            }
        };
    }
    Ok(node)
}

fn wrong_kind(path: &TagPath, depth: usize, expected: TagKind, found: &Tag) -> TagError {
    TagError::WrongKind {
        path: path.prefix(depth).to_string(),
        expected,
        found: found.kind(),
    }
}

/// Reads a node and checks its kind.
///
/// # Errors
///
/// Any [`resolve`] error, or `WrongKind` if the node is not `expected`.
pub fn read_field<'t>(tree: &'t Tag, path: &TagPath, expected: TagKind) -> TagResult<&'t Tag> {
    let node = resolve(tree, path)?;
    if node.kind() == expected {
        Ok(node)
    } else {
        Err(TagError::WrongKind {
            path: path.to_string(),
            expected,
            found: node.kind(),
        })
    }
}

/// Reads a list with an exact length whose elements all have one kind.
///
/// # Errors
///
/// Any [`read_field`] error, `WrongLength`, or `WrongKind` for the first
/// element of the wrong kind.
pub fn read_list<'t>(
    tree: &'t Tag,
    path: &TagPath,
    len: usize,
    element: TagKind,
) -> TagResult<&'t [Tag]> {
    let items = read_field(tree, path, TagKind::List)?
        .as_list()
        .unwrap_or(&[]);
    if items.len() != len {
        return Err(TagError::WrongLength {
            path: path.to_string(),
            expected: len,
            found: items.len(),
        });
    }
    if let Some((index, bad)) = items.iter().enumerate().find(|(_, t)| t.kind() != element) {
        return Err(TagError::WrongKind {
            path: path.clone().index(index).to_string(),
            expected: element,
            found: bad.kind(),
        });
    }
    Ok(items)
}

/// Replaces an existing node with a value of the same kind.
///
/// Returns the previous value. On error the tree is untouched.
///
/// # Errors
///
/// Any [`resolve`] error, or `WrongKind` if `value` has a different kind
/// from the stored node.
pub fn write_field(tree: &mut Tag, path: &TagPath, value: Tag) -> TagResult<Tag> {
    let node = resolve_mut(tree, path)?;
    if node.kind() != value.kind() {
        return Err(TagError::WrongKind {
            path: path.to_string(),
            expected: node.kind(),
            found: value.kind(),
        });
    }
    Ok(std::mem::replace(node, value))
}

/// A group of writes applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagPatch {
    writes: Vec<(TagPath, Tag)>,
}

impl TagPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a write.
    #[must_use]
    pub fn set(mut self, path: TagPath, value: Tag) -> Self {
        self.writes.push((path, value));
        self
    }

    /// Number of writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if the patch writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Checks every write against the tree without touching it.
    ///
    /// # Errors
    ///
    /// The first failing write's error.
    pub fn validate(&self, tree: &Tag) -> TagResult<()> {
        for (path, value) in &self.writes {
            read_field(tree, path, value.kind()).map_err(|e| match e {
                TagError::WrongKind { path, expected, found } => TagError::WrongKind {
                    path,
                    expected: found,
                    found: expected,
                },
                other => other,
            })?;
        }
        Ok(())
    }

    /// Validates, then applies every write.
    ///
    /// Writes go to a working copy that replaces `tree` only once all of
    /// them succeeded, so a later write into a container an earlier write
    /// replaced cannot leave the tree half edited.
    ///
    /// Returns the inverse patch; applying it restores the previous values.
    ///
    /// # Errors
    ///
    /// Any validation or write error. Nothing is written in that case.
    pub fn apply(self, tree: &mut Tag) -> TagResult<TagPatch> {
        self.validate(tree)?;

        let mut staged = tree.clone();
        let mut undo = Vec::with_capacity(self.writes.len());
        for (path, value) in self.writes {
            let previous = write_field(&mut staged, &path, value)?;
            undo.push((path, previous));
        }
        *tree = staged;
        undo.reverse();
        debug!(writes = undo.len(), "tag patch applied");
        Ok(TagPatch { writes: undo })
    }
}
