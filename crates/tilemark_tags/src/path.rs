//! # Tag Paths
//!
//! A path names one node inside a tree: `Pos[1]`, `Abilities.flying`,
//! `Inventory[0].Count`. The empty path names the root.

use std::fmt;
use std::str::FromStr;

use crate::error::TagError;

/// One step of a [`TagPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Child of a compound.
    Key(String),
    /// Element of a list.
    Index(usize),
}

/// Location of a node in a tag tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagPath {
    segments: Vec<PathSegment>,
}

impl TagPath {
    /// The root path.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Appends a compound key.
    #[must_use]
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(name.into()));
        self
    }

    /// Appends a list index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Segments from the root down.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The first `len` segments as their own path (used in error messages).
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if i == 0 => f.write_str(name)?,
                PathSegment::Key(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for TagPath {
    type Err = TagError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || TagError::InvalidPath(input.to_string());
        let mut path = Self::root();
        if input.is_empty() {
            return Ok(path);
        }

        for part in input.split('.') {
            let (name, mut rest) = match part.find('[') {
                Some(open) => (&part[..open], &part[open..]),
                None => (part, ""),
            };
            if name.is_empty() && (path.is_root() || rest.is_empty()) {
                return Err(invalid());
            }
            if !name.is_empty() {
                path = path.key(name);
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(invalid)?;
                if !rest.starts_with('[') {
                    return Err(invalid());
                }
                let index = rest[1..close].parse::<usize>().map_err(|_| invalid())?;
                path = path.index(index);
                rest = &rest[close + 1..];
            }
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path: TagPath = "Inventory[0].Count".parse().expect("valid path");
        assert_eq!(
            path,
            TagPath::root().key("Inventory").index(0).key("Count")
        );
        assert_eq!(path.to_string(), "Inventory[0].Count");

        let pos: TagPath = "Pos[2]".parse().expect("valid path");
        assert_eq!(pos, TagPath::root().key("Pos").index(2));

        let nested: TagPath = "Grid[1][3]".parse().expect("valid path");
        assert_eq!(nested.segments().len(), 3);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["Pos[", "Pos[x]", "a..b", ".a", "Pos]1["] {
            assert!(bad.parse::<TagPath>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_root() {
        let root: TagPath = "".parse().expect("empty path is root");
        assert!(root.is_root());
        assert_eq!(root.to_string(), "<root>");
    }
}
