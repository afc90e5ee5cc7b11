//! # Tag Values
//!
//! A tag is a discriminated value: a [`Tag::Compound`] maps names to tags, a
//! [`Tag::List`] holds an ordered sequence, everything else is a scalar or
//! a packed array leaf.

use std::collections::BTreeMap;
use std::fmt;

/// Discriminant of a [`Tag`], used when validating expected shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// 8-bit integer.
    Byte,
    /// 16-bit integer.
    Short,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Packed bytes.
    ByteArray,
    /// UTF-8 text.
    String,
    /// Ordered sequence of tags.
    List,
    /// Named children.
    Compound,
    /// Packed 32-bit integers.
    IntArray,
    /// Packed 64-bit integers.
    LongArray,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::ByteArray => "ByteArray",
            Self::String => "String",
            Self::List => "List",
            Self::Compound => "Compound",
            Self::IntArray => "IntArray",
            Self::LongArray => "LongArray",
        };
        f.write_str(name)
    }
}

/// A node of a tag tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    /// 8-bit integer.
    Byte(i8),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Packed bytes.
    ByteArray(Vec<i8>),
    /// UTF-8 text.
    String(String),
    /// Ordered sequence of tags.
    List(Vec<Tag>),
    /// Named children. Order is irrelevant.
    Compound(BTreeMap<String, Tag>),
    /// Packed 32-bit integers.
    IntArray(Vec<i32>),
    /// Packed 64-bit integers.
    LongArray(Vec<i64>),
}

impl Tag {
    /// Empty compound.
    #[must_use]
    pub fn compound() -> Self {
        Self::Compound(BTreeMap::new())
    }

    /// Builder helper: inserts a child into a compound and returns it.
    ///
    /// Non-compound tags are returned unchanged.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Tag) -> Self {
        if let Self::Compound(children) = &mut self {
            children.insert(name.into(), value);
        }
        self
    }

    /// List of float leaves.
    #[must_use]
    pub fn float_list(values: &[f32]) -> Self {
        Self::List(values.iter().copied().map(Self::Float).collect())
    }

    /// Discriminant of this tag.
    #[must_use]
    pub const fn kind(&self) -> TagKind {
        match self {
            Self::Byte(_) => TagKind::Byte,
            Self::Short(_) => TagKind::Short,
            Self::Int(_) => TagKind::Int,
            Self::Long(_) => TagKind::Long,
            Self::Float(_) => TagKind::Float,
            Self::Double(_) => TagKind::Double,
            Self::ByteArray(_) => TagKind::ByteArray,
            Self::String(_) => TagKind::String,
            Self::List(_) => TagKind::List,
            Self::Compound(_) => TagKind::Compound,
            Self::IntArray(_) => TagKind::IntArray,
            Self::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Named child of a compound.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        match self {
            Self::Compound(children) => children.get(name),
            _ => None,
        }
    }

    /// Integer value, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value, if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Text, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Elements, if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}
