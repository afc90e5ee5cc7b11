//! # Dimension Registry
//!
//! Static catalog of world dimensions. A dimension is read-only after startup
//! and is referenced (copied by value) by markers, never owned by them.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Which tile renderer a dimension opens with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Top-down satellite view of the overworld.
    OverworldSatellite,
    /// Cave-cut view of the nether.
    Nether,
    /// Satellite view of the end.
    EndSatellite,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OverworldSatellite => "overworld satellite",
            Self::Nether => "nether",
            Self::EndSatellite => "end satellite",
        };
        f.write_str(name)
    }
}

/// A distinct world layer with its own chunk size and coordinate scale.
///
/// Equality and hashing only look at `id`.
#[derive(Clone, Copy, Debug)]
pub struct Dimension {
    /// Numeric id, as stored in entity data (`DimensionId`).
    pub id: i32,
    /// Stable lowercase key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Chunk width in blocks (X axis).
    pub chunk_w: u32,
    /// Chunk length in blocks (Z axis).
    pub chunk_l: u32,
    /// Multiplier taking block coordinates into shared tile space.
    pub scale: f64,
    /// View mode selected when switching to this dimension.
    pub default_view: ViewMode,
}

impl Dimension {
    /// The overworld.
    pub const OVERWORLD: Self = Self {
        id: 0,
        key: "overworld",
        name: "Overworld",
        chunk_w: 16,
        chunk_l: 16,
        scale: 1.0,
        default_view: ViewMode::OverworldSatellite,
    };

    /// The nether. One nether block covers eight overworld blocks.
    pub const NETHER: Self = Self {
        id: 1,
        key: "nether",
        name: "Nether",
        chunk_w: 16,
        chunk_l: 16,
        scale: 8.0,
        default_view: ViewMode::Nether,
    };

    /// The end.
    pub const END: Self = Self {
        id: 2,
        key: "end",
        name: "End",
        chunk_w: 16,
        chunk_l: 16,
        scale: 1.0,
        default_view: ViewMode::EndSatellite,
    };
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lookup table of all known dimensions.
///
/// Built once at startup and passed explicitly to whoever needs it.
#[derive(Clone, Debug)]
pub struct DimensionRegistry {
    dimensions: Vec<Dimension>,
}

impl DimensionRegistry {
    /// Creates a registry from an explicit list.
    #[must_use]
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// The three built-in dimensions.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![Dimension::OVERWORLD, Dimension::NETHER, Dimension::END])
    }

    /// Finds a dimension by its numeric id.
    #[must_use]
    pub fn by_id(&self, id: i32) -> Option<Dimension> {
        self.dimensions.iter().copied().find(|d| d.id == id)
    }

    /// Finds a dimension by its key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<Dimension> {
        self.dimensions.iter().copied().find(|d| d.key == key)
    }

    /// Iterates over every registered dimension.
    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    /// Number of registered dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns true if no dimension is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = DimensionRegistry::builtin();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.by_id(1), Some(Dimension::NETHER));
        assert_eq!(registry.by_key("end").map(|d| d.id), Some(2));
        assert!(registry.by_id(42).is_none());
    }

    #[test]
    fn test_equality_is_by_id() {
        let renamed = Dimension {
            name: "Surface",
            ..Dimension::OVERWORLD
        };
        assert_eq!(renamed, Dimension::OVERWORLD);
        assert_ne!(Dimension::OVERWORLD, Dimension::END);
    }

    #[test]
    fn test_nether_scale() {
        assert!((Dimension::NETHER.scale - 8.0).abs() < f64::EPSILON);
        assert_eq!(Dimension::NETHER.default_view, ViewMode::Nether);
    }
}
