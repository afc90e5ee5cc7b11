//! # Markers
//!
//! A marker is an immutable labeled point at integer block coordinates in
//! one dimension. Two markers are equal when their coordinates, dimension
//! and icon key match, regardless of which instance carries them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tilemark_shared::{ChunkCoord, Dimension, IconKey, IconProvider};

/// Identity of a marker: coordinates, dimension id and icon key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerKey {
    /// Block X.
    pub x: i32,
    /// Block Y.
    pub y: i32,
    /// Block Z.
    pub z: i32,
    /// Dimension id.
    pub dimension_id: i32,
    /// Icon identity.
    pub icon: IconKey,
}

/// A point of interest on the map.
#[derive(Clone, Debug)]
pub struct Marker {
    /// Block X.
    pub x: i32,
    /// Block Y.
    pub y: i32,
    /// Block Z.
    pub z: i32,
    /// Dimension the marker lives in.
    pub dimension: Dimension,
    /// Icon, also the filter category.
    pub icon: Arc<dyn IconProvider>,
    /// User-created (true) or built-in such as spawn and player (false).
    pub is_custom: bool,
}

impl Marker {
    /// Creates a marker.
    #[must_use]
    pub fn new(
        x: i32,
        y: i32,
        z: i32,
        dimension: Dimension,
        icon: Arc<dyn IconProvider>,
        is_custom: bool,
    ) -> Self {
        Self {
            x,
            y,
            z,
            dimension,
            icon,
            is_custom,
        }
    }

    /// Identity key.
    #[must_use]
    pub fn key(&self) -> MarkerKey {
        MarkerKey {
            x: self.x,
            y: self.y,
            z: self.z,
            dimension_id: self.dimension.id,
            icon: self.icon.key().clone(),
        }
    }

    /// Same icon and custom flag at a new position.
    #[must_use]
    pub fn copy_to(&self, x: i32, y: i32, z: i32, dimension: Dimension) -> Self {
        Self {
            x,
            y,
            z,
            dimension,
            icon: Arc::clone(&self.icon),
            is_custom: self.is_custom,
        }
    }

    /// Display name of the icon.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.icon.display_name()
    }

    /// Chunk containing the marker.
    #[must_use]
    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::from_block(self.x, self.z, &self.dimension)
    }

    /// One-line coordinate summary for marker lists.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("x: {}, y: {}, z: {}", self.x, self.y, self.z)
    }

    /// Multi-line description for the marker info dialog.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} ({})\n{}\n{}",
            self.display_name(),
            self.icon.key(),
            self.summary(),
            self.dimension
        )
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.dimension == other.dimension
            && self.icon.key() == other.icon.key()
    }
}

impl Eq for Marker {}

impl Hash for Marker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{} [{}] ({})",
            self.x,
            self.y,
            self.z,
            self.dimension,
            self.display_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemark_shared::{CustomIcon, EntityKind, NamedIcon};

    fn player() -> Arc<dyn IconProvider> {
        Arc::new(EntityKind::PLAYER)
    }

    #[test]
    fn test_equality_ignores_instance_and_display_name() {
        let a = Marker::new(1, 2, 3, Dimension::OVERWORLD, player(), false);
        let renamed: Arc<dyn IconProvider> = Arc::new(NamedIcon::new(player(), "Alex"));
        let b = Marker::new(1, 2, 3, Dimension::OVERWORLD, renamed, true);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());

        let other_dim = a.copy_to(1, 2, 3, Dimension::NETHER);
        assert_ne!(a, other_dim);

        let other_icon = Marker::new(1, 2, 3, Dimension::OVERWORLD, Arc::new(CustomIcon::spawn()), false);
        assert_ne!(a, other_icon);
    }

    #[test]
    fn test_copy_keeps_icon_and_flag() {
        let home: Arc<dyn IconProvider> = Arc::new(CustomIcon::named("blue_marker", "Home"));
        let marker = Marker::new(0, 64, 0, Dimension::OVERWORLD, home, true);
        let moved = marker.copy_to(-5, 70, 12, Dimension::END);
        assert!(moved.is_custom);
        assert_eq!(moved.display_name(), "Home");
        assert_eq!(moved.dimension, Dimension::END);
    }

    #[test]
    fn test_summary_and_display() {
        let marker = Marker::new(-17, 64, 5, Dimension::NETHER, player(), false);
        assert_eq!(marker.summary(), "x: -17, y: 64, z: 5");
        assert_eq!(marker.to_string(), "-17;64;5 [Nether] (Player)");
        assert_eq!(marker.chunk(), ChunkCoord::new(-2, 0));
        assert!(marker.describe().starts_with("Player (entity.player)\n"));
    }
}
