//! # Collaborator Contracts
//!
//! Traits the embedding application implements so the map session can reach
//! the world without knowing how it is stored or drawn.
//!
//! ```text
//! Session needs:         Application provides:
//! ┌──────────────────┐   ┌──────────────────────────────┐
//! │ WorldContext     │ ← │ dimension, visibility, editor│
//! │ WorldData        │ ← │ chunk / player tag storage   │
//! │ MarkerPersistence│ ← │ the user's custom marker book│
//! │ MarkerCanvas     │ ← │ the tile view                │
//! └──────────────────┘   └──────────────────────────────┘
//! ```
//!
//! [`WorldData`] is shared with the background worker and must therefore
//! be `Send + Sync`. Everything else stays on the owning thread.

use std::fmt;
use std::sync::Arc;

use tilemark_markers::Marker;
use tilemark_shared::{ChunkCoord, CustomIcon, Dimension};
use tilemark_tags::Tag;

use crate::error::{MarkerFieldError, StorageResult};

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Which tag list of a chunk to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkDataKind {
    /// Mobs, items, vehicles.
    Entity,
    /// Chests, signs, spawners.
    BlockEntity,
}

impl fmt::Display for ChunkDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity => f.write_str("chunk entity data"),
            Self::BlockEntity => f.write_str("chunk block entity data"),
        }
    }
}

/// A player whose stored data can be read or edited.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// The player owning the world.
    LocalPlayer,
    /// A multiplayer player, by stored name.
    NetworkPlayer(String),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPlayer => f.write_str("local player"),
            Self::NetworkPlayer(name) => write!(f, "player {name}"),
        }
    }
}

/// Stored position of a player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPosition {
    /// World X.
    pub x: f32,
    /// World Y.
    pub y: f32,
    /// World Z.
    pub z: f32,
    /// Stored `DimensionId`.
    pub dimension_id: i32,
}

impl PlayerPosition {
    /// Block containing the position.
    #[must_use]
    pub fn block(&self) -> BlockPos {
        BlockPos {
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
            z: self.z.floor() as i32,
        }
    }
}

/// Integer block position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    /// Block X.
    pub x: i32,
    /// Block Y.
    pub y: i32,
    /// Block Z.
    pub z: i32,
}

impl BlockPos {
    /// Creates a block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

// ============================================================================
// WORLD CONTEXT (owning thread)
// ============================================================================

/// State of the surrounding world screen.
pub trait WorldContext {
    /// Dimension currently shown.
    fn active_dimension(&self) -> Dimension;

    /// Switches the shown dimension (and its tile renderer).
    fn set_dimension(&mut self, dimension: Dimension);

    /// Whether markers are shown at all.
    fn markers_visible(&self) -> bool;

    /// Shows or hides markers.
    fn set_markers_visible(&mut self, visible: bool);

    /// Opens a tag editor over a list of tags (chunk entity data).
    fn open_tag_editor(&mut self, title: &str, tags: Vec<Tag>);
}

// ============================================================================
// WORLD DATA (shared with the worker)
// ============================================================================

/// A stored tag list that can be edited and written back.
pub trait EditableTags: Send {
    /// Top-level tags of the record. A player record holds one compound.
    fn tags_mut(&mut self) -> &mut Vec<Tag>;

    /// Writes the tags back to storage.
    ///
    /// # Errors
    ///
    /// Any storage failure. The stored record is then unchanged.
    fn save(&mut self) -> StorageResult<()>;
}

/// Read access to the stored world.
pub trait WorldData: Send + Sync {
    /// Entity or block-entity tags of one chunk.
    ///
    /// # Errors
    ///
    /// Any storage failure.
    fn chunk_tags(
        &self,
        chunk: ChunkCoord,
        dimension: Dimension,
        kind: ChunkDataKind,
    ) -> StorageResult<Vec<Tag>>;

    /// Drops cached chunks.
    fn reset_cache(&self);

    /// Names of the stored multiplayer players. Empty if there are none.
    ///
    /// # Errors
    ///
    /// Any storage failure, distinct from an empty list.
    fn network_player_names(&self) -> StorageResult<Vec<String>>;

    /// Stored position of a player, `None` if the player has no data.
    ///
    /// # Errors
    ///
    /// Any storage failure.
    fn player_position(&self, player: &EntityRef) -> StorageResult<Option<PlayerPosition>>;

    /// World spawn, `None` if the level data has none.
    ///
    /// # Errors
    ///
    /// Any storage failure.
    fn spawn_position(&self) -> StorageResult<Option<BlockPos>>;

    /// Editable record of a player, `None` if the player has no data.
    ///
    /// # Errors
    ///
    /// Any storage failure.
    fn editable_entity(&self, entity: &EntityRef) -> StorageResult<Option<Box<dyn EditableTags>>>;
}

// ============================================================================
// MARKER PERSISTENCE (owning thread)
// ============================================================================

/// The user's book of custom markers.
pub trait MarkerPersistence {
    /// Records a marker. `persist` marks the book dirty for the next save.
    fn add(&mut self, marker: &Marker, persist: bool);

    /// Forgets a marker. `persist` marks the book dirty for the next save.
    fn remove(&mut self, marker: &Marker, persist: bool);

    /// Writes the book.
    ///
    /// # Errors
    ///
    /// Any storage failure.
    fn save(&mut self) -> StorageResult<()>;

    /// Builds a custom marker from form fields.
    ///
    /// # Errors
    ///
    /// See [`validate_marker_fields`].
    fn build_from_fields(
        &self,
        name: &str,
        icon: &str,
        x: i32,
        y: i32,
        z: i32,
        dimension: Dimension,
    ) -> Result<Marker, MarkerFieldError> {
        validate_marker_fields(name, icon)?;
        Ok(Marker::new(
            x,
            y,
            z,
            dimension,
            Arc::new(CustomIcon::named(icon, name)),
            true,
        ))
    }
}

/// Name and icon must be non-empty and free of `"`.
///
/// # Errors
///
/// The first failing field.
pub fn validate_marker_fields(name: &str, icon: &str) -> Result<(), MarkerFieldError> {
    if name.is_empty() {
        return Err(MarkerFieldError::EmptyName);
    }
    if name.contains('"') {
        return Err(MarkerFieldError::QuoteInName);
    }
    if icon.is_empty() {
        return Err(MarkerFieldError::EmptyIcon);
    }
    if icon.contains('"') {
        return Err(MarkerFieldError::QuoteInIcon);
    }
    Ok(())
}

/// Parses one typed coordinate.
///
/// # Errors
///
/// `InvalidCoordinate` naming the axis.
pub fn parse_coordinate(axis: char, input: &str) -> Result<i32, MarkerFieldError> {
    input
        .trim()
        .parse()
        .map_err(|_| MarkerFieldError::InvalidCoordinate {
            axis,
            input: input.to_string(),
        })
}
