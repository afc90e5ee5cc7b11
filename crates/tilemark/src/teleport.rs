//! # Teleport
//!
//! Moves a player record to a new position and dimension.
//!
//! The record's first tag must be a compound with a `Pos` list of exactly
//! three `Float`s and an `Int` `DimensionId`. All of that is checked before
//! a single field is written. If the save fails afterwards, the in-memory
//! tree is put back to its previous values.

use tilemark_shared::Dimension;
use tilemark_tags::{read_field, read_list, Tag, TagKind, TagPatch, TagPath, TagResult};
use tracing::{info, warn};

use crate::contracts::{BlockPos, EditableTags, PlayerPosition};
use crate::error::{MapError, MapResult};

/// Position list field of an entity record.
pub const POS_FIELD: &str = "Pos";

/// Dimension id field of an entity record.
pub const DIMENSION_FIELD: &str = "DimensionId";

/// Where to put the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportTarget {
    /// World X to store.
    pub x: f32,
    /// World Y to store.
    pub y: f32,
    /// World Z to store.
    pub z: f32,
    /// Dimension to store.
    pub dimension: Dimension,
}

impl TeleportTarget {
    /// Center of a block: each coordinate plus one half.
    #[must_use]
    pub fn block_center(x: i32, y: i32, z: i32, dimension: Dimension) -> Self {
        Self {
            x: x as f32 + 0.5,
            y: y as f32 + 0.5,
            z: z as f32 + 0.5,
            dimension,
        }
    }

    /// Exact coordinates, no offset.
    #[must_use]
    pub const fn exact(x: f32, y: f32, z: f32, dimension: Dimension) -> Self {
        Self { x, y, z, dimension }
    }

    /// Block containing the target.
    #[must_use]
    pub fn block(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

fn pos_path() -> TagPath {
    TagPath::root().key(POS_FIELD)
}

fn dimension_path() -> TagPath {
    TagPath::root().key(DIMENSION_FIELD)
}

/// Reads the stored position of an entity compound.
///
/// # Errors
///
/// Any shape error of `Pos` or `DimensionId`.
pub fn read_position(root: &Tag) -> TagResult<PlayerPosition> {
    let pos = read_list(root, &pos_path(), 3, TagKind::Float)?;
    let coord = |i: usize| pos[i].as_float().unwrap_or_default();
    let dimension_id = read_field(root, &dimension_path(), TagKind::Int)?
        .as_int()
        .unwrap_or_default();
    Ok(PlayerPosition {
        x: coord(0),
        y: coord(1),
        z: coord(2),
        dimension_id,
    })
}

/// Builds the validated edit that moves an entity compound.
///
/// # Errors
///
/// Any shape error of `Pos` or `DimensionId`. Nothing is written.
pub fn teleport_patch(root: &Tag, target: &TeleportTarget) -> TagResult<TagPatch> {
    read_position(root)?;
    let patch = TagPatch::new()
        .set(pos_path().index(0), Tag::Float(target.x))
        .set(pos_path().index(1), Tag::Float(target.y))
        .set(pos_path().index(2), Tag::Float(target.z))
        .set(dimension_path(), Tag::Int(target.dimension.id));
    patch.validate(root)?;
    Ok(patch)
}

/// Validates, writes and saves a teleport on an editable record.
///
/// # Errors
///
/// - `NotFound` if the record holds no tags
/// - `Validation` if the shape is wrong; nothing was written
/// - `Persistence` if saving failed; the tree was rolled back
pub fn teleport_record(record: &mut dyn EditableTags, target: &TeleportTarget) -> MapResult<()> {
    let undo = {
        let root = record
            .tags_mut()
            .first_mut()
            .ok_or_else(|| MapError::NotFound("player record".into()))?;
        let patch = teleport_patch(root, target)?;
        patch.apply(root)?
    };

    if let Err(err) = record.save() {
        warn!(%err, "saving teleported player failed, rolling back");
        if let Some(root) = record.tags_mut().first_mut() {
            undo.apply(root)?;
        }
        return Err(err.into());
    }

    info!(
        x = target.x,
        y = target.y,
        z = target.z,
        dimension = %target.dimension,
        "player teleported"
    );
    Ok(())
}
