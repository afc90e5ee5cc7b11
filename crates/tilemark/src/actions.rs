//! # Map Actions
//!
//! What the user can do from a tapped marker or a long press on the map.
//! Each action kind is a variant carrying its own input, matched
//! exhaustively; labels come from the same match.

use tilemark_markers::{Marker, MarkerCanvas};
use tilemark_shared::{ChunkCoord, Dimension, WorldPoint};
use tracing::{debug, info, warn};

use crate::contracts::{
    parse_coordinate, ChunkDataKind, EntityRef, MarkerPersistence, WorldContext, WorldData,
};
use crate::error::{MapError, MapResult};
use crate::notice::Notice;
use crate::session::MapSession;
use crate::tasks::{Job, TeleportOrigin, TeleportRequest};
use crate::teleport::TeleportTarget;

/// Options offered when a marker is tapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerTapAction {
    /// Move the local player onto the marker.
    TeleportLocalPlayer,
    /// Delete a custom marker.
    RemoveMarker,
}

impl MarkerTapAction {
    /// Every option, in menu order.
    pub const ALL: [Self; 2] = [Self::TeleportLocalPlayer, Self::RemoveMarker];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TeleportLocalPlayer => "Teleport local player",
            Self::RemoveMarker => "Remove custom marker",
        }
    }
}

/// Options offered on a long press, with the form input they need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LongPressAction {
    /// Move the local player here, at a typed height.
    TeleportLocalPlayer {
        /// Typed Y. Unparseable input falls back to the default height.
        y_input: String,
    },
    /// Create a custom marker from form fields.
    CreateMarker {
        /// Marker name.
        name: String,
        /// Icon name.
        icon: String,
        /// Typed X.
        x: String,
        /// Typed Y.
        y: String,
        /// Typed Z.
        z: String,
    },
    /// Open the pressed chunk's entity tags.
    OpenChunkEntities,
    /// Open the pressed chunk's block-entity tags.
    OpenChunkBlockEntities,
}

impl LongPressAction {
    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TeleportLocalPlayer { .. } => "Teleport local player",
            Self::CreateMarker { .. } => "Create custom marker",
            Self::OpenChunkEntities => "Open chunk entity data",
            Self::OpenChunkBlockEntities => "Open chunk block entity data",
        }
    }
}

/// Where a long press landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressedPosition {
    /// World coordinates under the finger.
    pub world: WorldPoint,
    /// Chunk containing them.
    pub chunk: ChunkCoord,
    /// Active dimension.
    pub dimension: Dimension,
}

impl<W, D, P, C> MapSession<W, D, P, C>
where
    W: WorldContext,
    D: WorldData + 'static,
    P: MarkerPersistence,
    C: MarkerCanvas,
{
    /// World position and chunk under a view pixel.
    #[must_use]
    pub fn pressed_position(&self, pixel_x: f64, pixel_z: f64) -> PressedPosition {
        let dimension = self.world.active_dimension();
        let world = self.geometry.screen_to_world(
            pixel_x,
            pixel_z,
            self.camera.scroll,
            self.camera.scale,
            &dimension,
        );
        PressedPosition {
            world,
            chunk: self.geometry.world_to_chunk(world, &dimension),
            dimension,
        }
    }

    /// Runs a marker tap option.
    ///
    /// Teleports are queued; their outcome arrives through [`Self::pump`].
    ///
    /// # Errors
    ///
    /// `NotRemovable` when removing a built-in marker, `Persistence` if the
    /// marker book cannot be saved.
    pub fn on_marker_tap(&mut self, marker: &Marker, action: MarkerTapAction) -> MapResult<()> {
        debug!(%marker, action = action.label(), "marker tapped");
        let result = match action {
            MarkerTapAction::TeleportLocalPlayer => {
                let target = TeleportTarget::block_center(marker.x, marker.y, marker.z, marker.dimension);
                self.queue_teleport(target, TeleportOrigin::Marker(marker.display_name().to_string()));
                Ok(())
            }
            MarkerTapAction::RemoveMarker => self.remove_custom_marker(marker),
        };
        self.report(result)
    }

    fn remove_custom_marker(&mut self, marker: &Marker) -> MapResult<()> {
        if !marker.is_custom {
            return Err(MapError::NotRemovable);
        }
        // The map only changes once the book is saved.
        self.book.remove(marker, true);
        if let Err(err) = self.book.save() {
            self.book.add(marker, false);
            warn!(%marker, %err, "marker book save failed, marker kept");
            return Err(err.into());
        }
        self.remove_marker(marker);
        info!(%marker, "custom marker removed");
        Ok(())
    }

    /// Runs a long-press option at a view pixel.
    ///
    /// # Errors
    ///
    /// - `MarkerFields` for an invalid create-marker form
    /// - `Persistence` if the marker book cannot be saved
    /// - `LoadFailed` if chunk data cannot be loaded
    pub fn on_long_press(&mut self, pixel_x: f64, pixel_z: f64, action: LongPressAction) -> MapResult<()> {
        let pressed = self.pressed_position(pixel_x, pixel_z);
        debug!(
            x = pressed.world.x,
            z = pressed.world.z,
            chunk_x = pressed.chunk.x,
            chunk_z = pressed.chunk.z,
            action = action.label(),
            "long press"
        );

        let result = match action {
            LongPressAction::TeleportLocalPlayer { y_input } => {
                let y = y_input
                    .trim()
                    .parse::<f32>()
                    .unwrap_or(self.config.default_marker_y as f32);
                let target = TeleportTarget::exact(
                    pressed.world.x as f32,
                    y,
                    pressed.world.z as f32,
                    pressed.dimension,
                );
                self.queue_teleport(target, TeleportOrigin::MapPosition);
                Ok(())
            }
            LongPressAction::CreateMarker { name, icon, x, y, z } => {
                self.create_marker(&name, &icon, &x, &y, &z, pressed.dimension)
            }
            LongPressAction::OpenChunkEntities => self.open_chunk_data(&pressed, ChunkDataKind::Entity),
            LongPressAction::OpenChunkBlockEntities => {
                self.open_chunk_data(&pressed, ChunkDataKind::BlockEntity)
            }
        };
        self.report(result)
    }

    fn queue_teleport(&mut self, target: TeleportTarget, origin: TeleportOrigin) {
        self.submit(Job::Teleport(TeleportRequest {
            entity: EntityRef::LocalPlayer,
            target,
            origin,
        }));
    }

    #[allow(clippy::too_many_arguments)]
    fn create_marker(
        &mut self,
        name: &str,
        icon: &str,
        x: &str,
        y: &str,
        z: &str,
        dimension: Dimension,
    ) -> MapResult<()> {
        let x = parse_coordinate('x', x)?;
        let y = parse_coordinate('y', y)?;
        let z = parse_coordinate('z', z)?;
        let marker = self.book.build_from_fields(name, icon, x, y, z, dimension)?;

        self.book.add(&marker, true);
        if let Err(err) = self.book.save() {
            self.book.remove(&marker, false);
            warn!(%marker, %err, "marker book save failed, marker dropped");
            return Err(err.into());
        }
        self.add_marker(marker);

        self.notices.push(Notice::MarkerCreated {
            name: name.to_string(),
            x,
            y,
            z,
        });
        Ok(())
    }

    fn open_chunk_data(&mut self, pressed: &PressedPosition, kind: ChunkDataKind) -> MapResult<()> {
        let tags = self
            .data
            .chunk_tags(pressed.chunk, pressed.dimension, kind)
            .map_err(|source| MapError::LoadFailed {
                what: kind.to_string(),
                source,
            })?;
        let title = format!(
            "{kind} {};{} [{}]",
            pressed.chunk.x, pressed.chunk.z, pressed.dimension
        );
        self.world.open_tag_editor(&title, tags);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = MarkerTapAction::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["Teleport local player", "Remove custom marker"]);
        assert_eq!(LongPressAction::OpenChunkBlockEntities.label(), "Open chunk block entity data");
        assert_eq!(
            LongPressAction::TeleportLocalPlayer { y_input: "64".into() }.label(),
            "Teleport local player"
        );
    }
}
