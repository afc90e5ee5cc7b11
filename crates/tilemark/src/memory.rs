//! # In-Memory Collaborators
//!
//! Implementations of every contract backed by plain collections. Used by
//! the probe binary and the integration tests, and handy for embedding the
//! session somewhere without a real world store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tilemark_markers::{Marker, MarkerCanvas, MarkerKey};
use tilemark_shared::{ChunkCoord, Dimension, TilePoint};
use tilemark_tags::Tag;
use tracing::debug;

use crate::contracts::{
    BlockPos, ChunkDataKind, EditableTags, EntityRef, MarkerPersistence, PlayerPosition,
    WorldContext, WorldData,
};
use crate::error::{StorageError, StorageResult};
use crate::teleport::{read_position, DIMENSION_FIELD, POS_FIELD};

/// A player record as the storage layer would decode it.
#[must_use]
pub fn player_record(x: f32, y: f32, z: f32, dimension_id: i32) -> Tag {
    Tag::compound()
        .with("identifier", Tag::String("minecraft:player".into()))
        .with(POS_FIELD, Tag::float_list(&[x, y, z]))
        .with("Rotation", Tag::float_list(&[0.0, 0.0]))
        .with(DIMENSION_FIELD, Tag::Int(dimension_id))
}

// ============================================================================
// WORLD DATA
// ============================================================================

#[derive(Debug, Default)]
struct WorldState {
    players: HashMap<EntityRef, Vec<Tag>>,
    chunks: HashMap<(ChunkCoord, i32, ChunkDataKind), Vec<Tag>>,
    spawn: Option<BlockPos>,
    listing_error: Option<StorageError>,
}

#[derive(Debug, Default)]
struct Shared {
    state: RwLock<WorldState>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
    cache_resets: AtomicUsize,
}

/// World data held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorld {
    shared: Arc<Shared>,
}

impl MemoryWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a player record.
    #[must_use]
    pub fn with_player(self, player: EntityRef, record: Tag) -> Self {
        self.shared.state.write().players.insert(player, vec![record]);
        self
    }

    /// Stores the local player at a position.
    #[must_use]
    pub fn with_local_player(self, x: f32, y: f32, z: f32, dimension_id: i32) -> Self {
        self.with_player(EntityRef::LocalPlayer, player_record(x, y, z, dimension_id))
    }

    /// Stores the spawn point.
    #[must_use]
    pub fn with_spawn(self, spawn: BlockPos) -> Self {
        self.shared.state.write().spawn = Some(spawn);
        self
    }

    /// Stores a chunk tag list.
    #[must_use]
    pub fn with_chunk_tags(
        self,
        chunk: ChunkCoord,
        dimension: Dimension,
        kind: ChunkDataKind,
        tags: Vec<Tag>,
    ) -> Self {
        self.shared
            .state
            .write()
            .chunks
            .insert((chunk, dimension.id, kind), tags);
        self
    }

    /// Makes every record save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.shared.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Makes player listing fail with `error`, or succeed with `None`.
    pub fn set_listing_error(&self, error: Option<StorageError>) {
        self.shared.state.write().listing_error = error;
    }

    /// Stored record of a player.
    #[must_use]
    pub fn player_tags(&self, player: &EntityRef) -> Option<Vec<Tag>> {
        self.shared.state.read().players.get(player).cloned()
    }

    /// Number of successful record saves.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.shared.saves.load(Ordering::SeqCst)
    }

    /// Number of cache resets.
    #[must_use]
    pub fn cache_resets(&self) -> usize {
        self.shared.cache_resets.load(Ordering::SeqCst)
    }
}

impl WorldData for MemoryWorld {
    fn chunk_tags(
        &self,
        chunk: ChunkCoord,
        dimension: Dimension,
        kind: ChunkDataKind,
    ) -> StorageResult<Vec<Tag>> {
        self.shared
            .state
            .read()
            .chunks
            .get(&(chunk, dimension.id, kind))
            .cloned()
            .ok_or_else(|| StorageError::Unavailable(format!("chunk {};{} not stored", chunk.x, chunk.z)))
    }

    fn reset_cache(&self) {
        self.shared.cache_resets.fetch_add(1, Ordering::SeqCst);
    }

    fn network_player_names(&self) -> StorageResult<Vec<String>> {
        let state = self.shared.state.read();
        if let Some(err) = &state.listing_error {
            return Err(err.clone());
        }
        let mut names: Vec<String> = state
            .players
            .keys()
            .filter_map(|player| match player {
                EntityRef::NetworkPlayer(name) => Some(name.clone()),
                EntityRef::LocalPlayer => None,
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn player_position(&self, player: &EntityRef) -> StorageResult<Option<PlayerPosition>> {
        let state = self.shared.state.read();
        let Some(root) = state.players.get(player).and_then(|tags| tags.first()) else {
            return Ok(None);
        };
        read_position(root)
            .map(Some)
            .map_err(|err| StorageError::Corrupt(err.to_string()))
    }

    fn spawn_position(&self) -> StorageResult<Option<BlockPos>> {
        Ok(self.shared.state.read().spawn)
    }

    fn editable_entity(&self, entity: &EntityRef) -> StorageResult<Option<Box<dyn EditableTags>>> {
        let tags = self.shared.state.read().players.get(entity).cloned();
        Ok(tags.map(|tags| {
            Box::new(MemoryRecord {
                shared: Arc::clone(&self.shared),
                entity: entity.clone(),
                tags,
            }) as Box<dyn EditableTags>
        }))
    }
}

/// Working copy of a stored record. `save` writes it back.
#[derive(Debug)]
struct MemoryRecord {
    shared: Arc<Shared>,
    entity: EntityRef,
    tags: Vec<Tag>,
}

impl EditableTags for MemoryRecord {
    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tags
    }

    fn save(&mut self) -> StorageResult<()> {
        if self.shared.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io("save rejected".into()));
        }
        self.shared
            .state
            .write()
            .players
            .insert(self.entity.clone(), self.tags.clone());
        self.shared.saves.fetch_add(1, Ordering::SeqCst);
        debug!(entity = %self.entity, "record saved");
        Ok(())
    }
}

// ============================================================================
// WORLD CONTEXT
// ============================================================================

/// World screen state held in memory.
#[derive(Clone, Debug)]
pub struct MemoryContext {
    dimension: Dimension,
    markers_visible: bool,
    /// Titles and tags of every opened tag editor.
    pub opened_editors: Vec<(String, Vec<Tag>)>,
}

impl MemoryContext {
    /// Starts in `dimension` with markers shown.
    #[must_use]
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            markers_visible: true,
            opened_editors: Vec::new(),
        }
    }
}

impl Default for MemoryContext {
    fn default() -> Self {
        Self::new(Dimension::OVERWORLD)
    }
}

impl WorldContext for MemoryContext {
    fn active_dimension(&self) -> Dimension {
        self.dimension
    }

    fn set_dimension(&mut self, dimension: Dimension) {
        self.dimension = dimension;
    }

    fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    fn set_markers_visible(&mut self, visible: bool) {
        self.markers_visible = visible;
    }

    fn open_tag_editor(&mut self, title: &str, tags: Vec<Tag>) {
        self.opened_editors.push((title.to_string(), tags));
    }
}

// ============================================================================
// MARKER BOOK
// ============================================================================

/// Custom marker book held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryMarkerBook {
    markers: Vec<Marker>,
    dirty: bool,
    saves: usize,
    fail_save: bool,
}

impl MemoryMarkerBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `save` fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    /// Recorded markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns true if changes await a save.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl MarkerPersistence for MemoryMarkerBook {
    fn add(&mut self, marker: &Marker, persist: bool) {
        self.markers.retain(|m| m != marker);
        self.markers.push(marker.clone());
        self.dirty |= persist;
    }

    fn remove(&mut self, marker: &Marker, persist: bool) {
        self.markers.retain(|m| m != marker);
        self.dirty |= persist;
    }

    fn save(&mut self) -> StorageResult<()> {
        if self.fail_save {
            return Err(StorageError::Io("marker book is read-only".into()));
        }
        self.dirty = false;
        self.saves += 1;
        Ok(())
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// A placed marker view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedView {
    /// Tile-space position.
    pub at: TilePoint,
    /// Shown or hidden.
    pub visible: bool,
}

/// Canvas that records views instead of drawing them.
#[derive(Clone, Debug, Default)]
pub struct HeadlessCanvas {
    views: HashMap<MarkerKey, PlacedView>,
    framed: Option<TilePoint>,
}

impl HeadlessCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View of a marker, if attached.
    #[must_use]
    pub fn view(&self, key: &MarkerKey) -> Option<PlacedView> {
        self.views.get(key).copied()
    }

    /// Number of attached views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns true if no view is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Number of visible views.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.views.values().filter(|view| view.visible).count()
    }

    /// Last framed tile point.
    #[must_use]
    pub const fn framed(&self) -> Option<TilePoint> {
        self.framed
    }
}

impl MarkerCanvas for HeadlessCanvas {
    fn place(&mut self, marker: &Marker, at: TilePoint) {
        self.views.insert(marker.key(), PlacedView { at, visible: true });
    }

    fn detach(&mut self, key: &MarkerKey) {
        self.views.remove(key);
    }

    fn set_visible(&mut self, key: &MarkerKey, visible: bool) {
        if let Some(view) = self.views.get_mut(key) {
            view.visible = visible;
        }
    }

    fn frame_to(&mut self, target: TilePoint) {
        self.framed = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let world = MemoryWorld::new().with_local_player(1.5, 70.0, -2.5, 1);
        let pos = world
            .player_position(&EntityRef::LocalPlayer)
            .expect("readable")
            .expect("stored");
        assert_eq!(pos.dimension_id, 1);
        assert_eq!(pos.block(), BlockPos::new(1, 70, -3));

        let mut record = world
            .editable_entity(&EntityRef::LocalPlayer)
            .expect("readable")
            .expect("stored");
        record.tags_mut()[0] = player_record(0.0, 0.0, 0.0, 2);

        world.set_fail_saves(true);
        assert!(record.save().is_err());
        assert_eq!(world.saves(), 0);

        world.set_fail_saves(false);
        record.save().expect("save");
        let pos = world.player_position(&EntityRef::LocalPlayer).expect("ok").expect("stored");
        assert_eq!(pos.dimension_id, 2);
    }

    #[test]
    fn test_network_names_sorted() {
        let world = MemoryWorld::new()
            .with_player(EntityRef::NetworkPlayer("zed".into()), player_record(0.0, 0.0, 0.0, 0))
            .with_player(EntityRef::NetworkPlayer("amy".into()), player_record(0.0, 0.0, 0.0, 0))
            .with_local_player(0.0, 0.0, 0.0, 0);
        assert_eq!(world.network_player_names(), Ok(vec!["amy".to_string(), "zed".to_string()]));

        world.set_listing_error(Some(StorageError::Unavailable("closed".into())));
        assert!(world.network_player_names().is_err());
    }
}
