//! # Map Session
//!
//! The owning thread's side of one open map. The session is the only code
//! that mutates the marker store, attaches or detaches marker views and
//! commits filter edits. Slow work goes to the [`TaskWorker`]; its results
//! are applied in [`MapSession::pump`].
//!
//! ## Marker flow
//!
//! ```text
//! add_marker ─▶ CullThrottle ─Started─▶ Job::Cull ─▶ worker
//!     │                                                │
//!     ▼                                                ▼
//! store.add ─▶ canvas.place ─▶ filter          pump: store.evict,
//!                                              canvas.detach, finish
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tilemark_markers::{
    CullJob, CullThrottle, CullTrigger, FilterEdit, Marker, MarkerCanvas, MarkerFilter, MarkerStore,
};
use tilemark_shared::{
    CustomIcon, Dimension, DimensionRegistry, EntityKind, IconCatalog, IconProvider, MapGeometry,
    NamedIcon, ScrollOffset,
};
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::contracts::{EntityRef, MarkerPersistence, PlayerPosition, WorldContext, WorldData};
use crate::error::{MapError, MapResult, StorageResult};
use crate::notice::Notice;
use crate::tasks::{Completion, Job, TaskWorker, TeleportOrigin, TeleportRequest};

/// Display name of the local player marker.
pub const LOCAL_PLAYER_NAME: &str = "~local_player";

/// Scroll position, view size and zoom of the tile view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Scroll offset in pixels.
    pub scroll: ScrollOffset,
    /// View width in pixels.
    pub width: f64,
    /// View height in pixels.
    pub height: f64,
    /// Zoom scale.
    pub scale: f64,
}

/// One open map.
pub struct MapSession<W, D, P, C>
where
    W: WorldContext,
    D: WorldData + 'static,
    P: MarkerPersistence,
    C: MarkerCanvas,
{
    pub(crate) config: MapConfig,
    pub(crate) geometry: MapGeometry,
    pub(crate) dimensions: DimensionRegistry,
    pub(crate) world: W,
    pub(crate) data: Arc<D>,
    pub(crate) book: P,
    pub(crate) canvas: C,
    pub(crate) store: MarkerStore,
    pub(crate) filter: MarkerFilter,
    pub(crate) throttle: CullThrottle,
    pub(crate) worker: TaskWorker,
    pub(crate) outstanding: usize,
    pub(crate) camera: Camera,
    pub(crate) local_player: Option<Marker>,
    pub(crate) spawn: Option<Marker>,
    pub(crate) network_players: Option<Vec<String>>,
    pub(crate) notices: Vec<Notice>,
}

impl<W, D, P, C> MapSession<W, D, P, C>
where
    W: WorldContext,
    D: WorldData + 'static,
    P: MarkerPersistence,
    C: MarkerCanvas,
{
    /// Creates a session and starts its worker.
    ///
    /// The filter starts from the catalog defaults plus the configured
    /// overrides.
    #[must_use]
    pub fn new(
        config: MapConfig,
        dimensions: DimensionRegistry,
        icons: &IconCatalog,
        world: W,
        data: Arc<D>,
        book: P,
        canvas: C,
    ) -> Self {
        let mut filter = MarkerFilter::from_catalog(icons);
        filter.apply_overrides(
            config.filter.enable.iter().map(String::as_str),
            config.filter.disable.iter().map(String::as_str),
        );

        let camera = Camera {
            scroll: ScrollOffset::default(),
            width: f64::from(config.screen.width),
            height: f64::from(config.screen.height),
            scale: config.clamp_scale(config.initial_scale),
        };

        Self {
            geometry: config.geometry(),
            throttle: CullThrottle::new(config.cull_interval),
            worker: TaskWorker::spawn(Arc::clone(&data)),
            config,
            dimensions,
            world,
            data,
            book,
            canvas,
            store: MarkerStore::new(),
            filter,
            outstanding: 0,
            camera,
            local_player: None,
            spawn: None,
            network_players: None,
            notices: Vec::new(),
        }
    }

    // ========================================================================
    // OPEN / CLOSE
    // ========================================================================

    /// Places the local player and spawn markers and frames the view.
    ///
    /// Frames the player if found, else spawn, else the world origin.
    pub fn open(&mut self) {
        match self.data.player_position(&EntityRef::LocalPlayer) {
            Ok(Some(pos)) => {
                let dimension = self.dimension_of(pos.dimension_id);
                let block = pos.block();
                let icon: Arc<dyn IconProvider> = Arc::new(NamedIcon::new(
                    Arc::new(EntityKind::PLAYER),
                    LOCAL_PLAYER_NAME,
                ));
                let marker = Marker::new(block.x, block.y, block.z, dimension, icon, false);
                self.add_static_marker(marker.clone());
                self.local_player = Some(marker);
            }
            Ok(None) => info!("world has no local player data"),
            Err(err) => warn!(%err, "failed to load local player"),
        }

        match self.data.spawn_position() {
            Ok(Some(spawn)) => {
                let marker = Marker::new(
                    spawn.x,
                    spawn.y,
                    spawn.z,
                    Dimension::OVERWORLD,
                    Arc::new(CustomIcon::spawn()),
                    false,
                );
                self.add_static_marker(marker.clone());
                self.spawn = Some(marker);
            }
            Ok(None) => info!("world has no spawn point"),
            Err(err) => warn!(%err, "failed to load spawn point"),
        }

        let focus = self.local_player.clone().or_else(|| self.spawn.clone());
        match focus {
            Some(marker) => self.show_marker(&marker),
            None => self.frame_to(0.0, 0.0),
        }
        info!(
            static_markers = self.store.static_len(),
            dimension = %self.world.active_dimension(),
            "map opened"
        );
    }

    /// Tears the map down: detaches every view and drops the store.
    pub fn close(mut self) {
        for marker in self.store.all() {
            self.canvas.detach(&marker.key());
        }
        self.store.clear();
        info!("map closed");
    }

    /// Drops cached chunks of the world data.
    pub fn close_chunks(&mut self) {
        self.data.reset_cache();
    }

    // ========================================================================
    // MARKERS
    // ========================================================================

    /// Adds a procedural marker, replacing an equal one, and places its view.
    ///
    /// Every insertion counts towards the next culling run.
    pub fn add_marker(&mut self, marker: Marker) -> CullTrigger {
        let trigger = self.throttle.on_insert();
        if trigger == CullTrigger::Started {
            self.start_cull();
        }
        self.insert(marker);
        trigger
    }

    /// Adds a marker to both sets. Static markers are never culled.
    pub fn add_static_marker(&mut self, marker: Marker) {
        self.store.mark_static(&marker);
        self.add_marker(marker);
    }

    fn insert(&mut self, marker: Marker) {
        if let Some(previous) = self.store.add(marker.clone()) {
            self.canvas.detach(&previous.key());
        }
        let tile = self
            .geometry
            .world_to_tile(f64::from(marker.x), f64::from(marker.z), &marker.dimension);
        self.canvas.place(&marker, tile);
        self.filter_marker(&marker);
    }

    /// Removes a marker from both sets and detaches its view.
    pub fn remove_marker(&mut self, marker: &Marker) -> bool {
        self.canvas.detach(&marker.key());
        self.store.remove(marker)
    }

    /// Replaces a marker by a copy at a new position.
    ///
    /// Static membership carries over. Custom markers are re-recorded in
    /// the marker book.
    pub fn move_marker(&mut self, marker: &Marker, x: i32, y: i32, z: i32, dimension: Dimension) -> Marker {
        let moved = marker.copy_to(x, y, z, dimension);
        let was_static = self.store.is_static(marker);
        self.remove_marker(marker);
        if was_static {
            self.store.mark_static(&moved);
        }
        self.add_marker(moved.clone());

        if marker.is_custom {
            self.book.remove(marker, true);
            self.book.add(&moved, true);
        }
        debug!(from = %marker, to = %moved, "marker moved");
        moved
    }

    fn filter_marker(&mut self, marker: &Marker) {
        let visible = self.filter.is_visible(marker, &self.world.active_dimension());
        self.canvas.set_visible(&marker.key(), visible);
    }

    /// Re-applies the filter to every procedural marker.
    pub fn update_marker_filter(&mut self) {
        for marker in self.store.procedural() {
            self.filter_marker(&marker);
        }
    }

    /// Runs a filter dialog.
    ///
    /// `dialog` stages changes and returns true to confirm. On confirm the
    /// staged state is committed and re-applied to every marker; otherwise
    /// nothing changes.
    pub fn edit_filter<F>(&mut self, dialog: F) -> bool
    where
        F: FnOnce(&mut FilterEdit<'_>) -> bool,
    {
        let mut edit = self.filter.begin_edit();
        if dialog(&mut edit) {
            edit.commit();
            self.update_marker_filter();
            true
        } else {
            edit.cancel();
            false
        }
    }

    /// Flips marker visibility.
    ///
    /// Showing re-applies the filter; hiding removes every procedural
    /// marker that is not static. Returns the new visibility.
    pub fn toggle_markers(&mut self) -> bool {
        let visible = !self.world.markers_visible();
        self.world.set_markers_visible(visible);
        if visible {
            self.update_marker_filter();
        } else {
            for marker in self.store.clear_transient() {
                self.canvas.detach(&marker.key());
            }
        }
        visible
    }

    // ========================================================================
    // CULLING
    // ========================================================================

    fn start_cull(&mut self) {
        let (margin_x, margin_z) = self.config.screen.cull_margin();
        let viewport = self.geometry.compute_viewport(
            self.camera.scroll,
            self.camera.width,
            self.camera.height,
            margin_x,
            margin_z,
            self.camera.scale,
            &self.world.active_dimension(),
        );
        let job = CullJob {
            snapshot: self.store.snapshot(),
            viewport,
        };
        debug!(?viewport, markers = job.snapshot.procedural.len(), "cull started");
        if !self.submit(Job::Cull(job)) {
            self.throttle.finish();
        }
    }

    // ========================================================================
    // CAMERA
    // ========================================================================

    /// Records the current scroll, view size and zoom.
    ///
    /// A scale that is not a positive finite number keeps the current zoom.
    pub fn set_view(&mut self, scroll: ScrollOffset, width: f64, height: f64, scale: f64) {
        let scale = if scale.is_finite() && scale > 0.0 {
            self.config.clamp_scale(scale)
        } else {
            self.camera.scale
        };
        self.camera = Camera {
            scroll,
            width,
            height,
            scale,
        };
    }

    /// Centers the view on a world coordinate of the active dimension.
    pub fn frame_to(&mut self, x: f64, z: f64) {
        let dimension = self.world.active_dimension();
        let target = self.geometry.frame_target(x, z, &dimension);
        let (px, pz) = self.geometry.tile_to_pixel(target, self.camera.scale, &dimension);
        self.camera.scroll = ScrollOffset::new(px - self.camera.width / 2.0, pz - self.camera.height / 2.0);
        self.canvas.frame_to(target);
    }

    /// Switches to the marker's dimension if needed and frames it.
    pub fn show_marker(&mut self, marker: &Marker) {
        self.switch_dimension(marker.dimension);
        self.frame_to(f64::from(marker.x), f64::from(marker.z));
    }

    fn switch_dimension(&mut self, dimension: Dimension) {
        if self.world.active_dimension() != dimension {
            info!(%dimension, "switching dimension");
            self.world.set_dimension(dimension);
            self.update_marker_filter();
        }
    }

    /// Frames the local player marker.
    ///
    /// # Errors
    ///
    /// `NotFound` if the world has no local player.
    pub fn move_camera_to_player(&mut self) -> MapResult<()> {
        let result = match self.local_player.clone() {
            Some(marker) => {
                self.show_marker(&marker);
                Ok(())
            }
            None => Err(MapError::NotFound("local player".into())),
        };
        self.report(result)
    }

    /// Frames the spawn marker.
    ///
    /// # Errors
    ///
    /// `NotFound` if the world has no spawn point.
    pub fn move_camera_to_spawn(&mut self) -> MapResult<()> {
        let result = match self.spawn.clone() {
            Some(marker) => {
                self.show_marker(&marker);
                Ok(())
            }
            None => Err(MapError::NotFound("spawn".into())),
        };
        self.report(result)
    }

    // ========================================================================
    // NETWORK PLAYERS
    // ========================================================================

    /// Lists multiplayer players in the background.
    pub fn request_network_players(&mut self) -> bool {
        self.submit(Job::ListNetworkPlayers)
    }

    /// Loads a multiplayer player's position in the background and frames it.
    pub fn go_to_player(&mut self, name: &str) -> bool {
        self.submit(Job::LocatePlayer(EntityRef::NetworkPlayer(name.to_string())))
    }

    // ========================================================================
    // BACKGROUND COMPLETIONS
    // ========================================================================

    pub(crate) fn submit(&mut self, job: Job) -> bool {
        if self.worker.submit(job) {
            self.outstanding += 1;
            true
        } else {
            warn!("task worker is gone, job dropped");
            false
        }
    }

    /// Applies every finished background job. Never blocks.
    ///
    /// Returns the number of completions applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.worker.try_next() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits until every submitted job is applied, or `timeout` passes.
    ///
    /// Returns true if nothing is outstanding anymore.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.worker.next_timeout(remaining) {
                Some(completion) => self.apply(completion),
                None => return false,
            }
        }
        true
    }

    fn apply(&mut self, completion: Completion) {
        self.outstanding = self.outstanding.saturating_sub(1);
        match completion {
            Completion::CullFinished(report) => {
                let evicted = self.store.evict(&report.evicted);
                for marker in &evicted {
                    self.canvas.detach(&marker.key());
                }
                self.throttle.finish();
                info!(
                    scanned = report.scanned,
                    evicted = evicted.len(),
                    remaining = self.store.procedural_len(),
                    "cull applied"
                );
            }
            Completion::NetworkPlayers(Ok(names)) if names.is_empty() => {
                self.network_players = Some(names);
                self.notices.push(Notice::Failed(MapError::NoMultiplayerData));
            }
            Completion::NetworkPlayers(Ok(names)) => {
                self.network_players = Some(names.clone());
                self.notices.push(Notice::PlayersFound(names));
            }
            Completion::NetworkPlayers(Err(err)) => {
                warn!(%err, "listing network players failed");
                self.notices.push(Notice::Failed(MapError::PlayerData(err)));
            }
            Completion::PlayerLocated { player, result } => self.on_player_located(&player, result),
            Completion::Teleported { request, result } => self.on_teleported(request, result),
        }
    }

    fn on_player_located(
        &mut self,
        player: &EntityRef,
        result: StorageResult<Option<PlayerPosition>>,
    ) {
        match result {
            Ok(Some(pos)) => {
                let dimension = self.dimension_of(pos.dimension_id);
                self.switch_dimension(dimension);
                self.frame_to(f64::from(pos.x), f64::from(pos.z));
            }
            Ok(None) => self.notices.push(Notice::Failed(MapError::NotFound(player.to_string()))),
            Err(err) => {
                warn!(%err, %player, "loading player position failed");
                self.notices.push(Notice::Failed(MapError::PlayerData(err)));
            }
        }
    }

    fn on_teleported(&mut self, request: TeleportRequest, result: MapResult<()>) {
        let target = request.target;
        match result {
            Ok(()) => {
                if request.entity == EntityRef::LocalPlayer {
                    let block = target.block();
                    if let Some(player) = self.local_player.clone() {
                        let moved = self.move_marker(&player, block.x, block.y, block.z, target.dimension);
                        self.local_player = Some(moved);
                    }
                }
                let (x, y, z, label) = match request.origin {
                    TeleportOrigin::Marker(label) => {
                        let block = target.block();
                        (f64::from(block.x), f64::from(block.y), f64::from(block.z), Some(label))
                    }
                    TeleportOrigin::MapPosition => {
                        (f64::from(target.x), f64::from(target.y), f64::from(target.z), None)
                    }
                };
                self.notices.push(Notice::Teleported {
                    x,
                    y,
                    z,
                    dimension: target.dimension,
                    label,
                });
            }
            Err(err) => {
                let shape_problem = matches!(err, MapError::Validation(_) | MapError::NotFound(_));
                let notice = match request.origin {
                    TeleportOrigin::MapPosition if shape_problem => Notice::PlayerDataUnavailable(err),
                    _ => Notice::TeleportFailed(err),
                };
                self.notices.push(notice);
            }
        }
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    pub(crate) fn dimension_of(&self, id: i32) -> Dimension {
        self.dimensions.by_id(id).unwrap_or_else(|| {
            warn!(id, "unknown dimension id, using active dimension");
            self.world.active_dimension()
        })
    }

    /// Queues a failure notice for an error result and passes it through.
    pub(crate) fn report<T>(&mut self, result: MapResult<T>) -> MapResult<T> {
        if let Err(err) = &result {
            self.notices.push(Notice::Failed(err.clone()));
        }
        result
    }

    /// Takes the queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// The marker store.
    #[must_use]
    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// The category filter.
    #[must_use]
    pub fn filter(&self) -> &MarkerFilter {
        &self.filter
    }

    /// The culling throttle.
    #[must_use]
    pub fn throttle(&self) -> &CullThrottle {
        &self.throttle
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Tile geometry in use.
    #[must_use]
    pub fn geometry(&self) -> MapGeometry {
        self.geometry
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Local player marker, if the world has one.
    #[must_use]
    pub fn local_player(&self) -> Option<&Marker> {
        self.local_player.as_ref()
    }

    /// Spawn marker, if the world has one.
    #[must_use]
    pub fn spawn_marker(&self) -> Option<&Marker> {
        self.spawn.as_ref()
    }

    /// Last listed multiplayer names.
    #[must_use]
    pub fn network_players(&self) -> Option<&[String]> {
        self.network_players.as_deref()
    }

    /// Jobs submitted but not yet applied.
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// The world context.
    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The world context, mutably.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// The marker book.
    #[must_use]
    pub fn book(&self) -> &P {
        &self.book
    }

    /// The canvas.
    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }
}
