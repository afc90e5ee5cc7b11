//! # Tilemark Shared
//!
//! World catalogs and coordinate math shared by every other Tilemark crate.
//!
//! ## Coordinate Spaces
//!
//! ```text
//!   pixel (scrolled view)  ──screen_to_world──▶  block (world)
//!          ▲                                        │
//!          │ tile_to_pixel                          │ world_to_tile / world_to_chunk
//!          │                                        ▼
//!   tile  [-1, 1]  ◀───────────────────────────  chunk (floor division)
//! ```
//!
//! Everything here is plain data or a pure function. Nothing allocates on the
//! coordinate paths, so the transformer can be called from the render loop
//! and from background scans alike.

#![deny(unsafe_code)]

pub mod constants;
pub mod coords;
pub mod dimension;
pub mod icon;

pub use constants::{
    DEFAULT_MARKER_Y, HALF_WORLD_SIZE, INITIAL_SCALE, MARKER_CULL_INTERVAL, TILE_SIZE, ZOOM_LEVELS,
};
pub use coords::{ChunkCoord, MapGeometry, ScrollOffset, TilePoint, Viewport, WorldPoint};
pub use dimension::{Dimension, DimensionRegistry, ViewMode};
pub use icon::{
    BlockEntityKind, CatalogIcon, CustomIcon, EntityKind, IconCatalog, IconCategory, IconKey,
    IconProvider, NamedIcon,
};
