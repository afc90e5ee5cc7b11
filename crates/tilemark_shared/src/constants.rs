//! # Map Constants
//!
//! Defaults for the tile view. Every value here can be overridden through the
//! map configuration file; these are the values used when it is silent.

/// Edge length of one rendered tile, in pixels.
///
/// At scale 1.0 one tile shows exactly one chunk.
pub const TILE_SIZE: u32 = 256;

/// Half the world edge length, in blocks.
///
/// Tile space `[-1, 1]` spans `[-HALF_WORLD_SIZE, HALF_WORLD_SIZE]` blocks
/// (before the dimension scale is applied).
pub const HALF_WORLD_SIZE: i64 = 1 << 20;

/// Number of marker insertions between two viewport culling runs.
pub const MARKER_CULL_INTERVAL: u32 = 50;

/// Zoom scale the view opens at.
pub const INITIAL_SCALE: f64 = 0.5;

/// Detail levels registered with the tile view (1/16 means 16 chunks per tile).
pub const ZOOM_LEVELS: [f64; 5] = [0.0625, 0.125, 0.25, 0.5, 1.0];

/// Y level used when a typed height cannot be parsed.
pub const DEFAULT_MARKER_Y: i32 = 64;
