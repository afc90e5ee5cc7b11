//! # Coordinate Transformer
//!
//! Pure functions relating the four coordinate spaces of the map:
//!
//! - **pixel**: position inside the scrolled tile view, at the current zoom
//! - **tile**: normalized `[-1, 1]` space the rendering boundary places content in
//! - **block**: world coordinates, per dimension
//! - **chunk**: block coordinates floor-divided by the dimension's chunk size
//!
//! All functions are parameterized by the zoom `scale` (> 0) and the active
//! [`Dimension`]. None of them allocate.
//!
//! ## Pixel density
//!
//! At scale 1.0 one tile shows exactly one chunk, so a block covers
//! `tile_size / chunk_w` pixels (integer division, as the tile renderer
//! rasterizes whole pixels per block), multiplied by the current scale.

use crate::constants::{HALF_WORLD_SIZE, TILE_SIZE};
use crate::dimension::Dimension;

/// A point in normalized tile space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TilePoint {
    /// Horizontal tile coordinate.
    pub x: f64,
    /// Vertical tile coordinate.
    pub z: f64,
}

/// A point in world (block) space, with sub-block precision.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    /// World X.
    pub x: f64,
    /// World Z.
    pub z: f64,
}

impl WorldPoint {
    /// Creates a world point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Scroll position of the tile view, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset {
    /// Horizontal scroll.
    pub x: f64,
    /// Vertical scroll.
    pub z: f64,
}

impl ScrollOffset {
    /// Creates a scroll offset.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts integer block coordinates to the chunk containing them.
    #[inline]
    #[must_use]
    pub fn from_block(block_x: i32, block_z: i32, dimension: &Dimension) -> Self {
        Self {
            x: block_x.div_euclid(dimension.chunk_w as i32),
            z: block_z.div_euclid(dimension.chunk_l as i32),
        }
    }
}

/// Block-space rectangle currently visible (plus margin) in one dimension.
///
/// Bounds are inclusive and over-inclusive: the rectangle is rounded outward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Minimum block X.
    pub min_x: i64,
    /// Maximum block X.
    pub max_x: i64,
    /// Minimum block Z.
    pub min_z: i64,
    /// Maximum block Z.
    pub max_z: i64,
    /// Dimension the rectangle belongs to.
    pub dimension: Dimension,
}

impl Viewport {
    /// Returns true if the block column lies inside this viewport, in this dimension.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: i32, z: i32, dimension: &Dimension) -> bool {
        let (x, z) = (i64::from(x), i64::from(z));
        *dimension == self.dimension
            && x >= self.min_x
            && x <= self.max_x
            && z >= self.min_z
            && z <= self.max_z
    }
}

/// Geometry of the tile view: tile size and world extent.
///
/// The transformer is a plain `Copy` value so callers can hand it to
/// background tasks without sharing anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapGeometry {
    /// Tile edge in pixels.
    pub tile_size: u32,
    /// Half the world edge in blocks.
    pub half_world_size: i64,
}

impl Default for MapGeometry {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            half_world_size: HALF_WORLD_SIZE,
        }
    }
}

impl MapGeometry {
    /// Creates a geometry with explicit values.
    #[inline]
    #[must_use]
    pub const fn new(tile_size: u32, half_world_size: i64) -> Self {
        Self {
            tile_size,
            half_world_size,
        }
    }

    #[inline]
    fn half(&self) -> f64 {
        self.half_world_size as f64
    }

    /// Pixels covered by one block along X at the given scale.
    #[inline]
    #[must_use]
    pub fn pixels_per_block_w(&self, scale: f64, dimension: &Dimension) -> f64 {
        f64::from(self.tile_size / dimension.chunk_w) * scale
    }

    /// Pixels covered by one block along Z at the given scale.
    #[inline]
    #[must_use]
    pub fn pixels_per_block_l(&self, scale: f64, dimension: &Dimension) -> f64 {
        f64::from(self.tile_size / dimension.chunk_l) * scale
    }

    /// Maps world coordinates into tile space.
    ///
    /// `tile = dimension.scale * block / half_world_size`
    #[inline]
    #[must_use]
    pub fn world_to_tile(&self, block_x: f64, block_z: f64, dimension: &Dimension) -> TilePoint {
        TilePoint {
            x: dimension.scale * block_x / self.half(),
            z: dimension.scale * block_z / self.half(),
        }
    }

    /// Inverse of [`Self::world_to_tile`].
    #[inline]
    #[must_use]
    pub fn tile_to_world(&self, tile: TilePoint, dimension: &Dimension) -> WorldPoint {
        WorldPoint {
            x: tile.x * self.half() / dimension.scale,
            z: tile.z * self.half() / dimension.scale,
        }
    }

    /// Absolute pixel position (relative to the unscrolled view origin) of a tile point.
    #[inline]
    #[must_use]
    pub fn tile_to_pixel(&self, tile: TilePoint, scale: f64, dimension: &Dimension) -> (f64, f64) {
        (
            (tile.x + 1.0) * self.half() * self.pixels_per_block_w(scale, dimension),
            (tile.z + 1.0) * self.half() * self.pixels_per_block_l(scale, dimension),
        )
    }

    /// Maps a pixel inside the view (relative to its top-left corner) to world coordinates.
    #[inline]
    #[must_use]
    pub fn screen_to_world(
        &self,
        pixel_x: f64,
        pixel_z: f64,
        scroll: ScrollOffset,
        scale: f64,
        dimension: &Dimension,
    ) -> WorldPoint {
        WorldPoint {
            x: self.axis_to_world(
                scroll.x + pixel_x,
                self.pixels_per_block_w(scale, dimension),
                dimension,
            ),
            z: self.axis_to_world(
                scroll.z + pixel_z,
                self.pixels_per_block_l(scale, dimension),
                dimension,
            ),
        }
    }

    #[inline]
    fn axis_to_world(&self, absolute_pixel: f64, pixels_per_block: f64, dimension: &Dimension) -> f64 {
        (absolute_pixel / pixels_per_block - self.half()) / dimension.scale
    }

    /// Maps world coordinates to the chunk containing them.
    ///
    /// Rounds toward negative infinity: `-1 / 16` is chunk `-1`, not `0`.
    #[inline]
    #[must_use]
    pub fn world_to_chunk(&self, world: WorldPoint, dimension: &Dimension) -> ChunkCoord {
        ChunkCoord {
            x: (world.x / f64::from(dimension.chunk_w)).floor() as i32,
            z: (world.z / f64::from(dimension.chunk_l)).floor() as i32,
        }
    }

    /// Tile-space point the view must center on to show a world coordinate.
    #[inline]
    #[must_use]
    pub fn frame_target(&self, world_x: f64, world_z: f64, dimension: &Dimension) -> TilePoint {
        self.world_to_tile(world_x, world_z, dimension)
    }

    /// Block-space rectangle covered by the view, grown by a pixel margin on every side.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn compute_viewport(
        &self,
        scroll: ScrollOffset,
        view_w: f64,
        view_h: f64,
        margin_x: f64,
        margin_z: f64,
        scale: f64,
        dimension: &Dimension,
    ) -> Viewport {
        let ppb_w = self.pixels_per_block_w(scale, dimension);
        let ppb_l = self.pixels_per_block_l(scale, dimension);

        let left = self.axis_to_world(scroll.x - margin_x, ppb_w, dimension);
        let right = self.axis_to_world(scroll.x + view_w + margin_x, ppb_w, dimension);
        let top = self.axis_to_world(scroll.z - margin_z, ppb_l, dimension);
        let bottom = self.axis_to_world(scroll.z + view_h + margin_z, ppb_l, dimension);

        Viewport {
            min_x: left.floor() as i64,
            max_x: right.ceil() as i64,
            min_z: top.floor() as i64,
            max_z: bottom.ceil() as i64,
            dimension: *dimension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn test_world_to_tile_edges() {
        let geometry = MapGeometry::default();
        let half = HALF_WORLD_SIZE as f64;

        let tile = geometry.world_to_tile(half, -half, &Dimension::OVERWORLD);
        assert!((tile.x - 1.0).abs() < TOLERANCE);
        assert!((tile.z + 1.0).abs() < TOLERANCE);

        // Nether blocks are spread eight times further apart.
        let tile = geometry.world_to_tile(1000.0, 0.0, &Dimension::NETHER);
        assert!((tile.x - 8000.0 / half).abs() < TOLERANCE);
    }

    #[test]
    fn test_world_to_chunk_floors_negatives() {
        let geometry = MapGeometry::default();
        let dim = Dimension::OVERWORLD;

        let chunk = |x: f64, z: f64| geometry.world_to_chunk(WorldPoint::new(x, z), &dim);
        assert_eq!(chunk(-1.0, -1.0), ChunkCoord::new(-1, -1));
        assert_eq!(chunk(-0.5, 0.5), ChunkCoord::new(-1, 0));
        assert_eq!(chunk(-16.0, 15.9), ChunkCoord::new(-1, 0));
        assert_eq!(chunk(-17.0, 16.0), ChunkCoord::new(-2, 1));
        assert_eq!(chunk(0.0, 0.0), ChunkCoord::new(0, 0));
    }

    #[test]
    fn test_chunk_from_block() {
        let dim = Dimension::OVERWORLD;
        assert_eq!(ChunkCoord::from_block(0, 15, &dim), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block(-1, 16, &dim), ChunkCoord::new(-1, 1));
        assert_eq!(ChunkCoord::from_block(-16, -17, &dim), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_screen_to_world_center_of_world() {
        let geometry = MapGeometry::default();
        let dim = Dimension::OVERWORLD;
        let scale = 1.0;
        let ppb = geometry.pixels_per_block_w(scale, &dim);
        assert!((ppb - 16.0).abs() < TOLERANCE);

        // Scrolled so that the top-left pixel is the world origin.
        let origin = HALF_WORLD_SIZE as f64 * ppb;
        let scroll = ScrollOffset::new(origin, origin);

        let world = geometry.screen_to_world(32.0, 48.0, scroll, scale, &dim);
        assert!((world.x - 2.0).abs() < TOLERANCE);
        assert!((world.z - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_pixel_tile_world_round_trip() {
        let geometry = MapGeometry::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for dim in [Dimension::OVERWORLD, Dimension::NETHER, Dimension::END] {
            let limit = HALF_WORLD_SIZE as f64 / dim.scale;
            for _ in 0..1000 {
                let block_x = rng.gen_range(-limit..limit).round();
                let block_z = rng.gen_range(-limit..limit).round();
                let scale = [0.0625, 0.25, 0.5, 1.0][rng.gen_range(0..4)];
                let scroll = ScrollOffset::new(rng.gen_range(0.0..1e6), rng.gen_range(0.0..1e6));

                let tile = geometry.world_to_tile(block_x, block_z, &dim);
                assert!(tile.x.abs() <= 1.0 && tile.z.abs() <= 1.0);

                let (px, pz) = geometry.tile_to_pixel(tile, scale, &dim);
                let world =
                    geometry.screen_to_world(px - scroll.x, pz - scroll.z, scroll, scale, &dim);

                assert!(
                    (world.x - block_x).abs() < TOLERANCE,
                    "x: {block_x} came back as {} in {dim}",
                    world.x
                );
                assert!((world.z - block_z).abs() < TOLERANCE);

                let back = geometry.tile_to_world(tile, &dim);
                assert!((back.x - block_x).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn test_viewport_contains_visible_area() {
        let geometry = MapGeometry::default();
        let dim = Dimension::OVERWORLD;
        let scale = 0.5;
        let ppb = geometry.pixels_per_block_w(scale, &dim);
        let origin = HALF_WORLD_SIZE as f64 * ppb;

        // 800x600 view whose top-left is the world origin, 8 px per block.
        let viewport = geometry.compute_viewport(
            ScrollOffset::new(origin, origin),
            800.0,
            600.0,
            0.0,
            0.0,
            scale,
            &dim,
        );
        assert_eq!(viewport.min_x, 0);
        assert_eq!(viewport.max_x, 100);
        assert_eq!(viewport.min_z, 0);
        assert_eq!(viewport.max_z, 75);

        assert!(viewport.contains(50, 50, &dim));
        assert!(!viewport.contains(101, 50, &dim));
        assert!(!viewport.contains(50, 50, &Dimension::NETHER));

        // Margins only ever grow the rectangle.
        let wide = geometry.compute_viewport(
            ScrollOffset::new(origin, origin),
            800.0,
            600.0,
            400.0,
            300.0,
            scale,
            &dim,
        );
        assert!(wide.min_x <= viewport.min_x - 50);
        assert!(wide.max_z >= viewport.max_z + 37);
    }
}
