//! # Marker Canvas
//!
//! The rendering boundary. Views for markers are owned by the canvas in a
//! side table keyed by [`MarkerKey`]; the core only ever refers to a view
//! through the key and never assumes one exists.

use tilemark_shared::TilePoint;

use crate::marker::{Marker, MarkerKey};

/// Where markers are drawn and what the view is centered on.
///
/// Only the owning thread calls these methods.
pub trait MarkerCanvas {
    /// Creates (or moves) the view for a marker at a tile-space position.
    fn place(&mut self, marker: &Marker, at: TilePoint);

    /// Detaches the view of a marker, if it has one.
    fn detach(&mut self, key: &MarkerKey);

    /// Shows or hides the view of a marker, if it has one.
    fn set_visible(&mut self, key: &MarkerKey, visible: bool);

    /// Scrolls the view so a tile-space point is centered.
    fn frame_to(&mut self, target: TilePoint);
}
