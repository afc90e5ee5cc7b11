//! # Map Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! tile_size = 256
//! cull_interval = 50
//! initial_scale = 0.5
//!
//! [screen]
//! width = 1080
//! height = 1920
//!
//! [filter]
//! enable = ["block_entity.chest"]
//! disable = ["entity.bat"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tilemark_shared::{
    DimensionRegistry, MapGeometry, DEFAULT_MARKER_Y, HALF_WORLD_SIZE, INITIAL_SCALE, MARKER_CULL_INTERVAL,
    TILE_SIZE, ZOOM_LEVELS,
};

use crate::error::ConfigError;

/// Physical screen size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

impl ScreenSize {
    /// Culling margin: half the screen on each axis.
    #[must_use]
    pub fn cull_margin(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Startup overrides of the category filter defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOverrides {
    /// Icon keys forced visible.
    pub enable: Vec<String>,
    /// Icon keys forced hidden.
    pub disable: Vec<String>,
}

/// Map view configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tile edge in pixels.
    pub tile_size: u32,
    /// Half the world edge in blocks.
    pub half_world_size: i64,
    /// Marker insertions between culling runs.
    pub cull_interval: u32,
    /// Zoom scale the map opens at.
    pub initial_scale: f64,
    /// Allowed zoom scales, ascending.
    pub zoom_levels: Vec<f64>,
    /// Screen size used for the culling margin.
    pub screen: ScreenSize,
    /// Y used when a typed height does not parse.
    pub default_marker_y: i32,
    /// Filter overrides.
    pub filter: FilterOverrides,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            half_world_size: HALF_WORLD_SIZE,
            cull_interval: MARKER_CULL_INTERVAL,
            initial_scale: INITIAL_SCALE,
            zoom_levels: ZOOM_LEVELS.to_vec(),
            screen: ScreenSize::default(),
            default_marker_y: DEFAULT_MARKER_Y,
            filter: FilterOverrides::default(),
        }
    }
}

impl MapConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed TOML, `Invalid` for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A tile must give every block at least one pixel.
        let widest_chunk = DimensionRegistry::builtin()
            .iter()
            .map(|dimension| dimension.chunk_w.max(dimension.chunk_l))
            .max()
            .unwrap_or(1);
        if self.tile_size < widest_chunk {
            return Err(ConfigError::Invalid(format!(
                "tile_size must be at least {widest_chunk}"
            )));
        }
        if self.half_world_size <= 0 {
            return Err(ConfigError::Invalid("half_world_size must be positive".into()));
        }
        if self.cull_interval == 0 {
            return Err(ConfigError::Invalid("cull_interval must be positive".into()));
        }
        if self.zoom_levels.is_empty() {
            return Err(ConfigError::Invalid("zoom_levels must not be empty".into()));
        }
        if self.zoom_levels.iter().any(|z| !z.is_finite() || *z <= 0.0) {
            return Err(ConfigError::Invalid("zoom levels must be positive".into()));
        }
        if !self.initial_scale.is_finite() || self.initial_scale <= 0.0 {
            return Err(ConfigError::Invalid("initial_scale must be positive".into()));
        }
        Ok(())
    }

    /// Tile geometry described by this configuration.
    #[must_use]
    pub const fn geometry(&self) -> MapGeometry {
        MapGeometry::new(self.tile_size, self.half_world_size)
    }

    /// Clamps a scale into the configured zoom range.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        let min = self.zoom_levels.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.zoom_levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min > max {
            return scale;
        }
        scale.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemark_shared::Dimension;

    #[test]
    fn test_empty_document_is_default() {
        let config = MapConfig::from_toml_str("").expect("defaults are valid");
        assert_eq!(config, MapConfig::default());
        assert_eq!(config.cull_interval, 50);
        assert_eq!(config.geometry(), MapGeometry::default());
    }

    #[test]
    fn test_partial_document() {
        let config = MapConfig::from_toml_str(
            r#"
            cull_interval = 10

            [screen]
            width = 800
            height = 600

            [filter]
            enable = ["block_entity.chest"]
            "#,
        )
        .expect("valid config");
        assert_eq!(config.cull_interval, 10);
        assert_eq!(config.screen.cull_margin(), (400.0, 300.0));
        assert_eq!(config.filter.enable, vec!["block_entity.chest".to_string()]);
        assert!(config.filter.disable.is_empty());
        assert_eq!(config.tile_size, TILE_SIZE);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            MapConfig::from_toml_str("cull_interval = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_toml_str("zoom_levels = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_toml_str("tile_size = \"big\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MapConfig::load("/nonexistent/tilemark.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_tile_smaller_than_chunk_is_rejected() {
        assert!(matches!(
            MapConfig::from_toml_str("tile_size = 8"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_toml_str("tile_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        let config = MapConfig::from_toml_str("tile_size = 16").expect("one pixel per block");
        assert!(
            (config.geometry().pixels_per_block_w(1.0, &Dimension::OVERWORLD) - 1.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_clamp_scale() {
        let config = MapConfig::default();
        assert!((config.clamp_scale(4.0) - 1.0).abs() < f64::EPSILON);
        assert!((config.clamp_scale(0.001) - 0.0625).abs() < f64::EPSILON);
        assert!((config.clamp_scale(0.3) - 0.3).abs() < f64::EPSILON);
    }
}
