//! Viewer configuration.
//!
//! Settings live in an INI file:
//!
//! ```ini
//! [view]
//! base_tile_size = 512
//! pixel_ratio = 2.0
//!
//! [pyramid]
//! max_zoom = 6
//! tile_size = 128
//! ```
//!
//! Missing sections or keys keep their defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::coord::MAX_LEVEL;
use crate::pyramid::{MetadataError, PyramidMetadata};
use crate::siblings::{ViewScale, DEFAULT_BASE_TILE_SIZE};

/// Default pyramid tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A key holds a value of the wrong type or range.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Settings for the view and the pyramid being viewed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// On-screen tile width in CSS pixels at magnification 1.
    pub base_tile_size: f64,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f64,
    /// Deepest pyramid level.
    pub max_zoom: u8,
    /// Pyramid tile edge in pixels.
    pub tile_size: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_tile_size: DEFAULT_BASE_TILE_SIZE,
            pixel_ratio: 1.0,
            max_zoom: 0,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl ViewerConfig {
    /// Load from an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini_str(&contents)
    }

    /// Parse from INI text.
    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        if let Some(view) = ini.section(Some("view")) {
            if let Some(size) = parse_key::<f64>(view, "view", "base_tile_size")? {
                config.base_tile_size = positive("view.base_tile_size", size)?;
            }
            if let Some(ratio) = parse_key::<f64>(view, "view", "pixel_ratio")? {
                config.pixel_ratio = positive("view.pixel_ratio", ratio)?;
            }
        }

        if let Some(pyramid) = ini.section(Some("pyramid")) {
            if let Some(max_zoom) = parse_key::<u8>(pyramid, "pyramid", "max_zoom")? {
                if max_zoom > MAX_LEVEL {
                    return Err(invalid("pyramid.max_zoom", max_zoom));
                }
                config.max_zoom = max_zoom;
            }
            if let Some(tile_size) = parse_key::<u32>(pyramid, "pyramid", "tile_size")? {
                if tile_size == 0 {
                    return Err(invalid("pyramid.tile_size", tile_size));
                }
                config.tile_size = tile_size;
            }
        }

        Ok(config)
    }

    /// Set the device pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Set the deepest pyramid level.
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Adopt the depth and tile size read from a store's metadata.
    pub fn with_pyramid(mut self, pyramid: &PyramidMetadata) -> Self {
        self.max_zoom = pyramid.max_zoom;
        self.tile_size = pyramid.tile_size;
        self
    }

    /// The pyramid described by `[pyramid]`, for stores without metadata.
    pub fn pyramid(&self) -> Result<PyramidMetadata, MetadataError> {
        PyramidMetadata::new(u32::from(self.max_zoom) + 1, self.tile_size)
    }

    /// Scale inputs for sibling enumeration.
    pub fn view_scale(&self) -> ViewScale {
        ViewScale {
            base_tile_size: self.base_tile_size,
            pixel_ratio: self.pixel_ratio,
        }
    }
}

fn parse_key<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match props.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(&format!("{}.{}", section, key), raw)),
    }
}

fn positive(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(key, value))
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
