//! Pyramid metadata from a multiscale store descriptor.
//!
//! Reads the level count and tile size from the consolidated metadata of a
//! multiscale store:
//!
//! ```text
//! metadata[".zattrs"].multiscales[0].metadata.kwargs
//!     .levels           → number of pyramid levels
//!     .pixels_per_tile  → tile edge in pixels
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::MAX_LEVEL;

/// Errors reading pyramid metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The descriptor is not valid JSON or has the wrong shape.
    #[error("Invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No multiscale entry to read levels from.
    #[error("Metadata has no multiscales entry")]
    MissingMultiscales,

    /// Level count outside `1..=MAX_LEVEL + 1`.
    #[error("Invalid level count: {0}")]
    InvalidLevels(u32),

    /// Tile size of zero.
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),
}

/// Levels and tile size of a raster pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PyramidMetadata {
    /// Every level, `0..=max_zoom`.
    pub levels: Vec<u8>,
    /// Deepest level.
    pub max_zoom: u8,
    /// Tile edge in pixels.
    pub tile_size: u32,
}

impl PyramidMetadata {
    /// Build from a level count and tile size.
    pub fn new(level_count: u32, tile_size: u32) -> Result<Self, MetadataError> {
        if level_count == 0 || level_count > u32::from(MAX_LEVEL) + 1 {
            return Err(MetadataError::InvalidLevels(level_count));
        }
        if tile_size == 0 {
            return Err(MetadataError::InvalidTileSize(tile_size));
        }

        let max_zoom = (level_count - 1) as u8;
        Ok(Self {
            levels: (0..=max_zoom).collect(),
            max_zoom,
            tile_size,
        })
    }

    /// Parse the consolidated metadata JSON of a store.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let doc: StoreMetadata = serde_json::from_str(json)?;
        let kwargs = doc
            .metadata
            .zattrs
            .multiscales
            .into_iter()
            .next()
            .ok_or(MetadataError::MissingMultiscales)?
            .metadata
            .kwargs;

        Self::new(kwargs.levels, kwargs.pixels_per_tile)
    }
}

#[derive(Deserialize)]
struct StoreMetadata {
    metadata: ConsolidatedMetadata,
}

#[derive(Deserialize)]
struct ConsolidatedMetadata {
    #[serde(rename = ".zattrs")]
    zattrs: RootAttributes,
}

#[derive(Deserialize)]
struct RootAttributes {
    #[serde(default)]
    multiscales: Vec<Multiscale>,
}

#[derive(Deserialize)]
struct Multiscale {
    metadata: MultiscaleMetadata,
}

#[derive(Deserialize)]
struct MultiscaleMetadata {
    kwargs: PyramidKwargs,
}

#[derive(Deserialize)]
struct PyramidKwargs {
    levels: u32,
    pixels_per_tile: u32,
}
