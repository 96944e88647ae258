//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (longitude/latitude)
//! and Web Mercator tile space, plus the canonical tile key encoding and the
//! wraparound rules used when the viewport spans more than one world.

mod types;
mod wrap;

pub use types::{CoordError, Offset, TileCoord, TileKey, KEY_DELIMITER, MAX_LEVEL};
pub use wrap::{clip, max_index};

use std::f64::consts::PI;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Fractional position in tile space at a given level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpacePoint {
    /// Fractional column, in `[0, 2^z)`
    pub x: f64,
    /// Fractional row, in `[0, 2^z]`
    pub y: f64,
    /// Level the position is expressed at
    pub z: u8,
}

/// Encode a tile as its canonical `"x,y,z"` key.
#[inline]
pub fn tile_to_key(tile: TileCoord) -> TileKey {
    TileKey::from(tile)
}

/// Decode an `"x,y,z"` key into its tile.
///
/// # Errors
///
/// [`CoordError::InvalidKey`] when the string is not three non-negative
/// integers describing a tile inside its level's grid.
#[inline]
pub fn key_to_tile(key: &str) -> Result<TileCoord, CoordError> {
    key.parse::<TileKey>().map(|k| k.tile())
}

/// Projects longitude/latitude (degrees) into fractional tile space.
///
/// Longitude wraps modulo the world width, so `x` always lands in
/// `[0, 2^z)`. Latitude does not wrap: `y` is clamped to `[0, 2^z]`, which
/// also absorbs latitudes at or beyond the poles.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees (any value; wrapped)
/// * `lat` - Latitude in degrees
/// * `z` - Pyramid level
///
/// # Returns
///
/// The fractional column and row at level `z`.
pub fn point_to_tile_space(lon: f64, lat: f64, z: u8) -> TileSpacePoint {
    let sin = (lat * DEG_TO_RAD).sin();
    let z2 = 2.0_f64.powi(i32::from(z));

    let mut x = z2 * (lon / 360.0 + 0.5);
    let y = z2 * (0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI);

    x %= z2;
    if x < 0.0 {
        x += z2;
    }

    TileSpacePoint {
        x,
        y: y.clamp(0.0, z2),
        z,
    }
}

/// Converts longitude/latitude (degrees) to the tile containing it.
///
/// The row is clamped to `2^z - 1` so a point on the southern edge never
/// produces a row past the bottom of the grid.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees (any value; wrapped)
/// * `lat` - Latitude in degrees
/// * `z` - Pyramid level
///
/// # Returns
///
/// The tile at level `z` whose area contains the point.
pub fn point_to_tile(lon: f64, lat: f64, z: u8) -> TileCoord {
    let point = point_to_tile_space(lon, lat, z);
    let max = max_index(z) as f64;

    TileCoord {
        x: point.x.floor().min(max) as u32,
        y: point.y.floor().min(max) as u32,
        z,
    }
}

/// Inverse of [`point_to_tile_space`]: fractional tile space to
/// `(lon, lat)` in degrees.
///
/// Integer inputs give a tile's northwest corner.
///
/// # Arguments
///
/// * `x` - Fractional column
/// * `y` - Fractional row
/// * `z` - Level the position is expressed at
///
/// # Returns
///
/// `(lon, lat)` in degrees.
pub fn tile_to_point(x: f64, y: f64, z: u8) -> (f64, f64) {
    let z2 = 2.0_f64.powi(i32::from(z));

    let lon = 360.0 * (x / z2) - 180.0;

    let y2 = 180.0 - (y / z2) * 360.0;
    let lat = (360.0 / PI) * (y2 * DEG_TO_RAD).exp().atan() - 90.0;

    (lon, lat)
}

/// Pyramid level to draw at a continuous zoom.
///
/// Floors `zoom`, never going below 0 and, when given, never above
/// `max_zoom`.
///
/// # Arguments
///
/// * `zoom` - Continuous camera zoom
/// * `max_zoom` - Deepest level of the pyramid, if known; otherwise
///   [`MAX_LEVEL`] caps the result
pub fn level_for_zoom(zoom: f64, max_zoom: Option<u8>) -> u8 {
    let level = zoom.floor().max(0.0);
    let level = match max_zoom {
        Some(max) => level.min(f64::from(max)),
        None => level.min(f64::from(MAX_LEVEL)),
    };
    level as u8
}
