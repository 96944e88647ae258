//! Tile, key and offset types shared by every component.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Deepest zoom level a tile key may carry.
///
/// Keeps `2^z` and descendant coordinates inside `u32` arithmetic.
pub const MAX_LEVEL: u8 = 30;

/// Separator between the fields of a [`TileKey`].
pub const KEY_DELIMITER: char = ',';

/// Errors produced when decoding tile keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// The key string is not a well-formed `x,y,z` triple.
    #[error("Invalid tile key '{0}'")]
    InvalidKey(String),
}

/// A tile in the quad-tree pyramid.
///
/// The grid at level `z` is `2^z × 2^z`, with `x` growing east and `y`
/// growing south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column (0 = antimeridian, west edge)
    pub x: u32,
    /// Row (0 = north edge)
    pub y: u32,
    /// Pyramid level
    pub z: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// The tile one level up that contains this one.
    ///
    /// Returns `None` at level 0.
    pub fn parent(&self) -> Option<TileCoord> {
        if self.z == 0 {
            return None;
        }
        Some(TileCoord::new(self.x / 2, self.y / 2, self.z - 1))
    }

    /// The canonical key of this tile.
    pub fn key(&self) -> TileKey {
        TileKey::from(*self)
    }

    /// This tile as an unwrapped placement.
    pub fn to_offset(&self) -> Offset {
        Offset::new(i64::from(self.x), i64::from(self.y), self.z)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.x, KEY_DELIMITER, self.y, KEY_DELIMITER, self.z
        )
    }
}

/// One wrapped screen placement of a tile.
///
/// Same shape as [`TileCoord`], but `x` and `y` may fall outside
/// `[0, 2^z - 1]` before wraparound clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

impl Offset {
    /// Create a new offset.
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Canonical string form of a tile, `"x,y,z"`.
///
/// A `TileKey` can only be built from a [`TileCoord`] or by parsing, so
/// holding one means the key is well formed. Equality and hashing use the
/// string form only, which lets key-indexed maps be queried with `&str`.
#[derive(Debug, Clone)]
pub struct TileKey {
    tile: TileCoord,
    text: String,
}

impl TileKey {
    /// The tile this key names.
    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<TileCoord> for TileKey {
    fn from(tile: TileCoord) -> Self {
        Self {
            tile,
            text: tile.to_string(),
        }
    }
}

impl From<&TileKey> for TileCoord {
    fn from(key: &TileKey) -> Self {
        key.tile
    }
}

impl FromStr for TileKey {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tile = parse_key(s)?;
        Ok(Self {
            tile,
            text: s.to_string(),
        })
    }
}

impl PartialEq for TileKey {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for TileKey {}

impl Hash for TileKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for TileKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TileKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl Borrow<str> for TileKey {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for TileKey {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for TileKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for TileKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse and validate an `x,y,z` key.
///
/// Rejects anything that would not round-trip through [`TileCoord`]'s
/// `Display`: extra whitespace, signs, leading zeros, out-of-grid columns.
fn parse_key(s: &str) -> Result<TileCoord, CoordError> {
    let invalid = || CoordError::InvalidKey(s.to_string());

    let mut fields = s.split(KEY_DELIMITER);
    let (Some(x), Some(y), Some(z), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid());
    };

    let x = parse_field::<u32>(x).ok_or_else(invalid)?;
    let y = parse_field::<u32>(y).ok_or_else(invalid)?;
    let z = parse_field::<u8>(z).ok_or_else(invalid)?;

    if z > MAX_LEVEL {
        return Err(invalid());
    }
    let size = 1u64 << z;
    if u64::from(x) >= size || u64::from(y) >= size {
        return Err(invalid());
    }

    Ok(TileCoord { x, y, z })
}

fn parse_field<T: FromStr>(field: &str) -> Option<T> {
    let canonical = !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit())
        && (field == "0" || !field.starts_with('0'));
    if !canonical {
        return None;
    }
    field.parse().ok()
}
