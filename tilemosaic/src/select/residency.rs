//! Read-only view of which tiles have pixel data loaded.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::BuildHasher;

use dashmap::DashMap;

use crate::coord::TileKey;

/// Answers whether a tile's data buffer is currently resident.
///
/// Implemented by whatever the tile cache exposes. Keys the cache has never
/// seen must report `false`; absence of data is the normal steady state.
///
/// Selection reads a residency snapshot for the duration of one call and
/// never retains it, so a concurrent cache (e.g. [`DashMap`]) may be updated
/// by loaders between frames.
pub trait Residency {
    /// True when `key` has data ready to draw.
    fn is_resident(&self, key: &TileKey) -> bool;
}

impl<R: Residency + ?Sized> Residency for &R {
    fn is_resident(&self, key: &TileKey) -> bool {
        (**self).is_resident(key)
    }
}

impl<S: BuildHasher> Residency for HashMap<TileKey, bool, S> {
    fn is_resident(&self, key: &TileKey) -> bool {
        self.get(key).copied().unwrap_or(false)
    }
}

impl<S: BuildHasher> Residency for HashSet<TileKey, S> {
    fn is_resident(&self, key: &TileKey) -> bool {
        self.contains(key)
    }
}

impl Residency for BTreeMap<TileKey, bool> {
    fn is_resident(&self, key: &TileKey) -> bool {
        self.get(key).copied().unwrap_or(false)
    }
}

impl Residency for BTreeSet<TileKey> {
    fn is_resident(&self, key: &TileKey) -> bool {
        self.contains(key)
    }
}

impl<S: BuildHasher + Clone> Residency for DashMap<TileKey, bool, S> {
    fn is_resident(&self, key: &TileKey) -> bool {
        self.get(key).map(|entry| *entry).unwrap_or(false)
    }
}
