//! Ordered grouping of raw placements by wrapped tile key.

use std::collections::HashMap;

use serde::Serialize;

use crate::coord::{Offset, TileKey};

/// All raw placements that wrap onto one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementGroup {
    /// Key of the wrapped (clipped) tile.
    pub key: TileKey,
    /// Unclipped placements, in enumeration order.
    pub offsets: Vec<Offset>,
}

/// Mapping from wrapped tile key to its raw placements.
///
/// Keys keep the order in which they were first seen. Built once by
/// collecting `(key, offset)` pairs and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Placements {
    groups: Vec<PlacementGroup>,
}

impl Placements {
    /// Number of distinct wrapped keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when there are no placements at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of raw placements across all keys.
    pub fn offset_count(&self) -> usize {
        self.groups.iter().map(|g| g.offsets.len()).sum()
    }

    /// Raw placements for a wrapped key.
    pub fn get(&self, key: &str) -> Option<&[Offset]> {
        self.groups
            .iter()
            .find(|g| g.key.as_str() == key)
            .map(|g| g.offsets.as_slice())
    }

    /// Wrapped keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &TileKey> {
        self.groups.iter().map(|g| &g.key)
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, PlacementGroup> {
        self.groups.iter()
    }
}

impl FromIterator<(TileKey, Offset)> for Placements {
    fn from_iter<I: IntoIterator<Item = (TileKey, Offset)>>(iter: I) -> Self {
        let mut index: HashMap<TileKey, usize> = HashMap::new();
        let mut groups: Vec<PlacementGroup> = Vec::new();

        for (key, offset) in iter {
            match index.get(&key) {
                Some(&i) => groups[i].offsets.push(offset),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(PlacementGroup {
                        key,
                        offsets: vec![offset],
                    });
                }
            }
        }

        Self { groups }
    }
}

impl IntoIterator for Placements {
    type Item = PlacementGroup;
    type IntoIter = std::vec::IntoIter<PlacementGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a Placements {
    type Item = &'a PlacementGroup;
    type IntoIter = std::slice::Iter<'a, PlacementGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
