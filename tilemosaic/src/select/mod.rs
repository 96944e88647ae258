//! Substitute selection for tiles that are not yet loaded.
//!
//! When the exact tile a viewport needs has no data, something else must be
//! drawn in its footprint until it arrives:
//!
//! 1. **Ancestor**: the nearest coarser tile (or the target itself) that is
//!    resident. One ancestor always covers the whole footprint.
//! 2. **Descendants**: otherwise, the mosaic of finer tiles with the best
//!    resident coverage, stopping at the first fully resident mosaic.
//! 3. **Target**: when nothing is resident at all, the target key itself is
//!    returned as a request for the loader.
//!
//! ```text
//!          z-2   ┌───────────────┐   ancestor search walks up
//!                │       A       │   (x/2, y/2, z-1) until resident
//!          z     │   ┌───┐       │
//!                │   │ T │       │
//!          z+1   │   ├─┬─┤       │   descendant search walks down
//!                │   └─┴─┘       │   scoring each mosaic's coverage
//!                └───────────────┘
//! ```

mod residency;

pub use residency::Residency;

use serde::Serialize;
use tracing::{debug, trace};

use crate::coord::{tile_to_key, TileCoord, TileKey, MAX_LEVEL};

/// What to draw in place of a target tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "keys", rename_all = "snake_case")]
pub enum Substitute {
    /// A single resident tile at the target's level or coarser.
    Ancestor(TileKey),
    /// Finer tiles covering (part of) the target's footprint.
    Descendants(Vec<TileKey>),
    /// Nothing resident; the target should be fetched.
    Target(TileKey),
}

impl Substitute {
    /// The keys to draw, in order. Never empty.
    pub fn keys(&self) -> &[TileKey] {
        match self {
            Substitute::Ancestor(key) | Substitute::Target(key) => std::slice::from_ref(key),
            Substitute::Descendants(keys) => keys,
        }
    }

    /// Consume into the ordered key list.
    pub fn into_keys(self) -> Vec<TileKey> {
        match self {
            Substitute::Ancestor(key) | Substitute::Target(key) => vec![key],
            Substitute::Descendants(keys) => keys,
        }
    }

    /// True when nothing was resident and the target must be fetched.
    pub fn is_load_request(&self) -> bool {
        matches!(self, Substitute::Target(_))
    }
}

/// Pick what to draw for `target`, given the current residency snapshot.
///
/// See the module docs for the search order.
pub fn select_substitute<R>(target: &TileKey, residency: &R, max_zoom: u8) -> Substitute
where
    R: Residency + ?Sized,
{
    if let Some(ancestor) = get_ancestor_to_render(target, residency) {
        debug!(tile = %target, ancestor = %ancestor, "rendering ancestor");
        return Substitute::Ancestor(ancestor);
    }

    let descendants = get_descendants_to_render(target, residency, max_zoom);
    if !descendants.is_empty() {
        debug!(
            tile = %target,
            count = descendants.len(),
            "rendering descendant mosaic"
        );
        return Substitute::Descendants(descendants);
    }

    debug!(tile = %target, "nothing resident, requesting target");
    Substitute::Target(target.clone())
}

/// Ordered, non-empty list of keys to draw for `target`.
///
/// Either one resident ancestor, a descendant mosaic, or `target` itself.
pub fn get_keys_to_render<R>(target: &TileKey, residency: &R, max_zoom: u8) -> Vec<TileKey>
where
    R: Residency + ?Sized,
{
    select_substitute(target, residency, max_zoom).into_keys()
}

/// Nearest resident tile among `target` and its ancestors up to level 0.
pub fn get_ancestor_to_render<R>(target: &TileKey, residency: &R) -> Option<TileKey>
where
    R: Residency + ?Sized,
{
    std::iter::successors(Some(target.tile()), TileCoord::parent)
        .map(tile_to_key)
        .find(|key| residency.is_resident(key))
}

/// Best-covered mosaic of tiles at or below the target's level.
///
/// At depth `delta` below the target, scores the `(delta + 1) × (delta + 1)`
/// grid anchored at `(x·2^delta, y·2^delta)`. Returns the first fully
/// resident grid, else the grid with the highest coverage (the shallowest
/// wins ties), else an empty list. Grids are ordered by column, then row.
pub fn get_descendants_to_render<R>(target: &TileKey, residency: &R, max_zoom: u8) -> Vec<TileKey>
where
    R: Residency + ?Sized,
{
    let origin = target.tile();
    let mut coverage = 0.0;
    let mut descendants = Vec::new();

    for z in origin.z..=max_zoom.min(MAX_LEVEL) {
        let delta = u32::from(z - origin.z);
        let (x, y) = (origin.x << delta, origin.y << delta);

        let keys: Vec<TileKey> = (0..=delta)
            .flat_map(|dx| (0..=delta).map(move |dy| (dx, dy)))
            .map(|(dx, dy)| tile_to_key(TileCoord::new(x + dx, y + dy, z)))
            .collect();

        let resident = keys.iter().filter(|key| residency.is_resident(key)).count();
        let current = resident as f64 / keys.len() as f64;

        trace!(tile = %target, level = z, resident, total = keys.len(), "mosaic coverage");

        if current >= 1.0 {
            return keys;
        }
        if current > coverage {
            coverage = current;
            descendants = keys;
        }
    }

    descendants
}

/// First rendered key that is a strict ancestor of `key`.
///
/// Used to find which on-screen tile a not-yet-loaded tile can borrow pixels
/// from.
pub fn get_overlapping_ancestor<'a, I>(key: &TileKey, rendered: I) -> Option<&'a TileKey>
where
    I: IntoIterator<Item = &'a TileKey>,
{
    let child = key.tile();

    rendered.into_iter().find(|candidate| {
        let parent = candidate.tile();
        if child.z <= parent.z {
            return false;
        }
        let shift = child.z - parent.z;
        (child.x >> shift) == parent.x && (child.y >> shift) == parent.y
    })
}
