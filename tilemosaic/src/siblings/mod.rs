//! Sibling enumeration under wraparound.
//!
//! A single world of tiles may not fill a wide viewport, and panning near the
//! antimeridian needs the same tile drawn at several horizontal offsets. This
//! module expands one logical tile into every raw placement the viewport
//! needs, grouped by the wrapped tile each placement maps back onto.
//!
//! # Example
//!
//! ```
//! use tilemosaic::coord::TileCoord;
//! use tilemosaic::siblings::{get_siblings, CameraState, ViewScale};
//!
//! let camera = CameraState::new(1536.0, 512.0, 0.0, 0.5, 0.5);
//! let placements = get_siblings(TileCoord::new(0, 0, 0), &camera, &ViewScale::default());
//!
//! // One logical tile drawn three times side by side
//! assert_eq!(placements.len(), 1);
//! assert_eq!(placements.offset_count(), 3);
//! ```

mod placements;

pub use placements::{PlacementGroup, Placements};

use tracing::trace;

use crate::coord::{clip, max_index, tile_to_key, Offset, TileCoord};

/// Screen width of one tile at magnification 1, before pixel ratio.
pub const DEFAULT_BASE_TILE_SIZE: f64 = 512.0;

/// Sibling counts below this are treated as an exact fit.
pub const SIBLING_EPSILON: f64 = 0.001;

/// Deepest a tile may sit below the camera zoom for [`get_siblings`] to stay
/// bounded. Each level of gap halves the on-screen tile size and doubles the
/// placements per axis.
pub const MAX_ZOOM_GAP: u8 = 6;

/// True when tiles at `tile_z` are no more than [`MAX_ZOOM_GAP`] levels
/// deeper than `zoom`. NaN zoom is never within the gap.
pub fn within_zoom_gap(tile_z: u8, zoom: f64) -> bool {
    zoom >= f64::from(tile_z) - f64::from(MAX_ZOOM_GAP)
}

/// Snapshot of the viewport for one frame.
///
/// Owned by the interaction layer; read-only here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Viewport width in device pixels.
    pub viewport_width: f64,
    /// Viewport height in device pixels.
    pub viewport_height: f64,
    /// Continuous zoom.
    pub zoom: f64,
    /// Camera column in tile-space units at the target level.
    pub camera_x: f64,
    /// Camera row in tile-space units at the target level.
    pub camera_y: f64,
}

impl CameraState {
    /// Create a camera snapshot.
    pub fn new(
        viewport_width: f64,
        viewport_height: f64,
        zoom: f64,
        camera_x: f64,
        camera_y: f64,
    ) -> Self {
        Self {
            viewport_width,
            viewport_height,
            zoom,
            camera_x,
            camera_y,
        }
    }
}

/// Device scale inputs for the on-screen tile size.
///
/// The pixel ratio is passed in explicitly instead of being read from the
/// windowing environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewScale {
    /// Tile width in CSS pixels at magnification 1.
    pub base_tile_size: f64,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f64,
}

impl Default for ViewScale {
    fn default() -> Self {
        Self {
            base_tile_size: DEFAULT_BASE_TILE_SIZE,
            pixel_ratio: 1.0,
        }
    }
}

impl ViewScale {
    /// Create a scale with the default base size.
    pub fn with_pixel_ratio(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            ..Self::default()
        }
    }

    /// On-screen size in device pixels of a level-`tile_z` tile at `zoom`.
    pub fn tile_size(&self, zoom: f64, tile_z: u8) -> f64 {
        let magnification = 2.0_f64.powf(zoom - f64::from(tile_z));
        self.base_tile_size * self.pixel_ratio * magnification
    }
}

/// Inclusive range of integer tile steps to enumerate on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    /// Steps before the home tile (zero or negative).
    pub prev: i64,
    /// Steps after the home tile.
    pub next: i64,
}

impl AxisRange {
    /// The home tile only.
    pub const HOME: AxisRange = AxisRange { prev: 0, next: 0 };

    /// Iterate the steps in ascending order.
    pub fn steps(&self) -> impl Iterator<Item = i64> {
        self.prev..=self.next
    }
}

/// Computes how many tile steps either side of the home tile are needed to
/// cover `length` pixels of viewport with tiles of `tile_size` pixels.
///
/// The split is biased by where the camera sits inside its own tile, so an
/// off-centre camera covers more on the side with more exposed viewport.
/// Zero, negative or non-finite sizes need no siblings.
pub fn get_offsets(length: f64, tile_size: f64, camera: f64) -> AxisRange {
    if !(length > 0.0 && tile_size > 0.0) || !length.is_finite() || !tile_size.is_finite() {
        return AxisRange::HOME;
    }

    let sibling_count = (length - tile_size) / tile_size;

    // Do not add offsets for a sub-pixel remainder
    if sibling_count.abs() < SIBLING_EPSILON {
        return AxisRange::HOME;
    }

    let camera_offset = if camera.is_finite() {
        camera - camera.floor()
    } else {
        0.5
    };
    let prev = sibling_count / 2.0 + 0.5 - camera_offset;
    let next = sibling_count - prev;

    AxisRange {
        prev: -(prev.ceil() as i64),
        next: next.ceil() as i64,
    }
}

/// Every raw placement needed to draw `tile` across the viewport, grouped by
/// the wrapped key each placement maps to.
///
/// Enumeration is column-major (x outer, y inner, both ascending) and group
/// order follows the first placement reaching each key.
///
/// The placement count grows as `4^(tile.z - zoom)` once the tile is deeper
/// than the camera zoom. Callers taking the tile from untrusted input should
/// check [`within_zoom_gap`] first; tiles chosen with
/// [`level_for_zoom`](crate::coord::level_for_zoom) always are.
pub fn get_siblings(tile: TileCoord, camera: &CameraState, scale: &ViewScale) -> Placements {
    let tile_size = scale.tile_size(camera.zoom, tile.z);

    let delta_x = get_offsets(camera.viewport_width, tile_size, camera.camera_x);
    let delta_y = get_offsets(camera.viewport_height, tile_size, camera.camera_y);

    let max = max_index(tile.z);
    let placements: Placements = delta_x
        .steps()
        .flat_map(|dx| delta_y.steps().map(move |dy| (dx, dy)))
        .map(|(dx, dy)| Offset::new(i64::from(tile.x) + dx, i64::from(tile.y) + dy, tile.z))
        .map(|offset| {
            let wrapped = TileCoord::new(
                clip(offset.x, max) as u32,
                clip(offset.y, max) as u32,
                offset.z,
            );
            (tile_to_key(wrapped), offset)
        })
        .collect();

    trace!(
        tile = %tile,
        tile_size,
        ?delta_x,
        ?delta_y,
        groups = placements.len(),
        "enumerated siblings"
    );

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> crate::coord::TileKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_offsets_symmetric_when_centered() {
        assert_eq!(
            get_offsets(1536.0, 512.0, 0.5),
            AxisRange { prev: -1, next: 1 }
        );
        assert_eq!(
            get_offsets(1536.0, 512.0, 7.5),
            AxisRange { prev: -1, next: 1 }
        );
    }

    #[test]
    fn test_offsets_exact_fit() {
        assert_eq!(get_offsets(512.0, 512.0, 0.3), AxisRange::HOME);
        assert_eq!(get_offsets(512.2, 512.0, 0.3), AxisRange::HOME);
    }

    #[test]
    fn test_offsets_biased_by_camera() {
        // Camera near the left edge of its tile: more tiles needed on the left
        let range = get_offsets(1536.0, 512.0, 0.1);
        assert_eq!(range, AxisRange { prev: -2, next: 1 });

        // Camera near the right edge: more on the right
        let range = get_offsets(1536.0, 512.0, 0.9);
        assert_eq!(range, AxisRange { prev: -1, next: 2 });
    }

    #[test]
    fn test_offsets_degenerate_sizes() {
        assert_eq!(get_offsets(0.0, 512.0, 0.5), AxisRange::HOME);
        assert_eq!(get_offsets(-10.0, 512.0, 0.5), AxisRange::HOME);
        assert_eq!(get_offsets(1024.0, 0.0, 0.5), AxisRange::HOME);
        assert_eq!(get_offsets(1024.0, f64::NAN, 0.5), AxisRange::HOME);
    }

    #[test]
    fn test_tile_size_scales_with_zoom_and_ratio() {
        let scale = ViewScale::with_pixel_ratio(2.0);
        assert_eq!(scale.tile_size(3.0, 3), 1024.0);
        assert_eq!(scale.tile_size(4.0, 3), 2048.0);
        assert_eq!(scale.tile_size(2.0, 3), 512.0);
    }

    #[test]
    fn test_single_world_wraps_onto_itself() {
        let camera = CameraState::new(1536.0, 512.0, 0.0, 0.5, 0.5);
        let placements = get_siblings(TileCoord::new(0, 0, 0), &camera, &ViewScale::default());

        assert_eq!(placements.len(), 1);
        let offsets = placements.get("0,0,0").unwrap();
        assert_eq!(
            offsets,
            &[
                Offset::new(-1, 0, 0),
                Offset::new(0, 0, 0),
                Offset::new(1, 0, 0)
            ]
        );
    }

    #[test]
    fn test_antimeridian_wrap_groups() {
        // Level 2 tile on the east edge, viewport 3 tiles wide
        let camera = CameraState::new(1536.0, 512.0, 2.0, 3.5, 1.5);
        let placements = get_siblings(TileCoord::new(3, 1, 2), &camera, &ViewScale::default());

        let keys: Vec<_> = placements.keys().cloned().collect();
        assert_eq!(keys, vec![key("2,1,2"), key("3,1,2"), key("0,1,2")]);
        assert_eq!(placements.get("0,1,2").unwrap(), &[Offset::new(4, 1, 2)]);
    }

    #[test]
    fn test_enumeration_order_x_outer() {
        let camera = CameraState::new(1536.0, 1536.0, 3.0, 4.5, 4.5);
        let placements = get_siblings(TileCoord::new(4, 4, 3), &camera, &ViewScale::default());

        assert_eq!(placements.len(), 9);
        let first: Vec<_> = placements.keys().take(3).map(|k| k.to_string()).collect();
        assert_eq!(first, vec!["3,3,3", "3,4,3", "3,5,3"]);
    }

    #[test]
    fn test_no_wrap_needed_single_placement() {
        let camera = CameraState::new(512.0, 512.0, 1.0, 0.5, 0.5);
        let placements = get_siblings(TileCoord::new(0, 1, 1), &camera, &ViewScale::default());
        assert_eq!(placements.len(), 1);
        assert_eq!(placements.offset_count(), 1);
    }

    #[test]
    fn test_zoom_gap_bounds() {
        assert!(within_zoom_gap(0, 0.0));
        assert!(within_zoom_gap(10, 4.0));
        assert!(!within_zoom_gap(10, 3.9));
        assert!(!within_zoom_gap(20, 0.0));
        assert!(!within_zoom_gap(0, f64::NAN));
    }

    #[test]
    fn test_deepest_allowed_tile_stays_small() {
        // Six levels below the camera: 8px tiles over a 1024px square
        let camera = CameraState::new(1024.0, 1024.0, 4.0, 0.5, 0.5);
        let tile = TileCoord::new(0, 0, 10);
        assert!(within_zoom_gap(tile.z, camera.zoom));

        let placements = get_siblings(tile, &camera, &ViewScale::default());
        assert!(placements.offset_count() <= 129 * 129);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_every_offset_wraps_to_its_key(
                z in 0u8..=6,
                x_raw in 0u32..64,
                y_raw in 0u32..64,
                width in 1.0..4000.0_f64,
                height in 1.0..4000.0_f64,
                zoom_frac in 0.0..1.0_f64,
                cx in 0.0..64.0_f64,
                cy in 0.0..64.0_f64,
            ) {
                let size = 1u32 << z;
                let tile = TileCoord::new(x_raw % size, y_raw % size, z);
                let camera = CameraState::new(width, height, f64::from(z) + zoom_frac, cx, cy);
                let placements = get_siblings(tile, &camera, &ViewScale::default());
                let max = max_index(z);

                prop_assert!(!placements.is_empty());
                for group in placements.iter() {
                    let wrapped = group.key.tile();
                    for offset in &group.offsets {
                        prop_assert_eq!(clip(offset.x, max), i64::from(wrapped.x));
                        prop_assert_eq!(clip(offset.y, max), i64::from(wrapped.y));
                        prop_assert_eq!(offset.z, z);
                    }
                }
            }
        }
    }
}
