//! Per-frame draw planning.
//!
//! Ties the components together for one frame:
//!
//! ```text
//! needed tiles ─► get_siblings ─► wrapped key ─► select_substitute
//!                     │                                 │
//!                     └── raw offsets ──────────────────┴─► get_adjusted_offset
//!                                                              │
//!                                                              ▼
//!                                                         DrawCommand
//! ```
//!
//! The residency snapshot is only borrowed for the duration of
//! [`FramePlanner::plan`]; the next frame may pass a different one.

use serde::Serialize;
use tracing::debug;

use crate::config::ViewerConfig;
use crate::coord::{clip, level_for_zoom, max_index, Offset, TileCoord, TileKey};
use crate::offset::get_adjusted_offset;
use crate::select::{select_substitute, Residency};
use crate::siblings::{get_siblings, CameraState, ViewScale};

/// One draw call for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawCommand {
    /// Raw (unwrapped) placement being filled.
    pub placement: Offset,
    /// Tile the placement wraps onto.
    pub wrapped: TileKey,
    /// Tile whose data is drawn.
    pub render: TileKey,
    /// Placement in `render`'s grid.
    pub adjusted: (i64, i64),
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FramePlan {
    /// Draw calls in order.
    pub commands: Vec<DrawCommand>,
    /// Wrapped tiles with nothing resident to stand in; the loader should
    /// fetch these.
    pub load_requests: Vec<TileKey>,
}

/// Plans draw calls for a pyramid with fixed scale and depth.
#[derive(Debug, Clone, Copy)]
pub struct FramePlanner {
    scale: ViewScale,
    max_zoom: u8,
}

impl FramePlanner {
    /// Create a planner.
    pub fn new(scale: ViewScale, max_zoom: u8) -> Self {
        Self { scale, max_zoom }
    }

    /// Create a planner from loaded configuration.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.view_scale(), config.max_zoom)
    }

    /// Deepest pyramid level considered for substitutes.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// The tile directly under the camera at the level drawn for its zoom.
    pub fn needed_tiles(&self, camera: &CameraState) -> Vec<TileCoord> {
        let level = level_for_zoom(camera.zoom, Some(self.max_zoom));
        let max = max_index(level);
        let axis = |v: f64| {
            let v = if v.is_finite() { v.floor() as i64 } else { 0 };
            clip(v, max) as u32
        };

        vec![TileCoord::new(axis(camera.camera_x), axis(camera.camera_y), level)]
    }

    /// Plan the draw calls for `needed` tiles.
    ///
    /// Ordering: needed tile, then wrapped key, then substitute key, then raw
    /// placement.
    pub fn plan<R>(&self, needed: &[TileCoord], camera: &CameraState, residency: &R) -> FramePlan
    where
        R: Residency + ?Sized,
    {
        let mut plan = FramePlan::default();

        for &tile in needed {
            for group in get_siblings(tile, camera, &self.scale) {
                let substitute = select_substitute(&group.key, residency, self.max_zoom);
                if substitute.is_load_request() && !plan.load_requests.contains(&group.key) {
                    plan.load_requests.push(group.key.clone());
                }

                for render in substitute.keys() {
                    for &placement in &group.offsets {
                        plan.commands.push(DrawCommand {
                            placement,
                            wrapped: group.key.clone(),
                            render: render.clone(),
                            adjusted: get_adjusted_offset(placement, render),
                        });
                    }
                }
            }
        }

        debug!(
            needed = needed.len(),
            commands = plan.commands.len(),
            load_requests = plan.load_requests.len(),
            "planned frame"
        );

        plan
    }
}
