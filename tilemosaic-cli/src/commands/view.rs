//! Viewport commands: siblings, substitute selection and frame planning.

use std::collections::HashSet;

use clap::Args;
use tilemosaic::config::ViewerConfig;
use tilemosaic::coord::{TileKey, MAX_LEVEL};
use tilemosaic::frame::FramePlanner;
use tilemosaic::select::select_substitute;
use tilemosaic::siblings::{get_siblings, within_zoom_gap, CameraState, MAX_ZOOM_GAP};

use super::common::print_json;
use crate::error::CliError;

/// Viewport snapshot shared by the viewport commands.
#[derive(Debug, Args)]
pub struct CameraArgs {
    /// Viewport width in device pixels
    #[arg(long)]
    pub width: f64,

    /// Viewport height in device pixels
    #[arg(long)]
    pub height: f64,

    /// Continuous zoom
    #[arg(long)]
    pub zoom: f64,

    /// Camera column in tile units at the drawn level
    #[arg(long, allow_negative_numbers = true)]
    pub camera_x: f64,

    /// Camera row in tile units at the drawn level
    #[arg(long, allow_negative_numbers = true)]
    pub camera_y: f64,

    /// Device pixel ratio (overrides config)
    #[arg(long)]
    pub pixel_ratio: Option<f64>,
}

impl CameraArgs {
    fn camera(&self) -> CameraState {
        CameraState::new(
            self.width,
            self.height,
            self.zoom,
            self.camera_x,
            self.camera_y,
        )
    }

    fn apply(&self, config: &ViewerConfig) -> ViewerConfig {
        match self.pixel_ratio {
            Some(ratio) => config.clone().with_pixel_ratio(ratio),
            None => config.clone(),
        }
    }
}

/// Arguments for the siblings command.
#[derive(Debug, Args)]
pub struct SiblingsArgs {
    /// Tile key as x,y,z
    pub key: TileKey,

    #[command(flatten)]
    pub camera: CameraArgs,
}

/// Arguments for the select command.
#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Target tile key as x,y,z
    pub key: TileKey,

    /// Key of a tile whose data is loaded (repeatable)
    #[arg(long = "resident")]
    pub resident: Vec<TileKey>,

    /// Deepest pyramid level (overrides config)
    #[arg(long)]
    pub max_zoom: Option<u8>,
}

/// Arguments for the frame command.
#[derive(Debug, Args)]
pub struct FrameArgs {
    #[command(flatten)]
    pub camera: CameraArgs,

    /// Key of a tile whose data is loaded (repeatable)
    #[arg(long = "resident")]
    pub resident: Vec<TileKey>,

    /// Deepest pyramid level (overrides config)
    #[arg(long)]
    pub max_zoom: Option<u8>,
}

/// Run the siblings command.
pub fn run_siblings(args: SiblingsArgs, config: &ViewerConfig) -> Result<(), CliError> {
    check_zoom_gap(&args.key, args.camera.zoom)?;
    let config = args.camera.apply(config);
    let placements = get_siblings(args.key.tile(), &args.camera.camera(), &config.view_scale());
    print_json(&placements)
}

/// Run the select command.
pub fn run_select(args: SelectArgs, config: &ViewerConfig) -> Result<(), CliError> {
    let max_zoom = resolve_max_zoom(args.max_zoom, config)?;
    let residency: HashSet<TileKey> = args.resident.into_iter().collect();

    let substitute = select_substitute(&args.key, &residency, max_zoom);
    print_json(&substitute)
}

/// Run the frame command.
pub fn run_frame(args: FrameArgs, config: &ViewerConfig) -> Result<(), CliError> {
    let max_zoom = resolve_max_zoom(args.max_zoom, config)?;
    let config = args.camera.apply(config).with_max_zoom(max_zoom);
    let residency: HashSet<TileKey> = args.resident.into_iter().collect();

    let planner = FramePlanner::from_config(&config);
    let camera = args.camera.camera();
    let needed = planner.needed_tiles(&camera);

    print_json(&planner.plan(&needed, &camera, &residency))
}

/// Deep keys under a shallow camera would enumerate millions of placements.
fn check_zoom_gap(key: &TileKey, zoom: f64) -> Result<(), CliError> {
    let z = key.tile().z;
    if within_zoom_gap(z, zoom) {
        Ok(())
    } else {
        Err(CliError::Arguments(format!(
            "zoom {} is more than {} levels above tile {}; use a zoom of at least {}",
            zoom,
            MAX_ZOOM_GAP,
            key,
            i32::from(z) - i32::from(MAX_ZOOM_GAP)
        )))
    }
}

/// CLI value wins over config; both must stay within the key range.
fn resolve_max_zoom(cli: Option<u8>, config: &ViewerConfig) -> Result<u8, CliError> {
    let max_zoom = cli.unwrap_or(config.max_zoom);
    if max_zoom > MAX_LEVEL {
        return Err(CliError::Arguments(format!(
            "max zoom {} exceeds the deepest supported level {}",
            max_zoom, MAX_LEVEL
        )));
    }
    Ok(max_zoom)
}
