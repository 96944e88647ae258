//! Tile projection and offset commands.

use clap::Args;
use serde::Serialize;
use tilemosaic::config::ViewerConfig;
use tilemosaic::coord::{
    level_for_zoom, point_to_tile, point_to_tile_space, tile_to_point, Offset, TileKey,
    MAX_LEVEL,
};
use tilemosaic::offset::get_adjusted_offset;

use super::common::print_json;
use crate::error::CliError;

/// Arguments for the tile command.
#[derive(Debug, Args)]
pub struct TileArgs {
    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Continuous zoom; floored to a pyramid level
    #[arg(long)]
    pub zoom: f64,

    /// Clamp the level to the configured pyramid depth
    #[arg(long)]
    pub clamp: bool,
}

/// Arguments for the point command.
#[derive(Debug, Args)]
pub struct PointArgs {
    /// Tile key as x,y,z
    pub key: TileKey,
}

/// Arguments for the offset command.
#[derive(Debug, Args)]
pub struct OffsetArgs {
    /// Placement column (may be outside the grid)
    #[arg(long, allow_negative_numbers = true)]
    pub x: i64,

    /// Placement row (may be outside the grid)
    #[arg(long, allow_negative_numbers = true)]
    pub y: i64,

    /// Placement level
    #[arg(long, value_parser = clap::value_parser!(u8).range(..=i64::from(MAX_LEVEL)))]
    pub z: u8,

    /// Key of the tile drawn for the placement
    #[arg(long)]
    pub rendered: TileKey,
}

#[derive(Serialize)]
struct TileOutput {
    key: TileKey,
    tile_space: [f64; 2],
    level: u8,
}

#[derive(Serialize)]
struct PointOutput {
    lon: f64,
    lat: f64,
}

#[derive(Serialize)]
struct OffsetOutput {
    x: i64,
    y: i64,
}

/// Run the tile command.
pub fn run_tile(args: TileArgs, config: &ViewerConfig) -> Result<(), CliError> {
    let max_zoom = args.clamp.then_some(config.max_zoom);
    let level = level_for_zoom(args.zoom, max_zoom);

    let tile = point_to_tile(args.lon, args.lat, level);
    let space = point_to_tile_space(args.lon, args.lat, level);

    print_json(&TileOutput {
        key: tile.key(),
        tile_space: [space.x, space.y],
        level,
    })
}

/// Run the point command.
pub fn run_point(args: PointArgs) -> Result<(), CliError> {
    let tile = args.key.tile();
    let (lon, lat) = tile_to_point(f64::from(tile.x), f64::from(tile.y), tile.z);
    print_json(&PointOutput { lon, lat })
}

/// Run the offset command.
pub fn run_offset(args: OffsetArgs) -> Result<(), CliError> {
    let (x, y) = get_adjusted_offset(Offset::new(args.x, args.y, args.z), &args.rendered);
    print_json(&OffsetOutput { x, y })
}
