//! TileMosaic CLI - Command-line interface
//!
//! Exposes the tile selection library for inspection and scripting. Every
//! command prints JSON to stdout; logs go to stderr.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{data, tile, view};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilemosaic", version, about = "Tile selection for wrapped raster pyramids")]
struct Cli {
    /// Path to a viewer config INI file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Project a longitude/latitude onto the tile grid
    Tile(tile::TileArgs),

    /// Longitude/latitude of a tile's northwest corner
    Point(tile::PointArgs),

    /// Map a placement into a rendered tile's grid
    Offset(tile::OffsetArgs),

    /// Enumerate wrapped placements of a tile for a viewport
    Siblings(view::SiblingsArgs),

    /// Choose the substitute keys to draw for a tile
    Select(view::SelectArgs),

    /// Plan the draw calls for one frame
    Frame(view::FrameArgs),

    /// Expand a region JSON file into tile keys
    Region(data::RegionArgs),

    /// Read pyramid levels from a store metadata JSON file
    Pyramid(data::PyramidArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = tilemosaic::logging::init_logging(directive) {
        eprintln!("Warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = commands::common::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tile(args) => tile::run_tile(args, &config),
        Commands::Point(args) => tile::run_point(args),
        Commands::Offset(args) => tile::run_offset(args),
        Commands::Siblings(args) => view::run_siblings(args, &config),
        Commands::Select(args) => view::run_select(args, &config),
        Commands::Frame(args) => view::run_frame(args, &config),
        Commands::Region(args) => data::run_region(args),
        Commands::Pyramid(args) => data::run_pyramid(args, &config),
    }
}
