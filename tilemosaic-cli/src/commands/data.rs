//! Commands reading data descriptors: regions and pyramid metadata.

use std::path::{Path, PathBuf};

use clap::Args;
use tilemosaic::config::ViewerConfig;
use tilemosaic::coord::MAX_LEVEL;
use tilemosaic::pyramid::PyramidMetadata;
use tilemosaic::region::{get_tiles_of_region, Region, RhumbLine};

use super::common::{print_json, read_file, read_json_file};
use crate::error::CliError;

/// Arguments for the region command.
#[derive(Debug, Args)]
pub struct RegionArgs {
    /// Region JSON file: flat (center, radius, units, ring) or a GeoJSON Feature
    pub file: PathBuf,

    /// Pyramid level to expand at
    #[arg(long)]
    pub level: u8,
}

/// Arguments for the pyramid command.
#[derive(Debug, Args)]
pub struct PyramidArgs {
    /// Consolidated store metadata JSON file; the config's [pyramid]
    /// section is used when omitted
    pub file: Option<PathBuf>,
}

/// Run the region command.
pub fn run_region(args: RegionArgs) -> Result<(), CliError> {
    if args.level > MAX_LEVEL {
        return Err(CliError::Arguments(format!(
            "level {} exceeds the deepest supported level {}",
            args.level, MAX_LEVEL
        )));
    }

    let region: Region = read_json_file(&args.file)?;
    let keys = get_tiles_of_region(&region, args.level, &RhumbLine);
    print_json(&keys)
}

/// Run the pyramid command.
pub fn run_pyramid(args: PyramidArgs, config: &ViewerConfig) -> Result<(), CliError> {
    print_json(&load_pyramid(args.file.as_deref(), config)?)
}

fn load_pyramid(
    file: Option<&Path>,
    config: &ViewerConfig,
) -> Result<PyramidMetadata, CliError> {
    match file {
        Some(path) => Ok(PyramidMetadata::from_json(&read_file(path)?)?),
        None => Ok(config.pyramid()?),
    }
}
