use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CUSUM change detection on satellite image time series.
#[derive(Parser)]
#[command(
    name = "cusum",
    version,
    about = "CUSUM change detection with bootstrap confidence for image time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Process every selected tile and merge the results into one raster.
    Run(RunArgs),
    /// Process a single tile stack without merging.
    Tile(TileArgs),
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "cusum.toml")]
    pub config: PathBuf,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the number of bootstrap permutations.
    #[arg(short, long)]
    pub bootstraps: Option<usize>,

    /// Override the number of worker threads.
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the `tile` subcommand.
#[derive(clap::Args)]
pub struct TileArgs {
    /// Input stack (GeoTIFF or VRT) whose band descriptions are dates.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Date list of the tile, one `YYYY-MM-DD` per line.
    #[arg(short, long)]
    pub dates: PathBuf,

    /// Output 3-band GeoTIFF.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Historical period start (exclusive), `YYYY-MM-DD`.
    #[arg(long)]
    pub start: String,

    /// Historical period end (exclusive), `YYYY-MM-DD`.
    #[arg(long)]
    pub end: String,

    /// Number of bootstrap permutations.
    #[arg(short, long, default_value_t = 1000)]
    pub bootstraps: usize,

    /// Minimum combined confidence of a retained change.
    #[arg(long, default_value_t = 0.15)]
    pub confidence_threshold: f32,

    /// Suppress changes below the block's 95th-percentile magnitude.
    #[arg(long)]
    pub area_threshold: bool,

    /// Base RNG seed; output is reproducible for a given seed.
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,
}
