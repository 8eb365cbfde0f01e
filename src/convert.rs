//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use cusum_calendar::{HistoricalPeriod, parse_date};
use cusum_tile::{TileParams, TileScheduler};

use crate::config::{DetectToml, PeriodToml, RunToml};

/// Parses the historical period.
pub fn build_period(period: &PeriodToml) -> Result<HistoricalPeriod> {
    let start = parse_date(&period.start).context("invalid period start")?;
    let end = parse_date(&period.end).context("invalid period end")?;
    Ok(HistoricalPeriod::new(start, end)?)
}

/// Builds validated [`TileParams`] from the detection and period sections.
pub fn build_tile_params(detect: &DetectToml, period: &PeriodToml) -> Result<TileParams> {
    let params = TileParams::new()
        .with_n_bootstraps(detect.bootstraps)
        .with_confidence_threshold(detect.confidence_threshold)
        .with_area_threshold(detect.area_threshold)
        .with_seed(detect.seed)
        .with_period(build_period(period)?);
    params.validate()?;
    Ok(params)
}

/// Builds the tile scheduler; without `workers` it uses every CPU.
pub fn build_scheduler(run: &RunToml) -> TileScheduler {
    match run.workers {
        Some(n) => TileScheduler::new().with_workers(n),
        None => TileScheduler::new(),
    }
}

/// Checks the output block size: GeoTIFF tiles must be multiples of 16.
pub fn validate_block_size(block_size: usize) -> Result<usize> {
    if block_size == 0 || block_size % 16 != 0 {
        bail!("block_size must be a positive multiple of 16, got {block_size}");
    }
    Ok(block_size)
}
