//! Tile command: process one stack into one 3-band raster.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cusum_tile::{TileParams, TileWorkItem, run_work_item};

use crate::cli::TileArgs;
use crate::config::PeriodToml;
use crate::convert;

/// Run change detection on a single tile.
pub fn run(args: TileArgs) -> Result<()> {
    let _cmd = info_span!("tile").entered();

    let period = convert::build_period(&PeriodToml {
        start: args.start,
        end: args.end,
    })?;
    let params = TileParams::new()
        .with_n_bootstraps(args.bootstraps)
        .with_confidence_threshold(args.confidence_threshold)
        .with_area_threshold(args.area_threshold)
        .with_seed(args.seed)
        .with_period(period);
    params.validate()?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir: {}", parent.display()))?;
    }

    let item = TileWorkItem::new(&args.input, &args.dates, &args.output, params);
    let summary = run_work_item(&item)
        .with_context(|| format!("failed to process {}", args.input.display()))?;
    info!(
        output = %args.output.display(),
        blocks = summary.blocks,
        n_dates = summary.n_dates,
        changed = summary.changed_pixels,
        "tile written"
    );
    Ok(())
}
