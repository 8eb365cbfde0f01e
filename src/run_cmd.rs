//! Run command: process every tile of a time-series folder and merge.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{info, info_span};

use cusum_raster::MosaicMerger;
use cusum_tile::{TileWorkItem, process_and_merge};

use crate::cli::RunArgs;
use crate::config::CusumConfig;
use crate::convert;
use crate::layout;
use crate::progress::LogProgress;

/// Run the full pipeline.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("run").entered();
    let started = Local::now();
    let clock = Instant::now();

    // 1. Load config and apply CLI overrides
    let mut config = CusumConfig::load(&args.config)?;
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(seed) = args.seed {
        config.detect.seed = seed;
    }
    if let Some(n) = args.bootstraps {
        config.detect.bootstraps = n;
    }
    if let Some(n) = args.workers {
        config.run.workers = Some(n);
    }

    // 2. Build library configs
    let params = convert::build_tile_params(&config.detect, &config.period)?;
    let scheduler = convert::build_scheduler(&config.run);
    let block_size = convert::validate_block_size(config.run.block_size)?;

    // 3. Discover tiles
    let subtiles = layout::discover(&config.input.folder, config.input.tiles.as_deref())
        .with_context(|| {
            format!(
                "failed to discover tiles in {}",
                config.input.folder.display()
            )
        })?;
    info!(
        folder = %config.input.folder.display(),
        subtiles = subtiles.len(),
        "tiles discovered"
    );

    // 4. Prepare outputs
    let out_dir = &config.output.dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;
    let result_file = out_dir.join(&config.output.file_name);
    let items: Vec<TileWorkItem> = subtiles
        .iter()
        .map(|s| {
            TileWorkItem::new(&s.stack, &s.dates, s.output_path(out_dir), params.clone())
                .with_block_size(block_size)
        })
        .collect();
    if items.iter().any(|item| item.output() == result_file) {
        bail!(
            "output file {} collides with a tile output",
            result_file.display()
        );
    }

    // 5. Process tiles, then merge
    let merger = MosaicMerger::new(&result_file).with_block_size(block_size);
    let (reports, mosaic) = process_and_merge(&items, &scheduler, &merger, &LogProgress)
        .context("change detection failed")?;

    let changed: usize = reports.iter().map(|r| r.summary.changed_pixels).sum();
    let finished = Local::now();
    info!(
        output = %mosaic.output.display(),
        tiles = reports.len(),
        changed,
        started = %started.format("%Y-%m-%d %H:%M:%S"),
        finished = %finished.format("%Y-%m-%d %H:%M:%S"),
        elapsed_s = clock.elapsed().as_secs_f64(),
        "computation finished"
    );
    Ok(())
}
