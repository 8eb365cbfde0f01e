//! GeoTIFF/VRT tiles on disk.

use std::path::PathBuf;

use cusum_calendar::read_date_list;
use cusum_raster::{GdalStack, MosaicMerger, MosaicSummary, StackSource, TileOutput};
use tracing::info;

use crate::error::TileError;
use crate::processor::{TileProcessor, TileStage, TileSummary};
use crate::progress::ProgressSink;
use crate::scheduler::{TileReport, TileScheduler};
use crate::work::TileWorkItem;

/// Processes one work item: opens its stack and date list, creates its
/// 3-band output with the stack's size and georeference, and runs the
/// [`TileProcessor`].
///
/// # Errors
///
/// Returns [`TileError::Tile`] identifying the input and the stage that
/// failed.
pub fn run_work_item(item: &TileWorkItem) -> Result<TileSummary, TileError> {
    let opening = |e: TileError| TileError::tile(item.input(), TileStage::Opening, e);

    let dates = read_date_list(item.dates()).map_err(|e| opening(e.into()))?;
    let source = GdalStack::open(item.input()).map_err(|e| opening(e.into()))?;
    let (width, height) = source.size();
    let georeference = source.georeference().map_err(|e| opening(e.into()))?;
    let mut output = TileOutput::create_with_block_size(
        item.output(),
        width,
        height,
        &georeference,
        item.block_size(),
    )
    .map_err(|e| opening(e.into()))?;

    TileProcessor::new(item.input(), item.params().clone(), dates).run(&source, &mut output)
}

/// Processes every item on `scheduler`, then merges the outputs into
/// `merger`'s output raster.
///
/// `progress` hears about the start of the tile phase and the start of the
/// merge. The merge only starts after every tile has finished; if any tile
/// fails nothing is merged.
///
/// # Errors
///
/// Returns the first tile failure, or [`TileError::Raster`] if the merge
/// fails (tile outputs are left in place in that case).
pub fn process_and_merge(
    items: &[TileWorkItem],
    scheduler: &TileScheduler,
    merger: &MosaicMerger,
    progress: &dyn ProgressSink,
) -> Result<(Vec<TileReport>, MosaicSummary), TileError> {
    let reports = scheduler.run(items, progress, run_work_item)?;

    progress.notify(&format!("merging {} tile output(s)", reports.len()));
    let outputs: Vec<PathBuf> = reports.iter().map(|r| r.output.clone()).collect();
    let mosaic = merger.merge(&outputs)?;
    info!(
        output = %mosaic.output.display(),
        width = mosaic.size.0,
        height = mosaic.size.1,
        "mosaic written"
    );
    Ok((reports, mosaic))
}
