//! Block-by-block processing of one tile.

use std::fmt;
use std::path::{Path, PathBuf};

use cusum_calendar::{NaiveDate, parse_date};
use cusum_raster::{BlockSink, StackSource};
use cusum_stack::{DateSubset, TimeSeriesStack, date_order};
use tracing::{debug, info};

use crate::block::process_block;
use crate::block_rng;
use crate::config::TileParams;
use crate::error::TileError;

/// Stage of a tile's processing, reported with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileStage {
    /// Reading band dates and preparing the output.
    Opening,
    /// Reading, processing and writing block windows.
    IteratingBlocks,
    /// Flushing and closing the output.
    Closing,
}

impl fmt::Display for TileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileStage::Opening => "opening",
            TileStage::IteratingBlocks => "iterating blocks",
            TileStage::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Outcome of a processed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileSummary {
    /// Block windows written.
    pub blocks: usize,
    /// Acquisitions inside the historical period.
    pub n_dates: usize,
    /// Pixels with a retained change.
    pub changed_pixels: usize,
}

/// Band order and date subset derived from a tile's band descriptors.
#[derive(Debug, Clone)]
struct TileLayout {
    band_order: Vec<usize>,
    dates: Vec<NaiveDate>,
    subset: DateSubset,
}

/// Processes one tile: Opening, then IteratingBlocks, then Closing.
///
/// Any error ends the tile and is reported as [`TileError::Tile`] with the
/// stage at which it happened.
#[derive(Debug, Clone)]
pub struct TileProcessor {
    input: PathBuf,
    params: TileParams,
    date_list: Vec<NaiveDate>,
}

impl TileProcessor {
    /// Creates a processor for the tile read from `input`, whose
    /// acquisitions are listed in `date_list`.
    pub fn new(input: impl Into<PathBuf>, params: TileParams, date_list: Vec<NaiveDate>) -> Self {
        let mut date_list = date_list;
        date_list.sort();
        Self {
            input: input.into(),
            params,
            date_list,
        }
    }

    /// Input the processor reports in logs and errors.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Runs every block window proposed by `sink`, then finishes `sink`.
    ///
    /// Blocks are processed strictly one after another. Block `i` draws
    /// from `seed + i`, so two runs with the same parameters write
    /// identical blocks.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::Tile`] wrapping the first failure: malformed or
    /// mismatching band dates and size mismatches while opening, raster
    /// errors while iterating, and close errors while closing.
    #[tracing::instrument(skip_all, fields(input = %self.input.display()))]
    pub fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<TileSummary, TileError>
    where
        S: StackSource + ?Sized,
        K: BlockSink + ?Sized,
    {
        let layout = self
            .open(source, sink)
            .map_err(|e| TileError::tile(&self.input, TileStage::Opening, e))?;

        let mut summary = self
            .iterate(source, sink, &layout)
            .map_err(|e| TileError::tile(&self.input, TileStage::IteratingBlocks, e))?;
        summary.n_dates = layout.subset.len();

        sink.finish()
            .map_err(|e| TileError::tile(&self.input, TileStage::Closing, e))?;

        info!(
            blocks = summary.blocks,
            n_dates = summary.n_dates,
            changed = summary.changed_pixels,
            "tile done"
        );
        Ok(summary)
    }

    fn open<S, K>(&self, source: &S, sink: &K) -> Result<TileLayout, TileError>
    where
        S: StackSource + ?Sized,
        K: BlockSink + ?Sized,
    {
        let band_dates = source
            .band_labels()?
            .iter()
            .map(|label| parse_date(label))
            .collect::<Result<Vec<_>, _>>()?;
        check_band_dates(&band_dates, &self.date_list)?;

        let band_order = date_order(&band_dates);
        let dates: Vec<NaiveDate> = band_order.iter().map(|&i| band_dates[i]).collect();
        let subset = match self.params.period() {
            Some(period) => DateSubset::from_dates(&dates, period),
            None => DateSubset::all(dates.len()),
        };

        if source.size() != sink.size() {
            return Err(TileError::SizeMismatch {
                input_size: source.size(),
                output_size: sink.size(),
            });
        }

        debug!(
            bands = dates.len(),
            in_period = subset.len(),
            "band dates validated"
        );
        Ok(TileLayout {
            band_order,
            dates,
            subset,
        })
    }

    fn iterate<S, K>(
        &self,
        source: &S,
        sink: &mut K,
        layout: &TileLayout,
    ) -> Result<TileSummary, TileError>
    where
        S: StackSource + ?Sized,
        K: BlockSink + ?Sized,
    {
        let mut summary = TileSummary::default();
        for (index, window) in sink.block_windows().into_iter().enumerate() {
            let values = source.read_window(&window, &layout.band_order)?;
            let stack = TimeSeriesStack::new(values, layout.dates.clone())?;
            let mut rng = block_rng(self.params.seed(), index);
            let block = process_block(&stack, &layout.subset, &self.params, &mut rng)?;
            sink.write_window(&window, block.to_bands().view())?;

            summary.blocks += 1;
            summary.changed_pixels += block.n_changes();
            debug!(
                block = index,
                col = window.col_off,
                row = window.row_off,
                changes = block.n_changes(),
                "block written"
            );
        }
        Ok(summary)
    }
}

/// Checks that the band descriptors name exactly the dates of the list.
fn check_band_dates(band_dates: &[NaiveDate], date_list: &[NaiveDate]) -> Result<(), TileError> {
    if band_dates.len() != date_list.len() {
        return Err(TileError::BandDates {
            reason: format!(
                "{} band(s) but {} date(s) in the list",
                band_dates.len(),
                date_list.len()
            ),
        });
    }
    let mut sorted = band_dates.to_vec();
    sorted.sort();
    if let Some((band, listed)) = sorted.iter().zip(date_list).find(|(b, l)| b != l) {
        return Err(TileError::BandDates {
            reason: format!("band date {band} does not match listed date {listed}"),
        });
    }
    Ok(())
}
