//! Units of work handed to the scheduler.

use std::path::{Path, PathBuf};

use cusum_raster::OUTPUT_BLOCK_SIZE;

use crate::config::TileParams;

/// One tile to process: where to read, where its dates are listed, where
/// to write and with which parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TileWorkItem {
    input: PathBuf,
    dates: PathBuf,
    output: PathBuf,
    params: TileParams,
    block_size: usize,
}

impl TileWorkItem {
    /// Creates a work item.
    pub fn new(
        input: impl Into<PathBuf>,
        dates: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        params: TileParams,
    ) -> Self {
        Self {
            input: input.into(),
            dates: dates.into(),
            output: output.into(),
            params,
            block_size: OUTPUT_BLOCK_SIZE,
        }
    }

    /// Sets the internal block size of the output raster, which is also the
    /// processing window.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Input raster stack.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Date list of the tile.
    pub fn dates(&self) -> &Path {
        &self.dates
    }

    /// Output raster path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Detection parameters.
    pub fn params(&self) -> &TileParams {
        &self.params
    }

    /// Output block size in pixels.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}
