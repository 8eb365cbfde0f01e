//! Error types for the cusum-tile crate.

use std::path::PathBuf;

use cusum_calendar::CalendarError;
use cusum_detect::DetectError;
use cusum_raster::RasterError;
use cusum_stack::StackError;

use crate::processor::TileStage;

/// Error type for all fallible operations in the cusum-tile crate.
#[derive(Debug, thiserror::Error)]
pub enum TileError {
    /// Date parsing or date-list error.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Stack construction error.
    #[error(transparent)]
    Stack(#[from] StackError),

    /// Change statistic error.
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// Raster read, write or merge error.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Returned when run parameters are invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the invalid parameter.
        reason: String,
    },

    /// Returned when band date descriptors disagree with the tile's date list.
    #[error("band dates do not match the date list: {reason}")]
    BandDates {
        /// Description of the disagreement.
        reason: String,
    },

    /// Returned when the output raster does not cover the input raster.
    #[error(
        "output size {}x{} differs from input size {}x{}",
        output_size.0, output_size.1, input_size.0, input_size.1
    )]
    SizeMismatch {
        /// Input `(width, height)`.
        input_size: (usize, usize),
        /// Output `(width, height)`.
        output_size: (usize, usize),
    },

    /// Returned when the worker pool cannot be created.
    #[error("worker pool error: {reason}")]
    WorkerPool {
        /// Description of the failure.
        reason: String,
    },

    /// A tile failed; identifies the tile and the stage it reached.
    #[error("tile {}: {stage} failed", input.display())]
    Tile {
        /// Input raster of the failed tile.
        input: PathBuf,
        /// Processing stage at which the tile failed.
        stage: TileStage,
        /// Underlying failure.
        source: Box<TileError>,
    },
}

impl TileError {
    /// Wraps `source` as a failure of tile `input` during `stage`.
    pub fn tile(input: impl Into<PathBuf>, stage: TileStage, source: impl Into<TileError>) -> Self {
        TileError::Tile {
            input: input.into(),
            stage,
            source: Box::new(source.into()),
        }
    }

    /// Stage at which a tile failed, if this is a tile failure.
    pub fn stage(&self) -> Option<TileStage> {
        match self {
            TileError::Tile { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
