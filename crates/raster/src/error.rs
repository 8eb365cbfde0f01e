//! Error types for the cusum-raster crate.

use std::path::PathBuf;

use crate::window::BlockWindow;

/// Error type for all fallible operations in the cusum-raster crate.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// Wraps an error originating from the GDAL library.
    #[error("gdal error: {reason}")]
    Gdal {
        /// Description of the underlying GDAL failure.
        reason: String,
    },

    /// Returned when a file operation outside GDAL fails.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a band index is not present in the raster.
    #[error("band {index} out of range for raster with {count} band(s)")]
    BandOutOfRange {
        /// Zero-based band index requested.
        index: usize,
        /// Number of bands in the raster.
        count: usize,
    },

    /// Returned when a window does not fit inside the raster.
    #[error(
        "window {}x{} at ({}, {}) exceeds raster of {width}x{height}",
        window.width, window.height, window.col_off, window.row_off
    )]
    WindowOutOfBounds {
        /// Offending window.
        window: BlockWindow,
        /// Raster width in pixels.
        width: usize,
        /// Raster height in pixels.
        height: usize,
    },

    /// Returned when a block does not have the shape its window requires.
    #[error("block shape mismatch: expected {expected:?}, got {got:?}")]
    BlockShape {
        /// Expected `(bands, rows, cols)`.
        expected: (usize, usize, usize),
        /// Actual `(bands, rows, cols)`.
        got: (usize, usize, usize),
    },

    /// Returned when a mosaic is requested without any input.
    #[error("no tile outputs to merge")]
    EmptyMosaic,

    /// Returned when writing to a sink that has already been finished.
    #[error("raster {} is already closed", path.display())]
    Closed {
        /// Path of the closed raster.
        path: PathBuf,
    },
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for RasterError {
    fn from(e: gdal::errors::GdalError) -> Self {
        RasterError::Gdal {
            reason: e.to_string(),
        }
    }
}
