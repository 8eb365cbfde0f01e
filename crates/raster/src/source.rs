//! Seams between tile processing and raster storage.

use ndarray::{Array3, ArrayView3};

use crate::error::RasterError;
use crate::georef::GeoReference;
use crate::window::{BlockWindow, block_windows};

/// A multi-band raster whose bands are time steps of one tile.
pub trait StackSource {
    /// Raster size `(width, height)` in pixels.
    fn size(&self) -> (usize, usize);

    /// Number of bands.
    fn band_count(&self) -> usize;

    /// Per-band label text (the acquisition date descriptor), in band order.
    fn band_labels(&self) -> Result<Vec<String>, RasterError>;

    /// Spatial reference to copy onto outputs.
    fn georeference(&self) -> Result<GeoReference, RasterError>;

    /// Reads `window` from the zero-based `bands`, in the given order, into a
    /// `(bands.len(), window.height, window.width)` array.
    fn read_window(
        &self,
        window: &BlockWindow,
        bands: &[usize],
    ) -> Result<Array3<f32>, RasterError>;
}

/// A multi-band raster written one block window at a time.
pub trait BlockSink {
    /// Raster size `(width, height)` in pixels.
    fn size(&self) -> (usize, usize);

    /// Number of bands.
    fn band_count(&self) -> usize;

    /// Natural write unit `(width, height)` of the underlying storage.
    fn block_size(&self) -> (usize, usize);

    /// Windows covering the raster in units of [`BlockSink::block_size`].
    fn block_windows(&self) -> Vec<BlockWindow> {
        let (width, height) = self.size();
        let (bw, bh) = self.block_size();
        block_windows(width, height, bw, bh)
    }

    /// Writes a `(bands, window.height, window.width)` block at `window`.
    fn write_window(
        &mut self,
        window: &BlockWindow,
        block: ArrayView3<'_, f32>,
    ) -> Result<(), RasterError>;

    /// Flushes and closes the underlying storage. Later writes fail.
    fn finish(&mut self) -> Result<(), RasterError> {
        Ok(())
    }
}

pub(crate) fn check_window(
    window: &BlockWindow,
    width: usize,
    height: usize,
) -> Result<(), RasterError> {
    if window.fits(width, height) {
        Ok(())
    } else {
        Err(RasterError::WindowOutOfBounds {
            window: *window,
            width,
            height,
        })
    }
}

pub(crate) fn check_block(
    window: &BlockWindow,
    bands: usize,
    block: &ArrayView3<'_, f32>,
) -> Result<(), RasterError> {
    let expected = (bands, window.height, window.width);
    if block.dim() == expected {
        Ok(())
    } else {
        Err(RasterError::BlockShape {
            expected,
            got: block.dim(),
        })
    }
}

pub(crate) fn check_bands(bands: &[usize], count: usize) -> Result<(), RasterError> {
    match bands.iter().find(|&&b| b >= count) {
        Some(&index) => Err(RasterError::BandOutOfRange { index, count }),
        None => Ok(()),
    }
}
