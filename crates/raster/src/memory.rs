//! In-memory raster implementing both I/O seams.

use ndarray::{Array3, ArrayView3, Axis, s};

use crate::error::RasterError;
use crate::georef::GeoReference;
use crate::source::{BlockSink, StackSource, check_bands, check_block, check_window};
use crate::window::BlockWindow;

/// A `(band, row, col)` raster held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRaster {
    values: Array3<f32>,
    labels: Vec<String>,
    block_size: (usize, usize),
    georeference: GeoReference,
}

impl MemoryRaster {
    /// Wraps `values` with one label per band. Missing labels are empty.
    pub fn new(values: Array3<f32>, labels: Vec<String>) -> Self {
        let (bands, rows, cols) = values.dim();
        let mut labels = labels;
        labels.resize(bands, String::new());
        Self {
            values,
            labels,
            block_size: (cols.max(1), rows.max(1)),
            georeference: GeoReference::default(),
        }
    }

    /// An all-zero raster of `bands` bands, `width` x `height` pixels.
    pub fn zeros(bands: usize, width: usize, height: usize) -> Self {
        Self::new(Array3::zeros((bands, height, width)), Vec::new())
    }

    /// Sets the block size proposed by [`BlockSink::block_windows`].
    pub fn with_block_size(mut self, width: usize, height: usize) -> Self {
        self.block_size = (width.max(1), height.max(1));
        self
    }

    /// Sets the georeference.
    pub fn with_georeference(mut self, georeference: GeoReference) -> Self {
        self.georeference = georeference;
        self
    }

    /// Returns the `(band, row, col)` values.
    pub fn values(&self) -> ArrayView3<'_, f32> {
        self.values.view()
    }

    /// Consumes the raster, returning its values.
    pub fn into_values(self) -> Array3<f32> {
        self.values
    }
}

impl StackSource for MemoryRaster {
    fn size(&self) -> (usize, usize) {
        let (_, rows, cols) = self.values.dim();
        (cols, rows)
    }

    fn band_count(&self) -> usize {
        self.values.len_of(Axis(0))
    }

    fn band_labels(&self) -> Result<Vec<String>, RasterError> {
        Ok(self.labels.clone())
    }

    fn georeference(&self) -> Result<GeoReference, RasterError> {
        Ok(self.georeference.clone())
    }

    fn read_window(
        &self,
        window: &BlockWindow,
        bands: &[usize],
    ) -> Result<Array3<f32>, RasterError> {
        let (width, height) = StackSource::size(self);
        check_window(window, width, height)?;
        check_bands(bands, StackSource::band_count(self))?;
        let region = self.values.slice(s![
            ..,
            window.row_off..window.row_off + window.height,
            window.col_off..window.col_off + window.width
        ]);
        Ok(region.select(Axis(0), bands))
    }
}

impl BlockSink for MemoryRaster {
    fn size(&self) -> (usize, usize) {
        StackSource::size(self)
    }

    fn band_count(&self) -> usize {
        StackSource::band_count(self)
    }

    fn block_size(&self) -> (usize, usize) {
        self.block_size
    }

    fn write_window(
        &mut self,
        window: &BlockWindow,
        block: ArrayView3<'_, f32>,
    ) -> Result<(), RasterError> {
        let (width, height) = BlockSink::size(self);
        check_window(window, width, height)?;
        check_block(window, BlockSink::band_count(self), &block)?;
        self.values
            .slice_mut(s![
                ..,
                window.row_off..window.row_off + window.height,
                window.col_off..window.col_off + window.width
            ])
            .assign(&block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(bands: usize, width: usize, height: usize) -> MemoryRaster {
        let values = Array3::from_shape_fn((bands, height, width), |(b, r, c)| {
            (b * 100 + r * 10 + c) as f32
        });
        MemoryRaster::new(values, vec!["2020-01-01".to_string()])
    }

    #[test]
    fn labels_are_padded_to_band_count() {
        let raster = numbered(3, 2, 2);
        assert_eq!(
            raster.band_labels().unwrap(),
            vec!["2020-01-01".to_string(), String::new(), String::new()]
        );
    }

    #[test]
    fn read_window_reorders_bands() {
        let raster = numbered(3, 4, 4);
        let window = BlockWindow::new(1, 2, 2, 1);
        let block = raster.read_window(&window, &[2, 0]).unwrap();
        assert_eq!(block.dim(), (2, 1, 2));
        assert_eq!(block[[0, 0, 0]], 221.0);
        assert_eq!(block[[1, 0, 1]], 22.0);
    }

    #[test]
    fn read_window_rejects_bad_band() {
        let raster = numbered(2, 2, 2);
        let err = raster
            .read_window(&BlockWindow::new(0, 0, 1, 1), &[0, 2])
            .unwrap_err();
        assert!(matches!(err, RasterError::BandOutOfRange { index: 2, count: 2 }));
    }

    #[test]
    fn read_window_rejects_out_of_bounds() {
        let raster = numbered(1, 2, 2);
        let err = raster
            .read_window(&BlockWindow::new(1, 0, 2, 1), &[0])
            .unwrap_err();
        assert!(matches!(err, RasterError::WindowOutOfBounds { .. }));
    }

    #[test]
    fn write_window_checks_shape() {
        let mut raster = MemoryRaster::zeros(3, 4, 4);
        let block = Array3::<f32>::ones((1, 2, 2));
        let err = raster
            .write_window(&BlockWindow::new(0, 0, 2, 2), block.view())
            .unwrap_err();
        assert!(matches!(err, RasterError::BlockShape { .. }));
    }

    #[test]
    fn block_windows_follow_block_size() {
        let raster = MemoryRaster::zeros(3, 5, 3).with_block_size(2, 2);
        assert_eq!(raster.block_windows().len(), 6);
    }
}
