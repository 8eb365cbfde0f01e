//! GDAL-backed multi-band date stack.

use std::path::{Path, PathBuf};

use gdal::{Dataset, Metadata};
use ndarray::{Array3, Axis};
use tracing::debug;

use crate::error::RasterError;
use crate::georef::GeoReference;
use crate::source::{StackSource, check_bands, check_window};
use crate::window::BlockWindow;

/// A tile's time-series stack opened through GDAL (GeoTIFF or VRT).
///
/// Each band's description holds its acquisition date.
pub struct GdalStack {
    dataset: Dataset,
    path: PathBuf,
}

impl std::fmt::Debug for GdalStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GdalStack").field("path", &self.path).finish()
    }
}

impl GdalStack {
    /// Opens the raster at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Gdal`] if GDAL cannot open the file.
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        let dataset = Dataset::open(path).map_err(|e| RasterError::Gdal {
            reason: format!("cannot open {}: {e}", path.display()),
        })?;
        debug!(path = %path.display(), bands = dataset.raster_count(), "opened stack");
        Ok(Self {
            dataset,
            path: path.to_path_buf(),
        })
    }

    /// Path the stack was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StackSource for GdalStack {
    fn size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    fn band_count(&self) -> usize {
        self.dataset.raster_count() as usize
    }

    fn band_labels(&self) -> Result<Vec<String>, RasterError> {
        let mut labels = Vec::new();
        for index in 1..=self.dataset.raster_count() {
            let band = self.dataset.rasterband(index)?;
            labels.push(band.description()?);
        }
        Ok(labels)
    }

    fn georeference(&self) -> Result<GeoReference, RasterError> {
        Ok(GeoReference {
            geo_transform: self.dataset.geo_transform().ok(),
            projection: self.dataset.projection(),
        })
    }

    fn read_window(
        &self,
        window: &BlockWindow,
        bands: &[usize],
    ) -> Result<Array3<f32>, RasterError> {
        let (width, height) = self.size();
        check_window(window, width, height)?;
        check_bands(bands, self.band_count())?;

        let mut block = Array3::<f32>::zeros((bands.len(), window.height, window.width));
        for (mut grid, &band_index) in block.axis_iter_mut(Axis(0)).zip(bands) {
            let band = self.dataset.rasterband(band_index + 1)?;
            let buffer = band.read_as::<f32>(window.offset(), window.size(), window.size(), None)?;
            let (_, data) = buffer.into_shape_and_vec();
            for (dst, src) in grid.iter_mut().zip(data) {
                *dst = src;
            }
        }
        Ok(block)
    }
}
