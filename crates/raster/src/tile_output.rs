//! Tiled 3-band GeoTIFF written by one tile worker.

use std::path::{Path, PathBuf};

use gdal::cpl::CslStringList;
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager, Metadata};
use ndarray::{ArrayView3, Axis};
use tracing::{debug, info};

use crate::error::RasterError;
use crate::georef::GeoReference;
use crate::source::{BlockSink, check_block, check_window};
use crate::window::BlockWindow;
use crate::{NO_DATA, OUTPUT_BANDS, OUTPUT_BLOCK_SIZE};

/// Creation options for tiled float32 GeoTIFFs with square internal blocks.
pub(crate) fn tiled_options(block_size: usize) -> Result<CslStringList, RasterError> {
    let mut options = CslStringList::new();
    options.set_name_value("TILED", "YES")?;
    options.set_name_value("BLOCKXSIZE", &block_size.to_string())?;
    options.set_name_value("BLOCKYSIZE", &block_size.to_string())?;
    Ok(options)
}

/// Creates a tiled float32 GeoTIFF with the change bands, no-data 0 and
/// band descriptions set.
pub(crate) fn create_change_raster(
    path: &Path,
    width: usize,
    height: usize,
    georeference: &GeoReference,
    block_size: usize,
) -> Result<Dataset, RasterError> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let options = tiled_options(block_size)?;
    let mut dataset = driver.create_with_band_type_with_options::<f32, _>(
        path,
        width,
        height,
        OUTPUT_BANDS.len(),
        &options,
    )?;
    if let Some(gt) = &georeference.geo_transform {
        dataset.set_geo_transform(gt)?;
    }
    if !georeference.projection.is_empty() {
        dataset.set_projection(&georeference.projection)?;
    }
    for (index, name) in (1..=dataset.raster_count()).zip(OUTPUT_BANDS) {
        let mut band = dataset.rasterband(index)?;
        band.set_no_data_value(Some(f64::from(NO_DATA)))?;
        band.set_description(name)?;
        band.set_metadata_item("NAME", name, "")?;
    }
    Ok(dataset)
}

/// One tile's change raster: band 1 change date, band 2 confidence,
/// band 3 magnitude.
pub struct TileOutput {
    dataset: Option<Dataset>,
    path: PathBuf,
    size: (usize, usize),
    block_size: usize,
}

impl std::fmt::Debug for TileOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileOutput")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("open", &self.dataset.is_some())
            .finish()
    }
}

impl TileOutput {
    /// Creates the output at `path`, `width` x `height` pixels, with
    /// 256 x 256 internal blocks.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Gdal`] if the file cannot be created.
    pub fn create(
        path: &Path,
        width: usize,
        height: usize,
        georeference: &GeoReference,
    ) -> Result<Self, RasterError> {
        Self::create_with_block_size(path, width, height, georeference, OUTPUT_BLOCK_SIZE)
    }

    /// Like [`TileOutput::create`] with a custom internal block size.
    ///
    /// GeoTIFF requires tiled block sizes to be multiples of 16.
    pub fn create_with_block_size(
        path: &Path,
        width: usize,
        height: usize,
        georeference: &GeoReference,
        block_size: usize,
    ) -> Result<Self, RasterError> {
        let dataset = create_change_raster(path, width, height, georeference, block_size)?;
        info!(path = %path.display(), width, height, block_size, "created tile output");
        Ok(Self {
            dataset: Some(dataset),
            path: path.to_path_buf(),
            size: (width, height),
            block_size,
        })
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockSink for TileOutput {
    fn size(&self) -> (usize, usize) {
        self.size
    }

    fn band_count(&self) -> usize {
        OUTPUT_BANDS.len()
    }

    fn block_size(&self) -> (usize, usize) {
        (self.block_size, self.block_size)
    }

    fn write_window(
        &mut self,
        window: &BlockWindow,
        block: ArrayView3<'_, f32>,
    ) -> Result<(), RasterError> {
        let (width, height) = self.size;
        check_window(window, width, height)?;
        check_block(window, OUTPUT_BANDS.len(), &block)?;
        let Some(dataset) = self.dataset.as_ref() else {
            return Err(RasterError::Closed {
                path: self.path.clone(),
            });
        };
        for (index, grid) in (1..=dataset.raster_count()).zip(block.axis_iter(Axis(0))) {
            let mut band = dataset.rasterband(index)?;
            let mut buffer = Buffer::new(window.size(), grid.iter().copied().collect());
            band.write(window.offset(), window.size(), &mut buffer)?;
        }
        Ok(())
    }

    /// Flushes cached blocks and closes the file. Write errors GDAL defers
    /// until the flush are reported here.
    fn finish(&mut self) -> Result<(), RasterError> {
        let Some(mut dataset) = self.dataset.take() else {
            return Ok(());
        };
        dataset.flush_cache()?;
        dataset.close()?;
        debug!(path = %self.path.display(), "closed tile output");
        Ok(())
    }
}
