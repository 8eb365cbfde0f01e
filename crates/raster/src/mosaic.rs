//! Merging per-tile change rasters into one GeoTIFF.

use std::fs;
use std::path::{Path, PathBuf};

use gdal::Dataset;
use gdal::programs::raster::{BuildVRTOptions, build_vrt};
use ndarray::Array3;
use tracing::{info, warn};

use crate::error::RasterError;
use crate::georef::GeoReference;
use crate::gdal_stack::GdalStack;
use crate::source::{BlockSink, StackSource};
use crate::tile_output::TileOutput;
use crate::{NO_DATA, OUTPUT_BANDS, OUTPUT_BLOCK_SIZE};

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicSummary {
    /// Merged raster.
    pub output: PathBuf,
    /// Merged raster size `(width, height)`.
    pub size: (usize, usize),
    /// Number of tile outputs merged.
    pub n_inputs: usize,
    /// Intermediate files removed after materialization.
    pub removed: Vec<PathBuf>,
}

/// Builds a virtual mosaic of tile outputs and materializes it.
///
/// Value 0 is no-data on both sides of the mosaic, so a zero pixel of one
/// tile never hides a valid pixel of an overlapping tile.
#[derive(Debug, Clone)]
pub struct MosaicMerger {
    output: PathBuf,
    block_size: usize,
    keep_intermediates: bool,
}

impl MosaicMerger {
    /// Merges into `output`.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            block_size: OUTPUT_BLOCK_SIZE,
            keep_intermediates: false,
        }
    }

    /// Sets the internal block size of the merged raster.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Keeps the virtual mosaic and the tile outputs after a successful merge.
    pub fn with_keep_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = keep;
        self
    }

    /// Path of the virtual mosaic definition written next to the output.
    pub fn vrt_path(&self) -> PathBuf {
        self.output.with_extension("vrt")
    }

    /// Merges `inputs` into the output raster, then removes the virtual
    /// mosaic and every input.
    ///
    /// On any failure nothing is removed, so the tile outputs can be merged
    /// again without reprocessing.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::EmptyMosaic`] without inputs,
    /// [`RasterError::Gdal`] if the mosaic cannot be built or written, and
    /// [`RasterError::Io`] if an intermediate file cannot be removed.
    #[tracing::instrument(skip(self, inputs), fields(output = %self.output.display(), n_inputs = inputs.len()))]
    pub fn merge(&self, inputs: &[PathBuf]) -> Result<MosaicSummary, RasterError> {
        if inputs.is_empty() {
            return Err(RasterError::EmptyMosaic);
        }

        let vrt_path = self.vrt_path();
        self.build_virtual_mosaic(inputs, &vrt_path)?;
        let size = self.materialize(&vrt_path)?;
        info!(width = size.0, height = size.1, "materialized mosaic");

        let removed = if self.keep_intermediates {
            Vec::new()
        } else {
            let mut targets = vec![vrt_path];
            targets.extend(inputs.iter().cloned());
            remove_files(&targets)?;
            targets
        };

        Ok(MosaicSummary {
            output: self.output.clone(),
            size,
            n_inputs: inputs.len(),
            removed,
        })
    }

    fn build_virtual_mosaic(&self, inputs: &[PathBuf], vrt_path: &Path) -> Result<(), RasterError> {
        let datasets = inputs
            .iter()
            .map(|path| {
                Dataset::open(path).map_err(|e| RasterError::Gdal {
                    reason: format!("cannot open {}: {e}", path.display()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let nodata = NO_DATA.to_string();
        let options = BuildVRTOptions::new(["-srcnodata", nodata.as_str(), "-vrtnodata", nodata.as_str()])?;
        let vrt = build_vrt(Some(vrt_path), &datasets, Some(options))?;
        // Dropping writes the VRT definition to disk.
        drop(vrt);
        Ok(())
    }

    fn materialize(&self, vrt_path: &Path) -> Result<(usize, usize), RasterError> {
        let mosaic = GdalStack::open(vrt_path)?;
        let (width, height) = mosaic.size();
        let georeference: GeoReference = mosaic.georeference()?;
        let bands: Vec<usize> = (0..OUTPUT_BANDS.len()).collect();

        let mut output = TileOutput::create_with_block_size(
            &self.output,
            width,
            height,
            &georeference,
            self.block_size,
        )?;
        for window in output.block_windows() {
            let block: Array3<f32> = mosaic.read_window(&window, &bands)?;
            output.write_window(&window, block.view())?;
        }
        output.finish()?;
        Ok((width, height))
    }
}

fn remove_files(paths: &[PathBuf]) -> Result<(), RasterError> {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "intermediate already removed");
            }
            Err(e) => {
                return Err(RasterError::Io {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(())
}
