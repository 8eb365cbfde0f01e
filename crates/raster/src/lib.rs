//! # cusum-raster
//!
//! Raster I/O for tile processing: a tile's multi-band date stack is read
//! one block window at a time through [`StackSource`], the 3-band result is
//! written through [`BlockSink`], and finished tiles are mosaicked into a
//! single GeoTIFF.
//!
//! ```mermaid
//! graph LR
//!     S["stack.tif / stack.vrt"] -->|"GdalStack::read_window()"| B["block (band, row, col)"]
//!     B -->|"TileOutput::write_window()"| T["tile output (3 bands)"]
//!     T -->|"MosaicMerger::merge()"| M["merged GeoTIFF"]
//! ```
//!
//! [`MemoryRaster`] implements both seams in memory for tests and for
//! callers that already hold the data.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `window` | [`BlockWindow`], [`block_windows`] |
//! | `georef` | [`GeoReference`] |
//! | `source` | [`StackSource`], [`BlockSink`] |
//! | `memory` | [`MemoryRaster`] |
//! | `gdal_stack` | `GdalStack` (feature `gdal`) |
//! | `tile_output` | `TileOutput` (feature `gdal`) |
//! | `mosaic` | `MosaicMerger` (feature `gdal`) |

mod error;
mod georef;
mod memory;
mod source;
mod window;

#[cfg(feature = "gdal")]
mod gdal_stack;
#[cfg(feature = "gdal")]
mod mosaic;
#[cfg(feature = "gdal")]
mod tile_output;

pub use error::RasterError;
pub use georef::GeoReference;
pub use memory::MemoryRaster;
pub use source::{BlockSink, StackSource};
pub use window::{BlockWindow, block_windows};

#[cfg(feature = "gdal")]
pub use gdal_stack::GdalStack;
#[cfg(feature = "gdal")]
pub use mosaic::{MosaicMerger, MosaicSummary};
#[cfg(feature = "gdal")]
pub use tile_output::TileOutput;

/// Band descriptions of every change raster, in band order.
pub const OUTPUT_BANDS: [&str; 3] = ["Change Date", "Confidence", "Magnitude"];

/// Pixel value meaning "no change / no data" in every output band.
pub const NO_DATA: f32 = 0.0;

/// Internal block edge length of tiled outputs, in pixels.
pub const OUTPUT_BLOCK_SIZE: usize = 256;
