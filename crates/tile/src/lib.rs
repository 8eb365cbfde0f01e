//! # cusum-tile
//!
//! Change detection over whole tiles.
//!
//! A [`TileProcessor`] walks one tile block by block: it reads the date
//! stack of each window, runs [`process_block`] (residuals, CUSUM,
//! bootstrap, thresholds) and writes the 3-band result. The
//! [`TileScheduler`] fans independent [`TileWorkItem`]s out over a bounded
//! worker pool and only returns once every tile has finished, after which
//! the outputs are mosaicked.
//!
//! ```mermaid
//! graph TD
//!     W["TileWorkItem list"] -->|"TileScheduler::run()"| P1["TileProcessor (tile 1)"]
//!     W --> P2["TileProcessor (tile n)"]
//!     P1 -->|"per block"| B["process_block()"]
//!     P2 --> B
//!     P1 --> O["tile outputs"]
//!     P2 --> O
//!     O -->|"MosaicMerger"| M["merged raster"]
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | `config` | [`TileParams`] |
//! | `block` | [`process_block`], [`OutputBlock`] |
//! | `processor` | [`TileProcessor`], [`TileSummary`], [`TileStage`] |
//! | `work` | [`TileWorkItem`] |
//! | `scheduler` | [`TileScheduler`], [`TileReport`] |
//! | `progress` | [`ProgressSink`], [`NullProgress`] |
//! | `file` | `run_work_item`, `process_and_merge` (feature `gdal`) |

mod block;
mod config;
mod error;
mod processor;
mod progress;
mod scheduler;
mod work;

#[cfg(feature = "gdal")]
mod file;

pub use block::{OutputBlock, process_block};
pub use config::TileParams;
pub use error::TileError;
pub use processor::{TileProcessor, TileStage, TileSummary};
pub use progress::{NullProgress, ProgressSink};
pub use scheduler::{TileReport, TileScheduler};
pub use work::TileWorkItem;

#[cfg(feature = "gdal")]
pub use file::{process_and_merge, run_work_item};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// RNG for block `index` of a tile, derived from the run's base seed.
pub(crate) fn block_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(index as u64))
}
