//! Bounded worker pool over independent tiles.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::info;

use crate::error::TileError;
use crate::processor::TileSummary;
use crate::progress::ProgressSink;
use crate::work::TileWorkItem;

/// A finished tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileReport {
    /// Input raster stack.
    pub input: PathBuf,
    /// Written output raster.
    pub output: PathBuf,
    /// Processing summary.
    pub summary: TileSummary,
}

/// Runs tile work items on a fixed number of worker threads.
///
/// Each worker processes one tile at a time. The first failing tile aborts
/// the run: no new tiles are started and the error is returned once the
/// tiles already running have finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileScheduler {
    workers: usize,
}

impl Default for TileScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TileScheduler {
    /// Creates a scheduler sized to the available CPU parallelism.
    pub fn new() -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self { workers }
    }

    /// Sets the number of worker threads (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `process` for every item and waits for all of them.
    ///
    /// `progress` is notified once before the first tile starts. Reports
    /// come back in the order of `items`.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::WorkerPool`] if the pool cannot be built, or the
    /// error of a failed tile.
    pub fn run<F>(
        &self,
        items: &[TileWorkItem],
        progress: &dyn ProgressSink,
        process: F,
    ) -> Result<Vec<TileReport>, TileError>
    where
        F: Fn(&TileWorkItem) -> Result<TileSummary, TileError> + Sync,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("cusum-tile-{i}"))
            .build()
            .map_err(|e| TileError::WorkerPool {
                reason: e.to_string(),
            })?;

        progress.notify(&format!(
            "processing {} tile(s) on {} worker(s)",
            items.len(),
            self.workers
        ));
        info!(tiles = items.len(), workers = self.workers, "starting tile phase");

        let reports = pool.install(|| {
            items
                .par_iter()
                .with_max_len(1)
                .map(|item| {
                    let summary = process(item)?;
                    Ok(TileReport {
                        input: item.input().to_path_buf(),
                        output: item.output().to_path_buf(),
                        summary,
                    })
                })
                .collect::<Result<Vec<_>, TileError>>()
        })?;

        info!(tiles = reports.len(), "tile phase complete");
        Ok(reports)
    }
}
