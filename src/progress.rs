use cusum_tile::ProgressSink;
use tracing::info;

/// Forwards status messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn notify(&self, message: &str) {
        info!(target: "cusum::progress", "{message}");
    }
}
