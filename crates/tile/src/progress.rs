//! Fire-and-forget status messages for an outside observer.

/// Receives status messages at the start of the tile phase and of the merge
/// phase. Implementations must not block.
pub trait ProgressSink: Sync {
    /// Delivers one status message.
    fn notify(&self, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn notify(&self, _message: &str) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}
