//! Error types for the cusum-stack crate.

/// Error type for all fallible operations in the cusum-stack crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StackError {
    /// Returned when the number of grids differs from the number of dates.
    #[error("stack has {bands} band(s) but {dates} date(s)")]
    DateCountMismatch {
        /// Number of grids along the time axis.
        bands: usize,
        /// Number of date labels.
        dates: usize,
    },

    /// Returned when dates are not in ascending order.
    #[error("dates are not sorted ascending at position {position}")]
    Unsorted {
        /// Position of the first date that is earlier than its predecessor.
        position: usize,
    },

    /// Returned when a subset refers to a band the stack does not have.
    #[error("subset index {index} out of range for {bands} band(s)")]
    SubsetOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of bands in the stack.
        bands: usize,
    },
}
