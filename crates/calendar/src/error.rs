//! Error types for the cusum-calendar crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the cusum-calendar crate.
///
/// Date-parsing failures are input malformations: a stack whose band
/// descriptors or date list cannot be parsed must not be processed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a string does not parse as a `YYYY-MM-DD` date.
    #[error("invalid date '{text}': {reason}")]
    InvalidDate {
        /// The text that failed to parse.
        text: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a historical period does not end after it starts.
    #[error("invalid period: end {end} is not after start {start}")]
    InvalidPeriod {
        /// Period start.
        start: chrono::NaiveDate,
        /// Period end.
        end: chrono::NaiveDate,
    },

    /// Returned when a date list file cannot be read.
    #[error("cannot read date list {}: {reason}", path.display())]
    DateList {
        /// Path of the date list.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },
}
