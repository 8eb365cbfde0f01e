//! Selection of the acquisitions inside a historical period.

use cusum_calendar::{HistoricalPeriod, NaiveDate};

/// Ascending band positions of a date-sorted stack that are used for the
/// change statistic.
///
/// A subset may be empty; downstream statistics then degrade to zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateSubset {
    indices: Vec<usize>,
}

impl DateSubset {
    /// Selects the positions of `dates` strictly inside `period`.
    pub fn from_dates(dates: &[NaiveDate], period: &HistoricalPeriod) -> Self {
        Self {
            indices: period.select(dates),
        }
    }

    /// Selects every band of an `n`-band stack.
    pub fn all(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Creates a subset from explicit positions, sorted and deduplicated.
    pub fn from_indices(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// Returns the selected positions.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the number of selected acquisitions.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no acquisition is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the dates at the selected positions.
    pub fn dates(&self, dates: &[NaiveDate]) -> Vec<NaiveDate> {
        self.indices.iter().filter_map(|&i| dates.get(i).copied()).collect()
    }
}
