//! Historical period used to select the acquisitions of a stack.

use chrono::NaiveDate;

use crate::error::CalendarError;

/// An open interval of dates `(start, end)`.
///
/// Both bounds are exclusive: an acquisition taken exactly on `start` or
/// `end` is outside the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoricalPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl HistoricalPeriod {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidPeriod`] if `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if end <= start {
            return Err(CalendarError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the period start.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the period end.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` if `date` lies strictly between start and end.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start && date < self.end
    }

    /// Returns the positions of `dates` that fall inside the period.
    pub fn select(&self, dates: &[NaiveDate]) -> Vec<usize> {
        dates
            .iter()
            .enumerate()
            .filter(|&(_, &d)| self.contains(d))
            .map(|(i, _)| i)
            .collect()
    }
}
