//! Date parsing and fractional-year conversion.

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;

/// Format of acquisition dates in band descriptions and date lists.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<NaiveDate, CalendarError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| CalendarError::InvalidDate {
        text: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Decimal-year representation of a date used for the change-date band.
///
/// Computed as `year + round(day_of_year / 365, 3)`. The day-of-year
/// divisor is 365 in every year, so the last day of a leap year maps
/// past the following 1 January (e.g. 2020-12-31 -> 2021.003).
pub fn fractional_year(date: NaiveDate) -> f64 {
    let fraction = f64::from(date.ordinal()) / 365.0;
    f64::from(date.year()) + (fraction * 1000.0).round() / 1000.0
}
