//! Newline-separated acquisition date lists.

use std::path::Path;

use chrono::NaiveDate;

use crate::date::parse_date;
use crate::error::CalendarError;

/// Parses one date per line, skipping blank lines.
///
/// The returned dates are sorted ascending regardless of their order in
/// `text`; duplicates are kept.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] for the first line that does not
/// parse.
pub fn parse_date_list(text: &str) -> Result<Vec<NaiveDate>, CalendarError> {
    let mut dates = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_date)
        .collect::<Result<Vec<_>, _>>()?;
    dates.sort_unstable();
    Ok(dates)
}

/// Reads and parses a date list file (see [`parse_date_list`]).
///
/// # Errors
///
/// Returns [`CalendarError::DateList`] if the file cannot be read and
/// [`CalendarError::InvalidDate`] if a line does not parse.
pub fn read_date_list(path: &Path) -> Result<Vec<NaiveDate>, CalendarError> {
    let text = std::fs::read_to_string(path).map_err(|e| CalendarError::DateList {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_date_list(&text)
}
