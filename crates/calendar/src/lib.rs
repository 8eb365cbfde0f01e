//! # cusum-calendar
//!
//! Acquisition-date handling for satellite image time series.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["dates.csv"] -->|"read_date_list()"| B["Vec of NaiveDate (sorted)"]
//!     C["band description"] -->|"parse_date()"| D["NaiveDate"]
//!     B -->|"HistoricalPeriod::contains()"| E["dates inside the period"]
//!     E -->|"fractional_year()"| F["change-date lookup table"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use cusum_calendar::{HistoricalPeriod, fractional_year, parse_date};
//!
//! let start = parse_date("2018-01-01").unwrap();
//! let end = parse_date("2021-01-01").unwrap();
//! let period = HistoricalPeriod::new(start, end).unwrap();
//!
//! let date = parse_date("2019-07-02").unwrap();
//! assert!(period.contains(date));
//! assert!((fractional_year(date) - 2019.501).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `date` | Date parsing and fractional-year conversion |
//! | `list` | Newline-separated date lists |
//! | `period` | Historical period used to subset a stack |
//! | `error` | Error types |

mod date;
mod error;
mod list;
mod period;

pub use chrono::NaiveDate;
pub use date::{DATE_FORMAT, fractional_year, parse_date};
pub use error::CalendarError;
pub use list::{parse_date_list, read_date_list};
pub use period::HistoricalPeriod;
