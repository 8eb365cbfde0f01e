//! # cusum-stack
//!
//! In-memory time series for one spatial block of a tile.
//!
//! A [`TimeSeriesStack`] holds a `(time, row, col)` grid of `f32` values with
//! one acquisition date per time step. Restricting it to a
//! [`DateSubset`] and removing the per-pixel temporal mean yields the
//! [`ResidualStack`] consumed by the change statistic.
//!
//! ```mermaid
//! graph LR
//!     A["block read (band order)"] -->|"TimeSeriesStack::sorted()"| B["TimeSeriesStack"]
//!     B -->|"select(DateSubset)"| C["TimeSeriesStack (period)"]
//!     C -->|"ResidualStack::from_stack()"| D["ResidualStack"]
//! ```

mod error;
mod residual;
mod series;
mod subset;

pub use error::StackError;
pub use residual::ResidualStack;
pub use series::{TimeSeriesStack, date_order};
pub use subset::DateSubset;
