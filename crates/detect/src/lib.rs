//! # cusum-detect
//!
//! Per-pixel change detection on residual time series.
//!
//! The change statistic is the range of the running cumulative sum of
//! residuals along time. Its arg-max locates the break. A bootstrap over
//! random reorderings of the time axis turns the observed magnitude into a
//! confidence and a significance score.
//!
//! ```mermaid
//! graph LR
//!     R["residuals (time, row, col)"] -->|"change_statistic()"| B["BreakResult"]
//!     B -->|"area threshold"| S["suppress_noise_floor()"]
//!     R -->|"bootstrap_significance()"| C["ConfidenceResult"]
//!     B -->|"observed magnitude"| C
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | `cusum` | [`cusum`], [`change_statistic`], [`suppress_noise_floor`] |
//! | `percentile` | [`noise_floor`], [`NOISE_FLOOR_PERCENTILE`] |
//! | `bootstrap` | [`bootstrap_significance`] |
//! | `result` | [`BreakResult`], [`ConfidenceResult`] |
//!
//! ```
//! use cusum_detect::cusum;
//! use ndarray::Array3;
//!
//! // One pixel, shift from +1 to -1 after the second step.
//! let residuals = Array3::from_shape_vec((4, 1, 1), vec![1.0, 1.0, -1.0, -1.0]).unwrap();
//! let result = cusum(residuals.view());
//! assert_eq!(result.magnitude()[[0, 0]], 2.0);
//! assert_eq!(result.break_index()[[0, 0]], 1);
//! ```

mod bootstrap;
mod cusum;
mod error;
mod percentile;
mod result;

pub use bootstrap::bootstrap_significance;
pub use cusum::{change_statistic, cusum, suppress_noise_floor};
pub use error::DetectError;
pub use percentile::{NOISE_FLOOR_PERCENTILE, noise_floor};
pub use result::{BreakResult, ConfidenceResult};
