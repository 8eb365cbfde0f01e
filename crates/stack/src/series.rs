//! Date-labelled stack of grids for one spatial block.

use cusum_calendar::NaiveDate;
use ndarray::{Array3, ArrayView3, Axis};

use crate::error::StackError;
use crate::subset::DateSubset;

/// Time series of `(rows, cols)` grids, one per acquisition date.
///
/// Invariants: the time axis length equals the number of dates, and dates
/// are sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesStack {
    values: Array3<f32>,
    dates: Vec<NaiveDate>,
}

impl TimeSeriesStack {
    /// Creates a stack from values already ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::DateCountMismatch`] if the time axis and
    /// `dates` differ in length, or [`StackError::Unsorted`] if `dates` is
    /// not ascending.
    pub fn new(values: Array3<f32>, dates: Vec<NaiveDate>) -> Result<Self, StackError> {
        check_count(&values, &dates)?;
        if let Some(position) = dates.windows(2).position(|w| w[1] < w[0]) {
            return Err(StackError::Unsorted {
                position: position + 1,
            });
        }
        Ok(Self { values, dates })
    }

    /// Creates a stack from bands in arbitrary order, reordering them so
    /// that dates ascend. Bands with equal dates keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::DateCountMismatch`] if the time axis and
    /// `dates` differ in length.
    pub fn sorted(values: Array3<f32>, dates: Vec<NaiveDate>) -> Result<Self, StackError> {
        check_count(&values, &dates)?;
        let order = date_order(&dates);
        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return Ok(Self { values, dates });
        }
        let values = values.select(Axis(0), &order);
        let dates = order.iter().map(|&i| dates[i]).collect();
        Ok(Self { values, dates })
    }

    /// Returns the number of time steps.
    pub fn n_times(&self) -> usize {
        self.dates.len()
    }

    /// Returns the spatial shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.values.dim();
        (rows, cols)
    }

    /// Returns the `(time, row, col)` values.
    pub fn values(&self) -> ArrayView3<'_, f32> {
        self.values.view()
    }

    /// Returns the acquisition dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Restricts the stack to the acquisitions in `subset`.
    ///
    /// An empty subset produces a stack with a zero-length time axis.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::SubsetOutOfRange`] if the subset refers to a
    /// band past the end of the stack.
    pub fn select(&self, subset: &DateSubset) -> Result<Self, StackError> {
        let bands = self.n_times();
        if let Some(&index) = subset.indices().iter().find(|&&i| i >= bands) {
            return Err(StackError::SubsetOutOfRange { index, bands });
        }
        let (rows, cols) = self.shape();
        let values = if subset.is_empty() {
            Array3::zeros((0, rows, cols))
        } else {
            self.values.select(Axis(0), subset.indices())
        };
        Ok(Self {
            values,
            dates: subset.dates(&self.dates),
        })
    }

    /// Consumes the stack, returning its values and dates.
    pub fn into_parts(self) -> (Array3<f32>, Vec<NaiveDate>) {
        (self.values, self.dates)
    }
}

/// Returns band positions ordered by ascending date. Equal dates keep their
/// band order.
///
/// ```
/// use cusum_stack::date_order;
/// use cusum_calendar::NaiveDate;
///
/// let d = |m| NaiveDate::from_ymd_opt(2020, m, 1).unwrap();
/// assert_eq!(date_order(&[d(3), d(1), d(2)]), vec![1, 2, 0]);
/// ```
pub fn date_order(dates: &[NaiveDate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&i| dates[i]);
    order
}

fn check_count(values: &Array3<f32>, dates: &[NaiveDate]) -> Result<(), StackError> {
    let bands = values.len_of(Axis(0));
    if bands != dates.len() {
        return Err(StackError::DateCountMismatch {
            bands,
            dates: dates.len(),
        });
    }
    Ok(())
}
