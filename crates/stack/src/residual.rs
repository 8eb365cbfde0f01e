//! Mean-removed residuals of a time series stack.

use ndarray::{Array2, Array3, ArrayView3, Axis, Zip};

use crate::series::TimeSeriesStack;

/// Per-pixel deviations from the temporal mean, shaped `(time, row, col)`.
///
/// Non-finite inputs do not contribute to the mean. Every position whose
/// value is zero after replacing non-finite values with zero is treated as
/// "no observation" and holds a zero residual, so NaN never reaches the
/// change statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualStack {
    values: Array3<f32>,
    n_finite: Array2<u32>,
}

impl ResidualStack {
    /// Computes residuals of a date-ordered stack.
    pub fn from_stack(stack: &TimeSeriesStack) -> Self {
        Self::from_values(stack.values())
    }

    /// Computes residuals of raw `(time, row, col)` values.
    pub fn from_values(values: ArrayView3<'_, f32>) -> Self {
        let n_finite = values.map_axis(Axis(0), |lane| {
            lane.iter().filter(|v| v.is_finite()).count() as u32
        });
        let mut residuals = values.mapv(|v| if v.is_finite() { v } else { 0.0 });

        let sums = residuals.sum_axis(Axis(0));
        let mean = Zip::from(&sums)
            .and(&n_finite)
            .map_collect(|&sum, &n| if n == 0 { 0.0 } else { sum / n as f32 });

        Zip::from(residuals.lanes_mut(Axis(0)))
            .and(&mean)
            .for_each(|mut lane, &m| {
                lane.mapv_inplace(|v| if v == 0.0 { 0.0 } else { v - m });
            });

        Self {
            values: residuals,
            n_finite,
        }
    }

    /// Returns the residuals.
    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.values.view()
    }

    /// Returns the number of finite observations per pixel.
    pub fn n_finite(&self) -> &Array2<u32> {
        &self.n_finite
    }

    /// Returns the number of time steps.
    pub fn n_times(&self) -> usize {
        self.values.len_of(Axis(0))
    }

    /// Consumes the stack, returning the residual array.
    pub fn into_values(self) -> Array3<f32> {
        self.values
    }
}
