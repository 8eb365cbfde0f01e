//! Cumulative-sum change statistic.

use ndarray::{Array2, ArrayView3, Axis, Zip};
use tracing::debug;

use crate::percentile::noise_floor;
use crate::result::BreakResult;

/// Range and arg-max of the running cumulative sum of one series.
///
/// The running sum starts at the first value, so the range covers
/// `s_1..=s_T`. Ties resolve to the earliest index. An empty series yields
/// `(0.0, 0)`.
pub(crate) fn lane_cusum(values: impl IntoIterator<Item = f32>) -> (f32, usize) {
    let mut iter = values.into_iter();
    let Some(first) = iter.next() else {
        return (0.0, 0);
    };
    let mut sum = first;
    let (mut max, mut min, mut argmax) = (first, first, 0);
    for (t, v) in iter.enumerate() {
        sum += v;
        if sum > max {
            max = sum;
            argmax = t + 1;
        }
        if sum < min {
            min = sum;
        }
    }
    (max - min, argmax)
}

/// Computes the CUSUM magnitude and break index for every pixel of a
/// `(time, row, col)` residual block, without noise-floor suppression.
///
/// Pixels with a flat (all-zero) series get magnitude 0 and index 0.
pub fn cusum(residuals: ArrayView3<'_, f32>) -> BreakResult {
    let (_, rows, cols) = residuals.dim();
    let mut magnitude = Array2::<f32>::zeros((rows, cols));
    let mut break_index = Array2::<usize>::zeros((rows, cols));

    Zip::from(residuals.lanes(Axis(0)))
        .and(&mut magnitude)
        .and(&mut break_index)
        .for_each(|lane, m, i| {
            let (range, argmax) = lane_cusum(lane.iter().copied());
            *m = range;
            *i = if range == 0.0 { 0 } else { argmax };
        });

    BreakResult::new(magnitude, break_index)
}

/// Zeroes every pixel whose magnitude does not exceed the block's noise
/// floor (the 95th percentile of its non-zero magnitudes).
///
/// A block without any non-zero magnitude is already all zero and is left
/// untouched.
pub fn suppress_noise_floor(result: &mut BreakResult) {
    let Some(floor) = noise_floor(result.magnitude()) else {
        return;
    };
    let (magnitude, break_index) = result.parts_mut();
    Zip::from(magnitude)
        .and(break_index)
        .for_each(|m, i| {
            if *m <= floor {
                *m = 0.0;
                *i = 0;
            }
        });
    debug!(floor, survivors = result.n_breaks(), "noise floor applied");
}

/// Runs [`cusum`] and, when `area_threshold` is set, applies
/// [`suppress_noise_floor`].
pub fn change_statistic(residuals: ArrayView3<'_, f32>, area_threshold: bool) -> BreakResult {
    let mut result = cusum(residuals);
    if area_threshold {
        suppress_noise_floor(&mut result);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array3};

    fn single_pixel(series: &[f32]) -> Array3<f32> {
        Array1::from(series.to_vec())
            .into_shape_with_order((series.len(), 1, 1))
            .unwrap()
    }

    #[test]
    fn lane_cusum_empty() {
        assert_eq!(lane_cusum(std::iter::empty()), (0.0, 0));
    }

    #[test]
    fn lane_cusum_single_value() {
        assert_eq!(lane_cusum([3.0]), (0.0, 0));
    }

    #[test]
    fn lane_cusum_first_argmax_wins() {
        // Running sum: 1, 0, 1, 0. Max 1 first reached at index 0.
        assert_eq!(lane_cusum([1.0, -1.0, 1.0, -1.0]), (1.0, 0));
    }

    #[test]
    fn all_zero_block_has_no_breaks() {
        let residuals = Array3::<f32>::zeros((12, 3, 4));
        for area_threshold in [false, true] {
            let result = change_statistic(residuals.view(), area_threshold);
            assert!(result.magnitude().iter().all(|&m| m == 0.0));
            assert!(result.break_index().iter().all(|&i| i == 0));
        }
    }

    #[test]
    fn step_down_hand_computed() {
        // T = 10, mean-removed step of height 1 after index 4.
        // Running sum: 0.5, 1.0, 1.5, 2.0, 2.5, 2.0, 1.5, 1.0, 0.5, 0.0.
        let mut series = vec![0.5_f32; 5];
        series.extend([-0.5_f32; 5]);
        let result = cusum(single_pixel(&series).view());
        assert_abs_diff_eq!(result.magnitude()[[0, 0]], 2.5, epsilon = 1e-6);
        assert_eq!(result.break_index()[[0, 0]], 4);
    }

    #[test]
    fn raw_step_magnitude_grows_with_segment_length() {
        // Zeros then ones: running sum rises to 5 at the last index.
        let mut series = vec![0.0_f32; 5];
        series.extend([1.0_f32; 5]);
        let result = cusum(single_pixel(&series).view());
        assert_abs_diff_eq!(result.magnitude()[[0, 0]], 5.0, epsilon = 1e-6);
        assert_eq!(result.break_index()[[0, 0]], 9);
    }

    #[test]
    fn magnitude_scales_with_step_height() {
        let mut series = vec![2.0_f32; 4];
        series.extend([-2.0_f32; 4]);
        let result = cusum(single_pixel(&series).view());
        assert_abs_diff_eq!(result.magnitude()[[0, 0]], 8.0, epsilon = 1e-6);
        assert_eq!(result.break_index()[[0, 0]], 3);
    }

    /// 20 pixels in one row: magnitudes 1..=19 and a single outlier of 100.
    fn outlier_block() -> Array3<f32> {
        let cols = 20;
        let mut residuals = Array3::<f32>::zeros((2, 1, cols));
        for c in 0..cols {
            let h = if c == cols - 1 { 100.0 } else { (c + 1) as f32 };
            residuals[[0, 0, c]] = h;
            residuals[[1, 0, c]] = -h;
        }
        residuals
    }

    #[test]
    fn noise_floor_keeps_only_outlier() {
        let result = change_statistic(outlier_block().view(), true);
        assert_eq!(result.n_breaks(), 1);
        assert_abs_diff_eq!(result.magnitude()[[0, 19]], 100.0, epsilon = 1e-4);
        for c in 0..19 {
            assert_eq!(result.magnitude()[[0, c]], 0.0);
            assert_eq!(result.break_index()[[0, c]], 0);
        }
    }

    #[test]
    fn without_area_threshold_all_breaks_survive() {
        let result = change_statistic(outlier_block().view(), false);
        assert_eq!(result.n_breaks(), 20);
    }

    #[test]
    fn suppression_ignores_zero_pixels() {
        // A second, flat row doubles the pixel count without moving the floor.
        let block = outlier_block();
        let mut residuals = Array3::<f32>::zeros((2, 2, 20));
        residuals
            .index_axis_mut(ndarray::Axis(1), 0)
            .assign(&block.index_axis(ndarray::Axis(1), 0));
        let result = change_statistic(residuals.view(), true);
        assert_eq!(result.n_breaks(), 1);
        assert!(result.magnitude()[[0, 19]] > 0.0);
    }

    #[test]
    fn single_nonzero_pixel_is_suppressed() {
        // The only non-zero magnitude is its own 95th percentile.
        let mut residuals = Array3::<f32>::zeros((2, 2, 2));
        residuals[[0, 1, 1]] = 3.0;
        residuals[[1, 1, 1]] = -3.0;
        let result = change_statistic(residuals.view(), true);
        assert_eq!(result.n_breaks(), 0);
    }
}
