//! Change detection for one block window.

use cusum_calendar::fractional_year;
use cusum_detect::{bootstrap_significance, change_statistic};
use cusum_stack::{DateSubset, ResidualStack, TimeSeriesStack};
use ndarray::{Array2, Array3, Axis, Zip};
use rand::Rng;

use crate::config::TileParams;
use crate::error::TileError;

/// The three output grids of one block. Zero means no change.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBlock {
    /// Fractional year of the detected change.
    pub change_date: Array2<f32>,
    /// Combined bootstrap confidence.
    pub confidence: Array2<f32>,
    /// CUSUM magnitude.
    pub magnitude: Array2<f32>,
}

impl OutputBlock {
    /// Stacks the grids into a `(3, rows, cols)` block in output band order.
    pub fn to_bands(&self) -> Array3<f32> {
        let (rows, cols) = self.change_date.dim();
        let mut bands = Array3::zeros((3, rows, cols));
        for (mut band, grid) in bands
            .axis_iter_mut(Axis(0))
            .zip([&self.change_date, &self.confidence, &self.magnitude])
        {
            band.assign(grid);
        }
        bands
    }

    /// Number of pixels with a retained change.
    pub fn n_changes(&self) -> usize {
        self.change_date.iter().filter(|&&d| d != 0.0).count()
    }
}

/// Runs the statistics for one date-ordered block.
///
/// Restricts `stack` to `subset`, removes the per-pixel mean, computes the
/// CUSUM break (with the noise floor when enabled), converts the break
/// index to a fractional year, scores it with the bootstrap and applies the
/// zeroing rules:
///
/// 1. confidence is zeroed where the magnitude is zero;
/// 2. change date and magnitude are zeroed where the confidence is strictly
///    below the threshold;
/// 3. change date is zeroed where the magnitude is zero.
///
/// Degenerate inputs (empty subset, flat series) give an all-zero block.
///
/// # Errors
///
/// Returns [`TileError::Stack`] if `subset` refers to bands the stack does
/// not have.
pub fn process_block<R: Rng + ?Sized>(
    stack: &TimeSeriesStack,
    subset: &DateSubset,
    params: &TileParams,
    rng: &mut R,
) -> Result<OutputBlock, TileError> {
    let selected = stack.select(subset)?;
    let lookup: Vec<f32> = selected
        .dates()
        .iter()
        .map(|&d| fractional_year(d) as f32)
        .collect();

    let residuals = ResidualStack::from_stack(&selected);
    let breaks = change_statistic(residuals.view(), params.area_threshold());

    let significance = bootstrap_significance(
        residuals.view(),
        breaks.magnitude(),
        params.n_bootstraps(),
        rng,
    )?;
    let mut confidence = significance.combined();

    let (mut magnitude, break_index) = breaks.into_parts();
    let mut change_date = break_index.mapv(|i| lookup.get(i).copied().unwrap_or(0.0));

    let threshold = params.confidence_threshold();
    Zip::from(&mut change_date)
        .and(&mut confidence)
        .and(&mut magnitude)
        .for_each(|date, conf, mag| {
            // Also turns a -0.0 product into the +0 no-data value.
            if *mag == 0.0 || *conf == 0.0 {
                *conf = 0.0;
            }
            if *conf < threshold {
                *date = 0.0;
                *mag = 0.0;
            }
            if *mag == 0.0 {
                *date = 0.0;
            }
        });

    Ok(OutputBlock {
        change_date,
        confidence,
        magnitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cusum_calendar::{HistoricalPeriod, NaiveDate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn monthly_dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                let year = 2018 + (i / 12) as i32;
                NaiveDate::from_ymd_opt(year, (i % 12) as u32 + 1, 15).unwrap()
            })
            .collect()
    }

    /// 2 x 2 block: pixel (0, 0) drops by 10 after step 12, the rest is flat.
    fn step_stack(n: usize) -> TimeSeriesStack {
        let values = Array3::from_shape_fn((n, 2, 2), |(t, r, c)| {
            if (r, c) == (0, 0) && t >= n / 2 { 5.0 } else { 15.0 }
        });
        TimeSeriesStack::new(values, monthly_dates(n)).unwrap()
    }

    #[test]
    fn detects_step_and_dates_it() {
        let stack = step_stack(24);
        let subset = DateSubset::all(24);
        let params = TileParams::new().with_n_bootstraps(200).with_confidence_threshold(0.1);
        let out = process_block(&stack, &subset, &params, &mut StdRng::seed_from_u64(1)).unwrap();

        // Last acquisition before the drop: 2018-12-15.
        let expected = fractional_year(NaiveDate::from_ymd_opt(2018, 12, 15).unwrap()) as f32;
        assert_abs_diff_eq!(out.change_date[[0, 0]], expected, epsilon = 1e-3);
        assert!(out.magnitude[[0, 0]] > 0.0);
        assert!(out.confidence[[0, 0]] > 0.1);
        assert_eq!(out.n_changes(), 1);

        for (r, c) in [(0, 1), (1, 0), (1, 1)] {
            assert_eq!(out.change_date[[r, c]], 0.0);
            assert_eq!(out.confidence[[r, c]], 0.0);
            assert_eq!(out.magnitude[[r, c]], 0.0);
        }
    }

    #[test]
    fn confidence_equal_to_threshold_is_kept() {
        let stack = step_stack(24);
        let subset = DateSubset::all(24);
        let base = TileParams::new().with_n_bootstraps(50).with_seed(3);
        let reference =
            process_block(&stack, &subset, &base, &mut StdRng::seed_from_u64(3)).unwrap();
        let conf = reference.confidence[[0, 0]];
        assert!(conf > 0.0);

        let at = base.clone().with_confidence_threshold(conf);
        let out = process_block(&stack, &subset, &at, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(out.magnitude[[0, 0]] > 0.0);
        assert!(out.change_date[[0, 0]] > 0.0);
        assert_eq!(out.confidence[[0, 0]], conf);
    }

    #[test]
    fn confidence_below_threshold_is_suppressed() {
        let stack = step_stack(24);
        let subset = DateSubset::all(24);
        let base = TileParams::new().with_n_bootstraps(50);
        let reference =
            process_block(&stack, &subset, &base, &mut StdRng::seed_from_u64(3)).unwrap();
        let conf = reference.confidence[[0, 0]];

        let above = base.clone().with_confidence_threshold(conf + 1e-3);
        let out = process_block(&stack, &subset, &above, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(out.magnitude[[0, 0]], 0.0);
        assert_eq!(out.change_date[[0, 0]], 0.0);
        // Confidence itself is reported even when the change is dropped.
        assert_eq!(out.confidence[[0, 0]], conf);
    }

    #[test]
    fn zero_confidence_is_written_as_positive_zero() {
        // Alternating values: every reordering has at least the observed
        // range, so confidence is 0 and significance is negative.
        let values = Array3::from_shape_fn((16, 1, 1), |(t, _, _)| {
            if t % 2 == 0 { 2.0 } else { 4.0 }
        });
        let stack = TimeSeriesStack::new(values, monthly_dates(16)).unwrap();
        let params = TileParams::new()
            .with_n_bootstraps(50)
            .with_confidence_threshold(0.0);
        let out = process_block(
            &stack,
            &DateSubset::all(16),
            &params,
            &mut StdRng::seed_from_u64(4),
        )
        .unwrap();

        let conf = out.confidence[[0, 0]];
        assert_eq!(conf, 0.0);
        assert!(conf.is_sign_positive());
        assert!(out.magnitude[[0, 0]] > 0.0);
    }

    #[test]
    fn empty_subset_gives_zero_block() {
        let stack = step_stack(24);
        let period = HistoricalPeriod::new(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
        )
        .unwrap();
        let subset = DateSubset::from_dates(stack.dates(), &period);
        let params = TileParams::new().with_n_bootstraps(10).with_period(period);
        let out = process_block(&stack, &subset, &params, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(out.to_bands().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_bootstraps_drop_every_change() {
        let stack = step_stack(24);
        let params = TileParams::new().with_n_bootstraps(0);
        let out = process_block(
            &stack,
            &DateSubset::all(24),
            &params,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(out.n_changes(), 0);
        assert!(out.to_bands().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn nan_pixels_do_not_propagate() {
        let mut values = Array3::from_elem((12, 2, 2), 3.0_f32);
        values[[4, 1, 1]] = f32::NAN;
        values.index_axis_mut(Axis(1), 0).fill(f32::NAN);
        let stack = TimeSeriesStack::new(values, monthly_dates(12)).unwrap();
        let params = TileParams::new().with_n_bootstraps(20);
        let out = process_block(
            &stack,
            &DateSubset::all(12),
            &params,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert!(out.to_bands().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn to_bands_orders_outputs() {
        let block = OutputBlock {
            change_date: Array2::from_elem((1, 2), 2020.5),
            confidence: Array2::from_elem((1, 2), 0.4),
            magnitude: Array2::from_elem((1, 2), 7.0),
        };
        let bands = block.to_bands();
        assert_eq!(bands.dim(), (3, 1, 2));
        assert_eq!(bands[[0, 0, 1]], 2020.5);
        assert_eq!(bands[[1, 0, 0]], 0.4);
        assert_eq!(bands[[2, 0, 1]], 7.0);
    }
}
