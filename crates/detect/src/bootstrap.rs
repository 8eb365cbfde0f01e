//! Permutation bootstrap of the change magnitude.

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cusum::lane_cusum;
use crate::error::DetectError;
use crate::result::ConfidenceResult;

/// Estimates per-pixel confidence and significance of the observed break.
///
/// Each of the `n_bootstraps` iterations draws one uniformly random
/// permutation of the time axis, applies it to every pixel of the block and
/// recomputes the CUSUM magnitude (without noise-floor suppression). Per
/// pixel:
///
/// * `confidence = #{surrogate < observed} / n_bootstraps`
/// * `significance = 1 - mean(surrogate) / observed`
///
/// Zero denominators resolve without producing non-finite values: with
/// `n_bootstraps == 0` both outputs are 0, and a pixel whose observed
/// magnitude is 0 has confidence 0 and significance 1 (no surrogate can be
/// weaker, and the mean-over-observed ratio is taken as 0).
///
/// # Errors
///
/// Returns [`DetectError::ShapeMismatch`] if `observed` does not have the
/// spatial shape of `residuals`.
#[tracing::instrument(skip(residuals, observed, rng), fields(n_times = residuals.len_of(Axis(0))))]
pub fn bootstrap_significance<R: Rng + ?Sized>(
    residuals: ArrayView3<'_, f32>,
    observed: ArrayView2<'_, f32>,
    n_bootstraps: usize,
    rng: &mut R,
) -> Result<ConfidenceResult, DetectError> {
    let (n_times, rows, cols) = residuals.dim();
    if observed.dim() != (rows, cols) {
        let (found_rows, found_cols) = observed.dim();
        return Err(DetectError::ShapeMismatch {
            rows,
            cols,
            found_rows,
            found_cols,
        });
    }

    if n_bootstraps == 0 {
        return Ok(ConfidenceResult::new(
            Array2::zeros((rows, cols)),
            Array2::zeros((rows, cols)),
        ));
    }

    // Pixel-major copy so each permuted series is read from one contiguous run.
    let n_pixels = rows * cols;
    let mut series = vec![0.0_f32; n_pixels * n_times];
    for (t, grid) in residuals.axis_iter(Axis(0)).enumerate() {
        for (p, &v) in grid.iter().enumerate() {
            series[p * n_times + t] = v;
        }
    }
    let observed: Vec<f32> = observed.iter().copied().collect();

    let mut weaker = vec![0_u32; n_pixels];
    let mut surrogate_sum = vec![0.0_f64; n_pixels];
    let mut order: Vec<usize> = (0..n_times).collect();

    for _ in 0..n_bootstraps {
        order.shuffle(rng);
        for p in 0..n_pixels {
            let lane = &series[p * n_times..(p + 1) * n_times];
            let (surrogate, _) = lane_cusum(order.iter().map(|&t| lane[t]));
            if surrogate < observed[p] {
                weaker[p] += 1;
            }
            surrogate_sum[p] += f64::from(surrogate);
        }
    }

    let n = n_bootstraps as f64;
    let confidence = Array2::from_shape_fn((rows, cols), |(r, c)| {
        (f64::from(weaker[r * cols + c]) / n) as f32
    });
    let significance = Array2::from_shape_fn((rows, cols), |(r, c)| {
        let p = r * cols + c;
        let obs = f64::from(observed[p]);
        let ratio = if obs == 0.0 { 0.0 } else { surrogate_sum[p] / n / obs };
        (1.0 - ratio) as f32
    });
    Ok(ConfidenceResult::new(confidence, significance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cusum::cusum;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn step_block(n_times: usize, rows: usize, cols: usize) -> Array3<f32> {
        let half = n_times / 2;
        Array3::from_shape_fn((n_times, rows, cols), |(t, _, _)| {
            if t < half { 1.0 } else { -1.0 }
        })
    }

    #[test]
    fn zero_bootstraps_resolve_to_zero() {
        let residuals = step_block(10, 2, 3);
        let observed = cusum(residuals.view()).magnitude().to_owned();
        let mut rng = StdRng::seed_from_u64(1);
        let result = bootstrap_significance(residuals.view(), observed.view(), 0, &mut rng)
            .unwrap();
        assert!(result.confidence().iter().all(|&c| c == 0.0));
        assert!(result.significance().iter().all(|&s| s == 0.0));
        assert!(result.combined().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let residuals = step_block(6, 2, 3);
        let observed = Array2::<f32>::zeros((3, 2));
        let mut rng = StdRng::seed_from_u64(1);
        let err = bootstrap_significance(residuals.view(), observed.view(), 5, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            DetectError::ShapeMismatch {
                rows: 2,
                cols: 3,
                found_rows: 3,
                found_cols: 2,
            }
        );
    }

    #[test]
    fn zero_observed_magnitude_stays_finite() {
        let residuals = Array3::<f32>::zeros((8, 2, 2));
        let observed = Array2::<f32>::zeros((2, 2));
        let mut rng = StdRng::seed_from_u64(3);
        let result = bootstrap_significance(residuals.view(), observed.view(), 20, &mut rng)
            .unwrap();
        assert!(result.confidence().iter().all(|&c| c == 0.0));
        assert!(result.significance().iter().all(|&s| s == 1.0));
        assert!(result.combined().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn strong_step_is_confident() {
        let residuals = step_block(20, 1, 2);
        let observed = cusum(residuals.view()).magnitude().to_owned();
        let mut rng = StdRng::seed_from_u64(42);
        let result = bootstrap_significance(residuals.view(), observed.view(), 200, &mut rng)
            .unwrap();
        for &c in result.confidence() {
            assert!(c > 0.9, "confidence {c}");
        }
        for &s in result.significance() {
            assert!(s > 0.0 && s <= 1.0, "significance {s}");
        }
    }

    #[test]
    fn confidence_is_a_fraction_of_iterations() {
        let residuals = step_block(12, 3, 3);
        let observed = cusum(residuals.view()).magnitude().to_owned();
        let mut rng = StdRng::seed_from_u64(9);
        let n = 7;
        let result = bootstrap_significance(residuals.view(), observed.view(), n, &mut rng)
            .unwrap();
        for &c in result.confidence() {
            let scaled = c * n as f32;
            assert_abs_diff_eq!(scaled, scaled.round(), epsilon = 1e-4);
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn same_seed_same_result() {
        let residuals = step_block(16, 2, 2);
        let observed = cusum(residuals.view()).magnitude().to_owned();
        let a = bootstrap_significance(
            residuals.view(),
            observed.view(),
            50,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        let b = bootstrap_significance(
            residuals.view(),
            observed.view(),
            50,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
