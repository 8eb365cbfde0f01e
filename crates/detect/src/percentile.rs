//! Block-wide noise floor for the change magnitude.

use ndarray::ArrayView2;

/// Percentile of the non-zero magnitudes used as the noise floor.
pub const NOISE_FLOOR_PERCENTILE: f64 = 95.0;

/// Nearest-rank percentile of an ascending slice: the element at
/// `round(q / 100 * (n - 1))`. Returns `None` for an empty slice.
pub(crate) fn nearest_rank(sorted: &[f32], q: f64) -> Option<f32> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 100.0);
    let rank = (q / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    Some(sorted[rank.min(sorted.len() - 1)])
}

/// Returns the 95th percentile of the non-zero magnitudes, or `None` when
/// every magnitude is zero.
pub fn noise_floor(magnitude: ArrayView2<'_, f32>) -> Option<f32> {
    let mut nonzero: Vec<f32> = magnitude.iter().copied().filter(|&m| m != 0.0).collect();
    if nonzero.is_empty() {
        return None;
    }
    nonzero.sort_by(f32::total_cmp);
    nearest_rank(&nonzero, NOISE_FLOOR_PERCENTILE)
}
