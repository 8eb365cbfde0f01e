//! Per-pixel outputs of the change statistic and the bootstrap.

use ndarray::{Array2, ArrayView2, Zip};

/// Break magnitude and break position per pixel.
///
/// Wherever the magnitude is zero the break index is zero as well.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakResult {
    magnitude: Array2<f32>,
    break_index: Array2<usize>,
}

impl BreakResult {
    pub(crate) fn new(magnitude: Array2<f32>, break_index: Array2<usize>) -> Self {
        debug_assert_eq!(magnitude.dim(), break_index.dim());
        Self {
            magnitude,
            break_index,
        }
    }

    /// Returns the CUSUM range per pixel.
    pub fn magnitude(&self) -> ArrayView2<'_, f32> {
        self.magnitude.view()
    }

    /// Returns the time index of the cumulative-sum maximum per pixel.
    pub fn break_index(&self) -> ArrayView2<'_, usize> {
        self.break_index.view()
    }

    /// Returns the spatial shape `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.magnitude.dim()
    }

    /// Returns the number of pixels with a non-zero magnitude.
    pub fn n_breaks(&self) -> usize {
        self.magnitude.iter().filter(|&&m| m != 0.0).count()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Array2<f32>, &mut Array2<usize>) {
        (&mut self.magnitude, &mut self.break_index)
    }

    /// Consumes the result, returning `(magnitude, break_index)`.
    pub fn into_parts(self) -> (Array2<f32>, Array2<usize>) {
        (self.magnitude, self.break_index)
    }
}

/// Bootstrap confidence and significance per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceResult {
    confidence: Array2<f32>,
    significance: Array2<f32>,
}

impl ConfidenceResult {
    pub(crate) fn new(confidence: Array2<f32>, significance: Array2<f32>) -> Self {
        Self {
            confidence,
            significance,
        }
    }

    /// Fraction of reorderings that produced a weaker break, in `[0, 1]`.
    pub fn confidence(&self) -> ArrayView2<'_, f32> {
        self.confidence.view()
    }

    /// `1 - mean surrogate magnitude / observed magnitude`, at most 1.
    pub fn significance(&self) -> ArrayView2<'_, f32> {
        self.significance.view()
    }

    /// Returns `confidence * significance` per pixel.
    pub fn combined(&self) -> Array2<f32> {
        Zip::from(&self.confidence)
            .and(&self.significance)
            .map_collect(|&c, &s| c * s)
    }
}
