//! Error types for the cusum-detect crate.

/// Error type for fallible operations in the cusum-detect crate.
///
/// Degenerate statistics (flat series, zero magnitude, zero bootstrap
/// count) are never errors; they resolve to zero. Only inconsistent inputs
/// are reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectError {
    /// The observed magnitude grid does not match the residual block.
    #[error(
        "shape mismatch: residuals are {rows}x{cols} pixels, observed magnitude is {found_rows}x{found_cols}"
    )]
    ShapeMismatch {
        /// Rows in the residual block.
        rows: usize,
        /// Columns in the residual block.
        cols: usize,
        /// Rows in the observed magnitude grid.
        found_rows: usize,
        /// Columns in the observed magnitude grid.
        found_cols: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_display() {
        let err = DetectError::ShapeMismatch {
            rows: 4,
            cols: 5,
            found_rows: 4,
            found_cols: 6,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: residuals are 4x5 pixels, observed magnitude is 4x6"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DetectError>();
    }
}
