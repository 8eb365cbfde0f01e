//! Parameters shared by every tile of a run.

use cusum_calendar::HistoricalPeriod;

use crate::error::TileError;

/// Detection parameters for one run, passed by value to every tile task.
///
/// # Example
///
/// ```
/// use cusum_tile::TileParams;
///
/// let params = TileParams::new()
///     .with_n_bootstraps(200)
///     .with_confidence_threshold(0.2)
///     .with_seed(7);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TileParams {
    n_bootstraps: usize,
    period: Option<HistoricalPeriod>,
    area_threshold: bool,
    confidence_threshold: f32,
    seed: u64,
}

impl Default for TileParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TileParams {
    /// Creates parameters with defaults.
    ///
    /// Defaults: `n_bootstraps = 1000`, no period (every acquisition),
    /// `area_threshold = false`, `confidence_threshold = 0.15`, `seed = 0`.
    pub fn new() -> Self {
        Self {
            n_bootstraps: 1000,
            period: None,
            area_threshold: false,
            confidence_threshold: 0.15,
            seed: 0,
        }
    }

    /// Sets the number of bootstrap permutations.
    pub fn with_n_bootstraps(mut self, n: usize) -> Self {
        self.n_bootstraps = n;
        self
    }

    /// Restricts the statistic to acquisitions inside `period`.
    pub fn with_period(mut self, period: HistoricalPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Enables the block-wide 95th-percentile noise floor.
    pub fn with_area_threshold(mut self, enabled: bool) -> Self {
        self.area_threshold = enabled;
        self
    }

    /// Sets the minimum combined confidence of a retained change.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Sets the base seed. Block `i` of a tile draws from `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Accessors ---

    /// Returns the number of bootstrap permutations.
    pub fn n_bootstraps(&self) -> usize {
        self.n_bootstraps
    }

    /// Returns the historical period, if any.
    pub fn period(&self) -> Option<&HistoricalPeriod> {
        self.period.as_ref()
    }

    /// Returns whether the noise floor is applied.
    pub fn area_threshold(&self) -> bool {
        self.area_threshold
    }

    /// Returns the confidence threshold.
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Returns the base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates this configuration.
    ///
    /// Requires at least one bootstrap permutation and a finite confidence
    /// threshold in `[0, 1]`.
    pub fn validate(&self) -> Result<(), TileError> {
        if self.n_bootstraps == 0 {
            return Err(TileError::InvalidConfig {
                reason: "n_bootstraps must be at least 1".to_string(),
            });
        }
        let t = self.confidence_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(TileError::InvalidConfig {
                reason: format!("confidence_threshold must be in [0, 1], got {t}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cusum_calendar::NaiveDate;

    #[test]
    fn defaults() {
        let p = TileParams::new();
        assert_eq!(p.n_bootstraps(), 1000);
        assert!(p.period().is_none());
        assert!(!p.area_threshold());
        assert_eq!(p.confidence_threshold(), 0.15);
        assert_eq!(p.seed(), 0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let period = HistoricalPeriod::new(
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        )
        .unwrap();
        let p = TileParams::new()
            .with_n_bootstraps(10)
            .with_period(period)
            .with_area_threshold(true)
            .with_confidence_threshold(0.5)
            .with_seed(3);
        assert_eq!(p.n_bootstraps(), 10);
        assert_eq!(p.period(), Some(&period));
        assert!(p.area_threshold());
        assert_eq!(p.confidence_threshold(), 0.5);
        assert_eq!(p.seed(), 3);
    }

    #[test]
    fn rejects_zero_bootstraps() {
        let err = TileParams::new().with_n_bootstraps(0).validate().unwrap_err();
        assert!(err.to_string().contains("n_bootstraps"));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        for t in [-0.1, 1.1, f32::NAN] {
            let err = TileParams::new()
                .with_confidence_threshold(t)
                .validate()
                .unwrap_err();
            assert!(matches!(err, TileError::InvalidConfig { .. }));
        }
    }

    #[test]
    fn threshold_bounds_are_valid() {
        for t in [0.0, 1.0] {
            assert!(TileParams::new().with_confidence_threshold(t).validate().is_ok());
        }
    }
}
