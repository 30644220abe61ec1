//! Stationarity testing of short rolling windows.

use crate::testing::{adf_test_fixed, AdfModel};

/// Test statistic and p-value for H₀: the window has a unit root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    /// Test statistic; more negative is stronger evidence of stationarity.
    pub statistic: f64,
    /// Approximate p-value in [0, 1].
    pub p_value: f64,
}

impl TestOutcome {
    /// Outcome used when the regression cannot be computed.
    pub const NON_STATIONARY: Self = Self {
        statistic: 0.0,
        p_value: 1.0,
    };

    /// Whether H₀ is rejected at `significance`.
    pub fn is_stationary(&self, significance: f64) -> bool {
        self.p_value < significance
    }
}

/// A unit-root test over a short window of raw observations.
///
/// Implementations must not fail: degenerate windows (zero variance, too few
/// points for the regression) map to [`TestOutcome::NON_STATIONARY`] or an
/// equivalent outcome with p-value 1.0.
///
/// Closures `Fn(&[f64]) -> TestOutcome` implement this trait.
pub trait StationarityTester {
    fn test(&self, window: &[f64]) -> TestOutcome;
}

impl<F> StationarityTester for F
where
    F: Fn(&[f64]) -> TestOutcome,
{
    fn test(&self, window: &[f64]) -> TestOutcome {
        self(window)
    }
}

/// Augmented Dickey-Fuller tester with no lagged differences.
///
/// Any window for which [`adf_test_fixed`] returns `None` (singular design,
/// no residual degree of freedom, non-finite values) falls back to
/// [`TestOutcome::NON_STATIONARY`]. With a constant term, a three-point
/// window always takes the fallback: two differences cannot identify two
/// coefficients with a residual left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdfTester {
    model: AdfModel,
}

impl Default for AdfTester {
    fn default() -> Self {
        Self {
            model: AdfModel::Constant,
        }
    }
}

impl AdfTester {
    /// Creates a tester with the given deterministic terms.
    pub fn new(model: AdfModel) -> Self {
        Self { model }
    }

    /// Deterministic terms included in the regression.
    pub fn model(&self) -> AdfModel {
        self.model
    }
}

impl StationarityTester for AdfTester {
    fn test(&self, window: &[f64]) -> TestOutcome {
        match adf_test_fixed(window, self.model, 0) {
            Some(r) => TestOutcome {
                statistic: r.statistic,
                p_value: r.p_value,
            },
            None => TestOutcome::NON_STATIONARY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_window_falls_back() {
        let t = AdfTester::default();
        assert_eq!(t.test(&[5.0, 5.0, 5.0]), TestOutcome::NON_STATIONARY);
        assert_eq!(t.test(&[0.0; 20]), TestOutcome::NON_STATIONARY);
    }

    #[test]
    fn three_point_window_falls_back() {
        let t = AdfTester::default();
        for w in [[1.0, 2.0, 3.0], [3.0, -1.0, 2.0], [0.1, 0.5, 0.2]] {
            let o = t.test(&w);
            assert_eq!(o.p_value, 1.0, "window {:?}", w);
            assert!(!o.is_stationary(0.05));
        }
    }

    #[test]
    fn longer_alternating_window_is_stationary() {
        let t = AdfTester::default();
        let w: Vec<f64> = (0..30)
            .map(|i| (if i % 2 == 0 { 1.0 } else { -1.0 }) + 0.01 * (i % 3) as f64)
            .collect();
        let o = t.test(&w);
        assert!(o.statistic < 0.0);
        assert!(o.is_stationary(0.05), "p = {}", o.p_value);
    }

    #[test]
    fn non_finite_window_falls_back() {
        let t = AdfTester::default();
        assert_eq!(
            t.test(&[1.0, f64::NAN, 2.0, 3.0, 1.0]),
            TestOutcome::NON_STATIONARY
        );
    }

    #[test]
    fn closure_tester() {
        let always = |_: &[f64]| TestOutcome {
            statistic: -10.0,
            p_value: 0.0,
        };
        assert!(always.test(&[1.0, 2.0, 3.0]).is_stationary(0.05));
    }

    #[test]
    fn significance_is_strict() {
        let o = TestOutcome {
            statistic: -2.9,
            p_value: 0.05,
        };
        assert!(!o.is_stationary(0.05));
        assert!(o.is_stationary(0.051));
    }
}
