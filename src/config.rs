//! Scoring configuration.
//!
//! A [`Config`] is fixed for the lifetime of one scoring run. Missing keys in
//! a serialized document fall back to the defaults:
//!
//! | key            | default | meaning                                        |
//! |----------------|---------|------------------------------------------------|
//! | `window_size`  | 100     | trailing History window for the threshold (W)  |
//! | `quantile`     | 0.75    | quantile level of the threshold (q)            |
//! | `epsilon`      | 1e-7    | floor on \|smoothed statistic\| in alpha       |
//! | `significance` | 0.05    | p-value below which a window is stationary     |
//!
//! # Examples
//!
//! ```
//! use u_adaptive_blend::config::Config;
//!
//! let config = Config::default().with_window_size(20).with_quantile(0.9);
//! assert!(config.validate().is_ok());
//! assert!(Config::default().with_quantile(1.5).validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default trailing window size W.
pub const DEFAULT_WINDOW_SIZE: usize = 100;
/// Default quantile level q.
pub const DEFAULT_QUANTILE: f64 = 0.75;
/// Default epsilon ε.
pub const DEFAULT_EPSILON: f64 = 1e-7;
/// Default significance level of the stationarity decision.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Parameters of one scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size W of the trailing History window used for the dynamic threshold.
    pub window_size: usize,
    /// Quantile level q in [0, 1].
    pub quantile: f64,
    /// Floor used to avoid dividing by a near-zero smoothed statistic.
    pub epsilon: f64,
    /// A window is treated as stationary when its p-value is below this.
    pub significance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            quantile: DEFAULT_QUANTILE,
            epsilon: DEFAULT_EPSILON,
            significance: DEFAULT_SIGNIFICANCE,
        }
    }
}

impl Config {
    /// Sets the trailing window size W.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Sets the quantile level q.
    pub fn with_quantile(mut self, quantile: f64) -> Self {
        self.quantile = quantile;
        self
    }

    /// Sets the epsilon floor.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the significance level.
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Checks every parameter.
    ///
    /// `window_size` must be at least 2 so that the threshold window, which
    /// drops the newest entry, is never empty.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(Error::InvalidWindowSize {
                got: self.window_size,
            });
        }
        if !self.quantile.is_finite() || !(0.0..=1.0).contains(&self.quantile) {
            return Err(Error::InvalidQuantile { got: self.quantile });
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidEpsilon { got: self.epsilon });
        }
        if !self.significance.is_finite() || self.significance <= 0.0 || self.significance >= 1.0
        {
            return Err(Error::InvalidSignificance {
                got: self.significance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.window_size, 100);
        assert_eq!(c.quantile, 0.75);
        assert_eq!(c.epsilon, 1e-7);
        assert_eq!(c.significance, 0.05);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builders_set_fields() {
        let c = Config::default()
            .with_window_size(10)
            .with_quantile(0.5)
            .with_epsilon(1e-3)
            .with_significance(0.01);
        assert_eq!(c.window_size, 10);
        assert_eq!(c.quantile, 0.5);
        assert_eq!(c.epsilon, 1e-3);
        assert_eq!(c.significance, 0.01);
    }

    #[test]
    fn invalid_window_size() {
        for w in [0, 1] {
            assert_eq!(
                Config::default().with_window_size(w).validate(),
                Err(Error::InvalidWindowSize { got: w })
            );
        }
        assert!(Config::default().with_window_size(2).validate().is_ok());
    }

    #[test]
    fn invalid_quantile() {
        for q in [-0.1, 1.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Config::default().with_quantile(q).validate(),
                Err(Error::InvalidQuantile { .. })
            ));
        }
        // Endpoints are allowed.
        assert!(Config::default().with_quantile(0.0).validate().is_ok());
        assert!(Config::default().with_quantile(1.0).validate().is_ok());
    }

    #[test]
    fn invalid_epsilon() {
        for e in [0.0, -1e-7, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Config::default().with_epsilon(e).validate(),
                Err(Error::InvalidEpsilon { .. })
            ));
        }
    }

    #[test]
    fn invalid_significance() {
        for s in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                Config::default().with_significance(s).validate(),
                Err(Error::InvalidSignificance { .. })
            ));
        }
    }

    #[test]
    fn partial_json_uses_defaults() {
        let c: Config = serde_json::from_str(r#"{"window_size": 10}"#).expect("valid json");
        assert_eq!(c.window_size, 10);
        assert_eq!(c.quantile, 0.75);
        assert_eq!(c.epsilon, 1e-7);
        assert_eq!(c.significance, 0.05);
    }

    #[test]
    fn json_round_trip() {
        let c = Config::default().with_window_size(42).with_quantile(0.9);
        let text = serde_json::to_string(&c).expect("serializable");
        let back: Config = serde_json::from_str(&text).expect("deserializable");
        assert_eq!(c, back);
    }

    #[test]
    fn negative_window_size_rejected_by_deserializer() {
        let r: std::result::Result<Config, _> = serde_json::from_str(r#"{"window_size": -5}"#);
        assert!(r.is_err());
    }
}
