//! Error types.
//!
//! Only structural problems surface as errors: an invalid [`Config`] or an
//! input sequence the scorer cannot process. Numerical edge cases inside a
//! run (singular regressions, near-zero statistics) are resolved locally.
//!
//! [`Config`]: crate::config::Config

use thiserror::Error;

/// Errors raised when constructing a scorer or starting a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The threshold window must hold at least two entries.
    #[error("window_size must be at least 2, got {got}")]
    InvalidWindowSize { got: usize },

    /// The threshold quantile is outside [0, 1] or not finite.
    #[error("quantile must lie in [0, 1], got {got}")]
    InvalidQuantile { got: f64 },

    /// The soft-alpha floor is zero, negative or not finite.
    #[error("epsilon must be positive and finite, got {got}")]
    InvalidEpsilon { got: f64 },

    /// The significance level is outside the open interval (0, 1).
    #[error("significance must lie in (0, 1), got {got}")]
    InvalidSignificance { got: f64 },

    /// The input sequence holds NaN or an infinity.
    #[error("non-finite value at index {index}")]
    NonFiniteInput { index: usize },
}

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, Error>;
