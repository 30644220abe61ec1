//! # u-adaptive-blend
//!
//! Adaptive, stationarity-gated blend weighting for time series.
//!
//! For each point of a numeric sequence this crate computes a weight pair
//! (α, β), α + β = 1, that mixes the current observation with the previous
//! one. The pair is driven by a unit-root test over a three-point rolling
//! window and a self-adjusting quantile threshold over the history of
//! smoothed (median) statistics. The resulting output emphasizes
//! changepoints and anomalies.
//!
//! The crate is domain-agnostic: it operates on raw `f64` slices and knows
//! nothing about where the data came from or how scores are evaluated.
//!
//! ## Modules
//!
//! - [`weighting`] — History, dynamic threshold, weight policy and scorer
//! - [`testing`] — Augmented Dickey-Fuller test with MacKinnon p-values
//! - [`config`] — Run parameters (window size, quantile, epsilon, significance)
//! - [`error`] — Configuration and input errors
//!
//! ## Example
//!
//! ```
//! use u_adaptive_blend::config::Config;
//! use u_adaptive_blend::weighting::Scorer;
//!
//! let data: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin()).collect();
//! let scorer = Scorer::new(Config::default()).unwrap();
//! let output = scorer.score(&data).unwrap();
//! assert_eq!(output.len(), data.len());
//! ```
//!
//! ## Features
//!
//! - `parallel` — `Scorer::score_parallel`, running the per-window
//!   stationarity tests on the rayon thread pool

pub mod config;
pub mod error;
pub mod testing;
pub mod weighting;
