//! Adaptive stationarity-gated blend weighting.
//!
//! For every timestep `t` of a sequence, a weight pair (α, β) with α + β = 1
//! blends the current observation with the previous one:
//!
//! ```text
//! output[t] = α · x[t] + β · x[t-1]
//! ```
//!
//! The pair is chosen by a rolling rule. The median of `x[t-3..t]` is appended
//! to an ever-growing [`History`]. Once the History is longer than the
//! configured window W, the median is compared against the q-quantile of the
//! preceding W − 1 History entries, and a unit-root test on the same
//! three-point window decides whether the window is stationary. Only a
//! stationary window whose median exceeds the threshold moves weight to the
//! current observation.
//!
//! # Components
//!
//! - [`StationarityTester`] / [`AdfTester`] — window → (statistic, p-value)
//! - [`History`] — append-only store of smoothed statistics
//! - [`dynamic_threshold`] — trailing quantile excluding the newest entry
//! - [`WeightPolicy`] — the per-step state machine
//! - [`Scorer`] — drives a full left-to-right pass

mod history;
mod policy;
mod scorer;
mod tester;
mod threshold;

pub use history::History;
pub use policy::{StepDecision, WeightPair, WeightPolicy, WeightState, WARM_UP};
pub use scorer::{score, ScoreReport, Scorer, StepTrace};
pub use tester::{AdfTester, StationarityTester, TestOutcome};
pub use threshold::dynamic_threshold;
