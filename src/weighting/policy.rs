//! Per-timestep weight decision.
//!
//! # State machine
//!
//! With h the History length before step `t` appends its entry (h = t − 3):
//!
//! | state                | condition          | weights                 |
//! |----------------------|--------------------|-------------------------|
//! | warm-up              | t < 3              | (0.5, 0.5)              |
//! | insufficient history | t ≥ 3, h ≤ W       | (0.5, 0.5), entry kept  |
//! | thresholded          | t ≥ 3, h > W       | decision rule           |
//!
//! Decision rule: with `s = median(x[t-3..t])`, τ the dynamic threshold and
//! `p` the p-value of the window's unit-root test,
//!
//! ```text
//! s > τ and p < significance  →  α = |s| / max(|s|, ε),  β = 1 − α
//! otherwise                   →  α = 0,                  β = 1
//! ```

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use super::history::History;
use super::tester::{StationarityTester, TestOutcome};
use super::threshold::dynamic_threshold;
use crate::config::Config;

/// Number of leading timesteps that never receive a computed weight.
pub const WARM_UP: usize = 3;

/// Blend coefficients applied to the current and previous observation.
///
/// `alpha + beta == 1` for every pair produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    /// Weight on the current observation x[t].
    pub alpha: f64,
    /// Weight on the previous observation x[t-1].
    pub beta: f64,
}

impl WeightPair {
    /// Equal weights, used before the threshold is defined.
    pub const NEUTRAL: Self = Self {
        alpha: 0.5,
        beta: 0.5,
    };

    /// All weight on the previous observation.
    pub const PREVIOUS: Self = Self {
        alpha: 0.0,
        beta: 1.0,
    };

    /// Builds the pair `(alpha, 1 - alpha)`.
    pub fn from_alpha(alpha: f64) -> Self {
        Self {
            alpha,
            beta: 1.0 - alpha,
        }
    }

    /// `alpha * current + beta * previous`.
    pub fn blend(&self, current: f64, previous: f64) -> f64 {
        self.alpha * current + self.beta * previous
    }
}

/// Which branch of the state machine produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightState {
    /// t < 3: no full window yet.
    WarmUp,
    /// History not yet longer than the window size.
    InsufficientHistory,
    /// Decision rule applied against the dynamic threshold.
    Thresholded,
}

/// Everything the policy computed for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDecision {
    /// Branch of the state machine taken.
    pub state: WeightState,
    /// Weight pair for this timestep.
    pub weights: WeightPair,
    /// Median of the three preceding observations; `None` during warm-up.
    pub smooth_stat: Option<f64>,
    /// Unit-root test outcome; only computed in the thresholded state.
    pub test: Option<TestOutcome>,
    /// Dynamic threshold τ; only computed in the thresholded state.
    pub threshold: Option<f64>,
}

impl StepDecision {
    fn warm_up() -> Self {
        Self {
            state: WeightState::WarmUp,
            weights: WeightPair::NEUTRAL,
            smooth_stat: None,
            test: None,
            threshold: None,
        }
    }
}

/// Decides the weight pair of each timestep.
///
/// The policy holds no state of its own. The run's [`History`] is passed in
/// by mutable reference and grows by one entry for every `t >= 3`, whichever
/// branch is taken.
#[derive(Debug)]
pub struct WeightPolicy<'a, T: ?Sized> {
    config: &'a Config,
    tester: &'a T,
}

impl<'a, T> WeightPolicy<'a, T>
where
    T: StationarityTester + ?Sized,
{
    /// Creates a policy over a validated config and a tester.
    pub fn new(config: &'a Config, tester: &'a T) -> Self {
        Self { config, tester }
    }

    /// Decides the weights for timestep `t` of `data`.
    ///
    /// Steps must be presented in increasing `t` with one shared `history`
    /// per run.
    ///
    /// # Returns
    ///
    /// `None` if `t >= data.len()` or the window `data[t-3..t]` holds a
    /// non-finite value. The History is left untouched in that case.
    pub fn decide(&self, data: &[f64], t: usize, history: &mut History) -> Option<StepDecision> {
        self.decide_with(data, t, history, |window| self.tester.test(window))
    }

    /// Like [`decide`](Self::decide), with the unit-root test supplied by
    /// `run_test`. Used to feed precomputed outcomes.
    pub(crate) fn decide_with<F>(
        &self,
        data: &[f64],
        t: usize,
        history: &mut History,
        run_test: F,
    ) -> Option<StepDecision>
    where
        F: FnOnce(&[f64]) -> TestOutcome,
    {
        if t >= data.len() {
            return None;
        }
        if t < WARM_UP {
            return Some(StepDecision::warm_up());
        }

        let window = &data[t - WARM_UP..t];
        if window.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let smooth_stat = stats::median(window)?;
        let prior_len = history.len();
        history.append(smooth_stat);

        let threshold = if prior_len > self.config.window_size {
            dynamic_threshold(history, self.config.window_size, self.config.quantile)
        } else {
            None
        };

        let Some(tau) = threshold else {
            return Some(StepDecision {
                state: WeightState::InsufficientHistory,
                weights: WeightPair::NEUTRAL,
                smooth_stat: Some(smooth_stat),
                test: None,
                threshold: None,
            });
        };

        let outcome = run_test(window);
        let weights = if smooth_stat > tau && outcome.is_stationary(self.config.significance) {
            let magnitude = smooth_stat.abs();
            WeightPair::from_alpha(magnitude / magnitude.max(self.config.epsilon))
        } else {
            WeightPair::PREVIOUS
        };

        Some(StepDecision {
            state: WeightState::Thresholded,
            weights,
            smooth_stat: Some(smooth_stat),
            test: Some(outcome),
            threshold: Some(tau),
        })
    }
}
