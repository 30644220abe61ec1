//! Full left-to-right scoring pass.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::history::History;
use super::policy::{StepDecision, WeightPair, WeightPolicy, WeightState, WARM_UP};
use super::tester::{AdfTester, StationarityTester, TestOutcome};
use crate::config::Config;
use crate::error::{Error, Result};

/// Output value of the warm-up timesteps.
const WARM_UP_OUTPUT: f64 = 0.0;

/// Scores sequences with a fixed [`Config`] and stationarity tester.
///
/// Each call to [`score`](Self::score) is an independent run: it owns a
/// fresh [`History`] that is dropped when the run ends, so one scorer can be
/// reused across sequences without any state leaking between them.
///
/// # Examples
///
/// ```
/// use u_adaptive_blend::config::Config;
/// use u_adaptive_blend::weighting::Scorer;
///
/// let scorer = Scorer::new(Config::default().with_window_size(10)).unwrap();
/// let data = vec![5.0; 120];
/// let output = scorer.score(&data).unwrap();
///
/// assert_eq!(output.len(), data.len());
/// assert_eq!(&output[..3], &[0.0, 0.0, 0.0]);
/// assert!(output[3..].iter().all(|&v| v == 5.0));
/// ```
#[derive(Debug, Clone)]
pub struct Scorer<T = AdfTester> {
    config: Config,
    tester: T,
}

/// One timestep of a traced run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepTrace {
    /// Timestep t.
    pub index: usize,
    /// Branch of the weight state machine taken at t.
    pub state: WeightState,
    /// Weight pair applied at t.
    pub weights: WeightPair,
    /// Median of `data[t-3..t]`; `None` during warm-up.
    pub smooth_stat: Option<f64>,
    /// Unit-root test statistic; set only for thresholded steps.
    pub statistic: Option<f64>,
    /// Unit-root test p-value; set only for thresholded steps.
    pub p_value: Option<f64>,
    /// Dynamic threshold τ; set only for thresholded steps.
    pub threshold: Option<f64>,
    /// Blended output value at t.
    pub output: f64,
}

/// Output sequence of a run together with its per-step trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// One blended value per input value.
    pub output: Vec<f64>,
    /// One trace entry per input value, in timestep order.
    pub steps: Vec<StepTrace>,
    /// Number of smoothed statistics accumulated during the run.
    pub history_len: usize,
}

impl ScoreReport {
    /// Indices whose weights came from the thresholded decision rule with
    /// α > 0.
    pub fn emphasized(&self) -> Vec<usize> {
        self.steps
            .iter()
            .filter(|s| s.state == WeightState::Thresholded && s.weights.alpha > 0.0)
            .map(|s| s.index)
            .collect()
    }
}

impl Scorer<AdfTester> {
    /// Creates a scorer using the default ADF tester.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found by [`Config::validate`].
    pub fn new(config: Config) -> Result<Self> {
        Self::with_tester(config, AdfTester::default())
    }
}

impl<T: StationarityTester> Scorer<T> {
    /// Creates a scorer with a custom stationarity tester.
    pub fn with_tester(config: Config, tester: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tester })
    }

    /// Validated run parameters.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stationarity tester applied to each window.
    pub fn tester(&self) -> &T {
        &self.tester
    }

    /// Scores `data`, returning one output per input value.
    ///
    /// Indices `0..3` are 0.0; every later index is
    /// `alpha * data[t] + beta * data[t-1]`.
    ///
    /// # Errors
    ///
    /// [`Error::NonFiniteInput`] if `data` holds NaN or an infinity.
    pub fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        let mut output = Vec::with_capacity(data.len());
        self.run(data, None, |step| output.push(step.output))?;
        Ok(output)
    }

    /// Scores `data` and records every intermediate quantity.
    pub fn score_with_trace(&self, data: &[f64]) -> Result<ScoreReport> {
        let mut steps = Vec::with_capacity(data.len());
        let history_len = self.run(data, None, |step| steps.push(step))?;
        Ok(ScoreReport {
            output: steps.iter().map(|s| s.output).collect(),
            steps,
            history_len,
        })
    }

    /// First timestep that can reach the thresholded state.
    fn first_thresholded(&self) -> usize {
        WARM_UP
            .saturating_add(self.config.window_size)
            .saturating_add(1)
    }

    /// Runs one pass, handing each step to `sink`. Returns the final
    /// History length.
    ///
    /// `precomputed[i]` replaces the tester call at timestep
    /// `first_thresholded() + i`.
    fn run<F>(&self, data: &[f64], precomputed: Option<&[TestOutcome]>, mut sink: F) -> Result<usize>
    where
        F: FnMut(StepTrace),
    {
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteInput { index });
        }

        let policy = WeightPolicy::new(&self.config, &self.tester);
        let mut history = History::with_capacity(data.len().saturating_sub(WARM_UP));
        let first_thresholded = self.first_thresholded();
        let mut thresholded = 0_usize;

        for t in 0..data.len() {
            let decision = match precomputed {
                Some(outcomes) => policy.decide_with(data, t, &mut history, |_| {
                    outcomes[t - first_thresholded]
                }),
                None => policy.decide(data, t, &mut history),
            }
            .ok_or(Error::NonFiniteInput { index: t })?;

            let output = if t < WARM_UP {
                WARM_UP_OUTPUT
            } else {
                decision.weights.blend(data[t], data[t - 1])
            };

            if decision.state == WeightState::Thresholded {
                thresholded += 1;
                trace!(
                    index = t,
                    smooth_stat = ?decision.smooth_stat,
                    threshold = ?decision.threshold,
                    p_value = ?decision.test.map(|o| o.p_value),
                    alpha = decision.weights.alpha,
                    "thresholded step"
                );
            }

            sink(step_trace(t, &decision, output));
        }

        debug!(
            len = data.len(),
            window_size = self.config.window_size,
            quantile = self.config.quantile,
            thresholded,
            history_len = history.len(),
            "scoring run complete"
        );

        Ok(history.len())
    }
}

#[cfg(feature = "parallel")]
impl<T: StationarityTester + Sync> Scorer<T> {
    /// Scores `data` with the stationarity tests run in parallel.
    ///
    /// The tests for all thresholded timesteps are computed up front with
    /// rayon; History appends and threshold comparisons are then applied
    /// serially in timestep order. The output is bit-identical to
    /// [`score`](Self::score).
    pub fn score_parallel(&self, data: &[f64]) -> Result<Vec<f64>> {
        use rayon::prelude::*;

        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteInput { index });
        }

        let start = self.first_thresholded().min(data.len());
        let outcomes: Vec<TestOutcome> = (start..data.len())
            .into_par_iter()
            .map(|t| self.tester.test(&data[t - WARM_UP..t]))
            .collect();

        let mut output = Vec::with_capacity(data.len());
        self.run(data, Some(&outcomes), |step| output.push(step.output))?;
        Ok(output)
    }
}

fn step_trace(index: usize, decision: &StepDecision, output: f64) -> StepTrace {
    StepTrace {
        index,
        state: decision.state,
        weights: decision.weights,
        smooth_stat: decision.smooth_stat,
        statistic: decision.test.map(|o| o.statistic),
        p_value: decision.test.map(|o| o.p_value),
        threshold: decision.threshold,
        output,
    }
}

/// Scores `data` with the default ADF tester.
///
/// # Examples
///
/// ```
/// use u_adaptive_blend::config::Config;
/// use u_adaptive_blend::weighting::score;
///
/// let output = score(&[1.0, 2.0, 3.0], &Config::default()).unwrap();
/// assert_eq!(output, vec![0.0, 0.0, 0.0]);
/// ```
pub fn score(data: &[f64], config: &Config) -> Result<Vec<f64>> {
    Scorer::new(*config)?.score(data)
}
