//! Unit-root hypothesis testing.
//!
//! Augmented Dickey-Fuller (ADF) regression with MacKinnon approximate
//! p-values. H₀: the series has a unit root (non-stationary); a small p-value
//! rejects H₀ in favour of stationarity.
//!
//! # Examples
//!
//! ```
//! use u_adaptive_blend::testing::{adf_test, AdfModel};
//!
//! // Logistic map in its chaotic regime: bounded and mean-reverting.
//! let mut data = vec![0.3_f64];
//! for _ in 1..60 {
//!     let x = data[data.len() - 1];
//!     data.push(3.9 * x * (1.0 - x));
//! }
//! let r = adf_test(&data, AdfModel::Constant, None).unwrap();
//! assert!(r.p_value < 0.05);
//! ```

use u_numflow::special;

/// Result of the Augmented Dickey-Fuller (ADF) unit root test.
#[derive(Debug, Clone)]
pub struct AdfResult {
    /// ADF test statistic (t-ratio for γ̂).
    pub statistic: f64,
    /// MacKinnon (1994) approximate p-value for H₀: unit root.
    pub p_value: f64,
    /// Number of lagged differences in the regression.
    pub n_lags: usize,
    /// Number of observations used in the regression.
    pub n_obs: usize,
    /// Critical values at 1%, 5%, 10% significance levels.
    pub critical_values: [f64; 3],
    /// Whether the null hypothesis (unit root) is rejected at each level.
    pub rejected: [bool; 3],
}

/// Deterministic terms of the ADF regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdfModel {
    /// No constant, no trend: Δyₜ = γyₜ₋₁ + Σδᵢ·Δyₜ₋ᵢ + εₜ
    None,
    /// Constant only (default): Δyₜ = α + γyₜ₋₁ + Σδᵢ·Δyₜ₋ᵢ + εₜ
    Constant,
    /// Constant + linear trend: Δyₜ = α + βt + γyₜ₋₁ + Σδᵢ·Δyₜ₋ᵢ + εₜ
    ConstantTrend,
}

impl AdfModel {
    fn n_deterministic(self) -> usize {
        match self {
            AdfModel::None => 0,
            AdfModel::Constant => 1,
            AdfModel::ConstantTrend => 2,
        }
    }
}

/// Augmented Dickey-Fuller test with automatic lag selection.
///
/// # Algorithm
///
/// 1. Constructs Δyₜ = α + γyₜ₋₁ + Σδᵢ·Δyₜ₋ᵢ + εₜ
/// 2. Estimates via OLS
/// 3. Compares the t-ratio for γ with Dickey-Fuller critical values and
///    maps it to a MacKinnon p-value
///
/// When `max_lags` is `None`, lag length is selected by AIC (Schwert rule
/// for maximum). When `Some(p)`, exactly `p` lags are used.
///
/// Reference: Dickey & Fuller (1979), "Distribution of the Estimators for
/// Autoregressive Time Series with a Unit Root"
///
/// # Returns
///
/// `None` if fewer than 10 data points, non-finite values, or OLS fails.
pub fn adf_test(data: &[f64], model: AdfModel, max_lags: Option<usize>) -> Option<AdfResult> {
    let n = data.len();
    if n < 10 || data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let dy = differences(data);
    let lags = match max_lags {
        Some(p) => p,
        None => {
            // Schwert (1989) rule for maximum lag
            let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
            select_lag(data, &dy, model, schwert.min(n / 3))
        }
    };

    let design = DesignMatrix::build(data, &dy, model, lags, MIN_RESIDUAL_DF_AUTO)?;
    design.result(model)
}

/// Augmented Dickey-Fuller test with a fixed lag count and no minimum length.
///
/// Intended for short rolling windows. The regression only needs one
/// residual degree of freedom, so for the constant model with no lags four
/// points are the minimum; shorter windows return `None`.
///
/// # Returns
///
/// `None` if the data contains non-finite values, leaves no residual degree
/// of freedom, or the regression is singular (e.g. a constant window).
///
/// # Examples
///
/// ```
/// use u_adaptive_blend::testing::{adf_test_fixed, AdfModel};
///
/// // Three points and two coefficients: no residual degree of freedom.
/// assert!(adf_test_fixed(&[1.0, 3.0, 2.0], AdfModel::Constant, 0).is_none());
/// // Zero variance: singular design.
/// assert!(adf_test_fixed(&[4.0; 8], AdfModel::Constant, 0).is_none());
/// ```
pub fn adf_test_fixed(data: &[f64], model: AdfModel, lags: usize) -> Option<AdfResult> {
    if data.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let dy = differences(data);
    let design = DesignMatrix::build(data, &dy, model, lags, 1)?;
    design.result(model)
}

/// Residual degrees of freedom required by the automatic-lag test.
const MIN_RESIDUAL_DF_AUTO: usize = 5;

fn differences(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Selects the lag count minimizing AIC.
fn select_lag(data: &[f64], dy: &[f64], model: AdfModel, p_max: usize) -> usize {
    let mut best_aic = f64::INFINITY;
    let mut best_p = 0;

    for p in 0..=p_max {
        let Some(design) = DesignMatrix::build(data, dy, model, p, MIN_RESIDUAL_DF_AUTO) else {
            continue;
        };
        if let Some(fit) = design.fit() {
            let m = design.rows as f64;
            let aic = 2.0 * design.cols as f64 + m * (fit.rss / m).ln();
            if aic < best_aic {
                best_aic = aic;
                best_p = p;
            }
        }
    }

    best_p
}

/// Row-major ADF design matrix with its dependent variable.
struct DesignMatrix {
    x: Vec<f64>,
    y: Vec<f64>,
    rows: usize,
    cols: usize,
    lags: usize,
    gamma_col: usize,
}

/// Least-squares coefficients of the ADF regression.
struct OlsFit {
    gamma_t: f64,
    rss: f64,
}

impl DesignMatrix {
    /// Pairs Δyₜ with yₜ₋₁, the deterministic terms and `p` lagged
    /// differences. Requires at least `min_residual_df` rows beyond the
    /// column count.
    fn build(
        data: &[f64],
        dy: &[f64],
        model: AdfModel,
        p: usize,
        min_residual_df: usize,
    ) -> Option<Self> {
        if p >= dy.len() {
            return None;
        }
        let rows = dy.len() - p;
        let det = model.n_deterministic();
        let cols = det + 1 + p;
        if rows < cols + min_residual_df {
            return None;
        }

        let mut x = Vec::with_capacity(rows * cols);
        for t in p..dy.len() {
            if det >= 1 {
                x.push(1.0);
            }
            if det == 2 {
                x.push((t + 1) as f64);
            }
            x.push(data[t]); // y_{t-1} for Δy_t = data[t+1] - data[t]
            for lag in 1..=p {
                x.push(dy[t - lag]);
            }
        }

        Some(Self {
            x,
            y: dy[p..].to_vec(),
            rows,
            cols,
            lags: p,
            gamma_col: det,
        })
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.x[i * self.cols..(i + 1) * self.cols]
    }

    /// Solves X'Xβ = X'y and returns the t-ratio of γ̂ and the RSS.
    fn fit(&self) -> Option<OlsFit> {
        let k = self.cols;

        let mut xtx = vec![0.0_f64; k * k];
        let mut xty = vec![0.0_f64; k];
        for i in 0..self.rows {
            let row = self.row(i);
            for j in 0..k {
                for l in j..k {
                    xtx[j * k + l] += row[j] * row[l];
                }
                xty[j] += row[j] * self.y[i];
            }
        }
        for j in 0..k {
            for l in (j + 1)..k {
                xtx[l * k + j] = xtx[j * k + l];
            }
        }

        let inverse = invert(&xtx, k)?;
        let beta: Vec<f64> = (0..k)
            .map(|j| (0..k).map(|l| inverse[j * k + l] * xty[l]).sum())
            .collect();

        let rss: f64 = (0..self.rows)
            .map(|i| {
                let y_hat: f64 = self.row(i).iter().zip(&beta).map(|(&x, &b)| x * b).sum();
                let resid = self.y[i] - y_hat;
                resid * resid
            })
            .sum();

        let df = self.rows - k;
        if df == 0 {
            return None;
        }
        let var_gamma = rss / df as f64 * inverse[self.gamma_col * k + self.gamma_col];
        if !(var_gamma.is_finite() && var_gamma > 0.0) {
            return None;
        }
        let gamma_t = beta[self.gamma_col] / var_gamma.sqrt();

        Some(OlsFit { gamma_t, rss })
    }

    fn result(&self, model: AdfModel) -> Option<AdfResult> {
        let fit = self.fit()?;
        let critical_values = adf_critical_values(model, self.rows);
        let rejected = [
            fit.gamma_t <= critical_values[0],
            fit.gamma_t <= critical_values[1],
            fit.gamma_t <= critical_values[2],
        ];

        Some(AdfResult {
            statistic: fit.gamma_t,
            p_value: mackinnon_p_value(fit.gamma_t, model),
            n_lags: self.lags,
            n_obs: self.rows,
            critical_values,
            rejected,
        })
    }
}

/// Inverts a k × k matrix by Gauss-Jordan elimination with partial pivoting.
///
/// Returns `None` when a pivot falls below 1e-12 relative to the largest
/// diagonal entry.
fn invert(a: &[f64], k: usize) -> Option<Vec<f64>> {
    let w = 2 * k;
    let mut aug = vec![0.0_f64; k * w];
    for i in 0..k {
        aug[i * w..i * w + k].copy_from_slice(&a[i * k..(i + 1) * k]);
        aug[i * w + k + i] = 1.0;
    }

    let scale = (0..k).map(|i| a[i * k + i].abs()).fold(0.0_f64, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tol = 1e-12 * scale;

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| aug[r1 * w + col].abs().total_cmp(&aug[r2 * w + col].abs()))?;
        if aug[pivot_row * w + col].abs() < tol {
            return None;
        }
        if pivot_row != col {
            for j in 0..w {
                aug.swap(col * w + j, pivot_row * w + j);
            }
        }

        let pivot = aug[col * w + col];
        for j in 0..w {
            aug[col * w + j] /= pivot;
        }
        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = aug[row * w + col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..w {
                aug[row * w + j] -= factor * aug[col * w + j];
            }
        }
    }

    let mut inverse = vec![0.0_f64; k * k];
    for i in 0..k {
        inverse[i * k..(i + 1) * k].copy_from_slice(&aug[i * w + k..(i + 1) * w]);
    }
    Some(inverse)
}

/// MacKinnon (1994) critical values for ADF test.
///
/// Returns [1%, 5%, 10%] critical values based on sample size.
fn adf_critical_values(model: AdfModel, n: usize) -> [f64; 3] {
    // cv(n) = τ_∞ + τ₁/n + τ₂/n², coefficients from MacKinnon (2010), Table 1.
    let (tau_inf, tau1, tau2): ([f64; 3], [f64; 3], [f64; 3]) = match model {
        AdfModel::None => (
            [-2.5658, -1.9393, -1.6156],
            [-1.960, -0.398, -0.181],
            [-10.04, 0.0, 0.0],
        ),
        AdfModel::Constant => (
            [-3.4336, -2.8621, -2.5671],
            [-5.999, -2.738, -1.438],
            [-29.25, -8.36, -4.48],
        ),
        AdfModel::ConstantTrend => (
            [-3.9638, -3.4126, -3.1279],
            [-8.353, -4.039, -2.418],
            [-47.44, -17.83, -7.58],
        ),
    };

    let inv_n = 1.0 / n as f64;
    let inv_n2 = inv_n * inv_n;
    std::array::from_fn(|i| tau_inf[i] + tau1[i] * inv_n + tau2[i] * inv_n2)
}

/// MacKinnon (1994) approximate asymptotic p-value for an ADF statistic.
///
/// The statistic is mapped through a cubic (upper region) or quadratic
/// (lower region) polynomial and then through Φ. Statistics above τ_max
/// give 1.0; statistics below τ_min give 0.0. Non-finite statistics give
/// 1.0.
///
/// Reference: MacKinnon, J.G. (1994). "Approximate Asymptotic Distribution
/// Functions for Unit-Root and Cointegration Tests", *Journal of Business &
/// Economic Statistics* 12(2), pp. 167-176.
///
/// # Examples
///
/// ```
/// use u_adaptive_blend::testing::{mackinnon_p_value, AdfModel};
///
/// let p = mackinnon_p_value(-2.86, AdfModel::Constant);
/// assert!((p - 0.05).abs() < 0.005);
/// ```
pub fn mackinnon_p_value(statistic: f64, model: AdfModel) -> f64 {
    if !statistic.is_finite() {
        return if statistic == f64::NEG_INFINITY { 0.0 } else { 1.0 };
    }

    // (τ_max, τ_min, τ*, small-p coefficients, large-p coefficients), one series.
    let (tau_max, tau_min, tau_star, small, large): (f64, f64, f64, [f64; 3], [f64; 4]) =
        match model {
            AdfModel::None => (
                f64::INFINITY,
                -19.04,
                -1.04,
                [0.6344, 1.2378, 0.032496],
                [0.4797, 0.93557, -0.06999, 0.033066],
            ),
            AdfModel::Constant => (
                2.74,
                -18.83,
                -1.61,
                [2.1659, 1.4412, 0.038269],
                [1.7339, 0.93202, -0.12745, -0.010368],
            ),
            AdfModel::ConstantTrend => (
                0.7,
                -16.18,
                -2.89,
                [3.2512, 1.6047, 0.049588],
                [2.5261, 0.61654, -0.37956, -0.060285],
            ),
        };

    if statistic > tau_max {
        return 1.0;
    }
    if statistic < tau_min {
        return 0.0;
    }

    let z = if statistic <= tau_star {
        polyval(&small, statistic)
    } else {
        polyval(&large, statistic)
    };
    special::standard_normal_cdf(z).clamp(0.0, 1.0)
}

/// Evaluates c₀ + c₁x + c₂x² + … by Horner's rule.
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn adf_p_bounded(
            data in proptest::collection::vec(-1e3_f64..1e3, 10..=60)
        ) {
            if let Some(r) = adf_test(&data, AdfModel::Constant, None) {
                prop_assert!(r.p_value >= 0.0 && r.p_value <= 1.0, "p = {}", r.p_value);
                prop_assert!(r.statistic.is_finite());
            }
        }

        #[test]
        fn fixed_p_bounded(
            data in proptest::collection::vec(-1e3_f64..1e3, 3..=12)
        ) {
            if let Some(r) = adf_test_fixed(&data, AdfModel::Constant, 0) {
                prop_assert!(r.p_value >= 0.0 && r.p_value <= 1.0, "p = {}", r.p_value);
            }
        }

        #[test]
        fn mackinnon_p_bounded(stat in -30.0_f64..10.0) {
            for model in [AdfModel::None, AdfModel::Constant, AdfModel::ConstantTrend] {
                let p = mackinnon_p_value(stat, model);
                prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
            }
        }
    }
}
