//! Dynamic quantile threshold over the trailing History.

use u_numflow::stats;

use super::history::History;

/// Computes τ, the `quantile`-level quantile of the `window_size - 1`
/// History entries immediately preceding the newest one.
///
/// The newest entry is excluded so that the current smoothed statistic never
/// influences the threshold it is compared against. Quantiles use R-7 linear
/// interpolation between order statistics (`h = (n − 1)·q`).
///
/// # Returns
///
/// `None` unless `history.len() > window_size`, or if `window_size < 2`
/// (empty window) or `quantile` lies outside [0, 1].
///
/// # Examples
///
/// ```
/// use u_adaptive_blend::weighting::{dynamic_threshold, History};
///
/// let mut h = History::new();
/// for v in [2.0, 3.0, 4.0, 5.0, 6.0] {
///     h.append(v);
/// }
/// // quantile of [4, 5] at 0.75
/// assert_eq!(dynamic_threshold(&h, 3, 0.75), Some(4.75));
/// assert_eq!(dynamic_threshold(&h, 5, 0.75), None);
/// ```
pub fn dynamic_threshold(history: &History, window_size: usize, quantile: f64) -> Option<f64> {
    if history.len() <= window_size {
        return None;
    }
    stats::quantile(history.trailing_window(window_size, true), quantile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[f64]) -> History {
        let mut h = History::new();
        for &v in values {
            h.append(v);
        }
        h
    }

    #[test]
    fn excludes_newest_entry() {
        // Newest entry is huge; it must not move the threshold.
        let h = filled(&[1.0, 2.0, 3.0, 4.0, 1e9]);
        assert_eq!(dynamic_threshold(&h, 4, 1.0), Some(4.0));
    }

    #[test]
    fn linear_interpolation() {
        let h = filled(&[0.0, 10.0, 20.0, 30.0, 40.0, 99.0]);
        // window [10, 20, 30, 40], h = 3 * 0.75 = 2.25 -> 30 + 0.25 * 10
        let tau = dynamic_threshold(&h, 5, 0.75).expect("defined");
        assert!((tau - 32.5).abs() < 1e-12, "tau = {}", tau);
        let median = dynamic_threshold(&h, 5, 0.5).expect("defined");
        assert!((median - 25.0).abs() < 1e-12, "median = {}", median);
    }

    #[test]
    fn unsorted_window() {
        let h = filled(&[7.0, 1.0, 5.0, 3.0, 0.0]);
        // window [1, 5, 3] sorted [1, 3, 5]
        assert_eq!(dynamic_threshold(&h, 4, 0.0), Some(1.0));
        assert_eq!(dynamic_threshold(&h, 4, 0.5), Some(3.0));
        assert_eq!(dynamic_threshold(&h, 4, 1.0), Some(5.0));
    }

    #[test]
    fn undefined_until_history_exceeds_window() {
        let h = filled(&[1.0, 2.0, 3.0]);
        assert_eq!(dynamic_threshold(&h, 3, 0.75), None);
        assert_eq!(dynamic_threshold(&h, 5, 0.75), None);
        assert!(dynamic_threshold(&h, 2, 0.75).is_some());
    }

    #[test]
    fn degenerate_parameters() {
        let h = filled(&[1.0, 2.0, 3.0]);
        assert_eq!(dynamic_threshold(&h, 1, 0.5), None);
        assert_eq!(dynamic_threshold(&h, 2, 1.5), None);
    }
}
