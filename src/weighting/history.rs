//! Append-only history of smoothed statistics.

/// Ordered, append-only sequence of smoothed statistics for one run.
///
/// Entries are indexed by arrival order. Nothing is mutated or removed once
/// appended, so the store is consistent after every completed step.
#[derive(Debug, Clone, Default)]
pub struct History {
    values: Vec<f64>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends one entry. O(1) amortized.
    pub fn append(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The most recently appended entry.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// All entries in arrival order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns the last `size` entries in arrival order, dropping the newest
    /// one when `exclude_last` is set.
    ///
    /// Equivalent to `history[-size:-1]` (or `history[-size:]`) with the
    /// usual clamping when the history holds fewer than `size` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_adaptive_blend::weighting::History;
    ///
    /// let mut h = History::new();
    /// for v in [2.0, 3.0, 4.0, 5.0, 6.0] {
    ///     h.append(v);
    /// }
    /// assert_eq!(h.trailing_window(3, true), &[4.0, 5.0]);
    /// assert_eq!(h.trailing_window(3, false), &[4.0, 5.0, 6.0]);
    /// ```
    pub fn trailing_window(&self, size: usize, exclude_last: bool) -> &[f64] {
        let len = self.values.len();
        let end = if exclude_last {
            len.saturating_sub(1)
        } else {
            len
        };
        let start = len.saturating_sub(size).min(end);
        &self.values[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[f64]) -> History {
        let mut h = History::with_capacity(values.len());
        for &v in values {
            h.append(v);
        }
        h
    }

    #[test]
    fn append_preserves_order() {
        let h = filled(&[3.0, 1.0, 2.0]);
        assert_eq!(h.len(), 3);
        assert_eq!(h.as_slice(), &[3.0, 1.0, 2.0]);
        assert_eq!(h.last(), Some(2.0));
    }

    #[test]
    fn empty_history() {
        let h = History::new();
        assert!(h.is_empty());
        assert_eq!(h.last(), None);
        assert!(h.trailing_window(5, true).is_empty());
        assert!(h.trailing_window(5, false).is_empty());
    }

    #[test]
    fn trailing_window_excluding_last() {
        let h = filled(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(h.trailing_window(4, true), &[3.0, 4.0, 5.0]);
        assert_eq!(h.trailing_window(1, true), &[] as &[f64]);
    }

    #[test]
    fn trailing_window_shorter_than_size() {
        let h = filled(&[1.0, 2.0]);
        assert_eq!(h.trailing_window(10, false), &[1.0, 2.0]);
        assert_eq!(h.trailing_window(10, true), &[1.0]);
    }

    #[test]
    fn trailing_window_zero_size() {
        let h = filled(&[1.0, 2.0]);
        assert!(h.trailing_window(0, false).is_empty());
        assert!(h.trailing_window(0, true).is_empty());
    }
}
