//! Raw per-minute increments and their cumulative trajectories.
//!
//! A [`RawSeries`] holds `iterations × minutes` non-negative increments,
//! one row per simulated iteration. [`CumulativeSeries::from_raw`] turns
//! each row into its running total over the first `horizon` minutes.
//!
//! Cell `[i][t]` of the cumulative series is the sum of increments
//! `0..=t` of iteration `i`, so every row is non-decreasing.

use crate::error::{Result, SpectraError};
use crate::stats;

/// Default horizon in minutes.
pub const DEFAULT_MAX_MINUTES: usize = 120;

/// Validated `iterations × minutes` matrix of per-minute increments.
///
/// Every row has the same length, at least one minute long, and every
/// increment is finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    rows: Vec<Vec<f64>>,
}

impl RawSeries {
    /// Validates and wraps the given rows.
    ///
    /// # Errors
    /// - [`SpectraError::EmptySeries`] if there are no rows or the rows are empty.
    /// - [`SpectraError::RaggedSeries`] if any row length differs from row 0.
    /// - [`SpectraError::InvalidIncrement`] for a negative or non-finite value.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let minutes = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(SpectraError::EmptySeries),
        };
        for (iteration, row) in rows.iter().enumerate() {
            if row.len() != minutes {
                return Err(SpectraError::RaggedSeries {
                    iteration,
                    expected: minutes,
                    found: row.len(),
                });
            }
            if let Some((minute, &value)) = row
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(SpectraError::InvalidIncrement {
                    iteration,
                    minute,
                    value,
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn iterations(&self) -> usize {
        self.rows.len()
    }

    pub fn minutes(&self) -> usize {
        self.rows[0].len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

/// Running totals of a [`RawSeries`] over a fixed horizon.
///
/// Rows may be reordered by the sampler, but their contents never change
/// once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries {
    rows: Vec<Vec<f64>>,
    minutes: usize,
}

impl CumulativeSeries {
    /// Builds running totals over `min(horizon, raw.minutes())` minutes.
    ///
    /// # Complexity
    /// Time: O(iterations × horizon), Space: O(iterations × horizon)
    ///
    /// # Errors
    /// [`SpectraError::InvalidHorizon`] if `horizon == 0`.
    ///
    /// # Examples
    /// ```
    /// use opportunity_spectra::series::{CumulativeSeries, RawSeries};
    /// let raw = RawSeries::new(vec![
    ///     vec![1.0, 2.0, 3.0],
    ///     vec![3.0, 2.0, 1.0],
    ///     vec![2.0, 2.0, 2.0],
    /// ]).unwrap();
    /// let cum = CumulativeSeries::from_raw(&raw, 3).unwrap();
    /// assert_eq!(cum.row(0), &[1.0, 3.0, 6.0]);
    /// assert_eq!(cum.row(1), &[3.0, 5.0, 6.0]);
    /// assert_eq!(cum.row(2), &[2.0, 4.0, 6.0]);
    /// ```
    pub fn from_raw(raw: &RawSeries, horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(SpectraError::InvalidHorizon);
        }
        let minutes = horizon.min(raw.minutes());
        let rows = raw
            .rows()
            .iter()
            .map(|row| {
                row[..minutes]
                    .iter()
                    .scan(0.0_f64, |total, &x| {
                        *total += x;
                        Some(*total)
                    })
                    .collect()
            })
            .collect();
        log::debug!(
            "cumulated {} iterations over {} minutes (requested {})",
            raw.iterations(),
            minutes,
            horizon
        );
        Ok(Self { rows, minutes })
    }

    pub fn iterations(&self) -> usize {
        self.rows.len()
    }

    pub fn minutes(&self) -> usize {
        self.minutes
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Returns the cumulative trajectory of iteration `i`.
    ///
    /// # Panics
    /// If `i >= self.iterations()`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// Collects the cross-iteration values at `minute`.
    ///
    /// # Panics
    /// If `minute >= self.minutes()`.
    pub fn column(&self, minute: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[minute]).collect()
    }

    /// Observed `(min, max)` over every cell.
    ///
    /// Scales are built from this range on the full series, before any
    /// subsetting, so that axes stay fixed as the iteration count changes.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        stats::value_range(self.rows.iter().flatten().copied())
    }

    /// Returns a copy with rows arranged in the given order.
    ///
    /// `order` must be a permutation of `0..self.iterations()`.
    pub(crate) fn reordered(&self, order: &[usize]) -> Self {
        debug_assert_eq!(order.len(), self.rows.len());
        Self {
            rows: order.iter().map(|&i| self.rows[i].clone()).collect(),
            minutes: self.minutes,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> RawSeries {
        RawSeries::new(vec![
            vec![1.0, 2.0, 3.0],
            vec![3.0, 2.0, 1.0],
            vec![2.0, 2.0, 2.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_cumulate_example() {
        let cum = CumulativeSeries::from_raw(&example(), 3).unwrap();
        assert_eq!(
            cum.rows(),
            &[
                vec![1.0, 3.0, 6.0],
                vec![3.0, 5.0, 6.0],
                vec![2.0, 4.0, 6.0]
            ]
        );
        assert_eq!(cum.column(2), vec![6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_horizon_capped_at_row_length() {
        let cum = CumulativeSeries::from_raw(&example(), DEFAULT_MAX_MINUTES).unwrap();
        assert_eq!(cum.minutes(), 3);
    }

    #[test]
    fn test_horizon_truncates() {
        let cum = CumulativeSeries::from_raw(&example(), 2).unwrap();
        assert_eq!(cum.minutes(), 2);
        assert_eq!(cum.row(0), &[1.0, 3.0]);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert_eq!(
            CumulativeSeries::from_raw(&example(), 0),
            Err(SpectraError::InvalidHorizon)
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(RawSeries::new(vec![]), Err(SpectraError::EmptySeries));
        assert_eq!(RawSeries::new(vec![vec![]]), Err(SpectraError::EmptySeries));
    }

    #[test]
    fn test_ragged_rejected() {
        let err = RawSeries::new(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            SpectraError::RaggedSeries {
                iteration: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_negative_increment_rejected() {
        let err = RawSeries::new(vec![vec![1.0, -2.0]]).unwrap_err();
        assert!(matches!(
            err,
            SpectraError::InvalidIncrement {
                iteration: 0,
                minute: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_nan_increment_rejected() {
        assert!(RawSeries::new(vec![vec![f64::NAN]]).is_err());
    }

    #[test]
    fn test_value_range() {
        let cum = CumulativeSeries::from_raw(&example(), 3).unwrap();
        assert_eq!(cum.value_range(), Some((1.0, 6.0)));
    }

    #[test]
    fn test_reordered() {
        let cum = CumulativeSeries::from_raw(&example(), 3).unwrap();
        let re = cum.reordered(&[2, 0, 1]);
        assert_eq!(re.row(0), cum.row(2));
        assert_eq!(re.row(1), cum.row(0));
        assert_eq!(re.row(2), cum.row(1));
    }
}
