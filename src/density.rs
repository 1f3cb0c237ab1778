//! Frequency density grid of cumulative value against time.
//!
//! Each included iteration contributes one count per minute, in the
//! bucket its cumulative value falls into under the active [`Scale`].
//! For every minute the column total equals the number of iterations
//! binned.
//!
//! # Layout
//!
//! Counts are stored bucket-major: `counts[bucket * minutes + minute]`,
//! with bucket 0 holding the lowest values. Renderers that paint the
//! highest values at the top use [`DensityGrid::rows_top_down`].

use crate::error::{Result, SpectraError};
use crate::scale::Scale;
use crate::series::CumulativeSeries;

/// Relative count levels at which the renderer's color ramp changes segment.
pub const COUNT_STOPS: [f64; 4] = [0.0, 0.01, 0.1, 1.0];

/// `(minute, bucket)` histogram of iteration counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityGrid {
    counts: Vec<u32>,
    minutes: usize,
    buckets: usize,
    iterations: usize,
    max_count: u32,
}

impl DensityGrid {
    pub fn minutes(&self) -> usize {
        self.minutes
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Number of iterations binned into every column.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Largest single-cell count.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Count at `(minute, bucket)`, or `None` outside the grid.
    pub fn get(&self, minute: usize, bucket: usize) -> Option<u32> {
        if minute >= self.minutes || bucket >= self.buckets {
            return None;
        }
        Some(self.counts[bucket * self.minutes + minute])
    }

    /// Counts of one bucket across all minutes.
    ///
    /// # Panics
    /// If `bucket >= self.buckets()`.
    pub fn row(&self, bucket: usize) -> &[u32] {
        let start = bucket * self.minutes;
        &self.counts[start..start + self.minutes]
    }

    /// Bucket rows from the highest bucket down to bucket 0.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.counts.chunks(self.minutes).rev()
    }

    /// Counts of one minute, indexed by bucket.
    ///
    /// # Panics
    /// If `minute >= self.minutes()`.
    pub fn column(&self, minute: usize) -> Vec<u32> {
        (0..self.buckets)
            .map(|b| self.counts[b * self.minutes + minute])
            .collect()
    }

    /// Raw bucket-major counts.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Color-ramp stops scaled to this grid's `max_count`.
    pub fn breakpoints(&self) -> CountBreakpoints {
        CountBreakpoints::new(self.max_count)
    }
}

/// Bins the first `iteration_count` rows of `series` through `scale`.
///
/// `series` should already be in its seeded order when a reproducible
/// subset is wanted. `scale` should be built from the full, unsliced
/// series so that the bucket axis does not move with the iteration count.
///
/// # Complexity
/// Time: O(iteration_count × minutes + buckets × minutes)
///
/// # Errors
/// [`SpectraError::InvalidIterationCount`] unless
/// `1 <= iteration_count <= series.iterations()`.
///
/// # Examples
/// ```
/// use opportunity_spectra::density::bin_density;
/// use opportunity_spectra::scale::{Scale, ScaleKind};
/// use opportunity_spectra::series::{CumulativeSeries, RawSeries};
///
/// let raw = RawSeries::new(vec![vec![0.0], vec![3.0], vec![6.0]]).unwrap();
/// let cum = CumulativeSeries::from_raw(&raw, 1).unwrap();
/// let scale = Scale::new(ScaleKind::Linear, 0.0, 6.0, 2).unwrap();
/// let grid = bin_density(&cum, 3, &scale).unwrap();
/// assert_eq!(grid.column(0), vec![1, 2]);
/// assert_eq!(grid.max_count(), 2);
/// ```
pub fn bin_density(
    series: &CumulativeSeries,
    iteration_count: usize,
    scale: &Scale,
) -> Result<DensityGrid> {
    let available = series.iterations();
    if iteration_count == 0 || iteration_count > available {
        return Err(SpectraError::InvalidIterationCount {
            requested: iteration_count,
            available,
        });
    }
    let minutes = series.minutes();
    let buckets = scale.bucket_count();
    let mut counts = vec![0_u32; minutes * buckets];

    for row in &series.rows()[..iteration_count] {
        for (minute, &value) in row.iter().enumerate() {
            counts[scale.bucket(value) * minutes + minute] += 1;
        }
    }
    let max_count = counts.iter().copied().max().unwrap_or(0);

    log::debug!(
        "binned {iteration_count}/{available} iterations into {buckets}x{minutes} {:?} grid, max count {max_count}",
        scale.kind()
    );
    Ok(DensityGrid {
        counts,
        minutes,
        buckets,
        iterations: iteration_count,
        max_count,
    })
}

/// Count levels `{0, 0.01, 0.1, 1} × max_count` of a piecewise color ramp.
///
/// The ramp spaces its colors evenly, so a count's position on the ramp
/// is linear within each segment but logarithmic-ish overall. This gives
/// sparse cells visible contrast next to dense ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountBreakpoints {
    stops: [f64; 4],
}

impl CountBreakpoints {
    pub fn new(max_count: u32) -> Self {
        let max = f64::from(max_count);
        Self {
            stops: COUNT_STOPS.map(|s| s * max),
        }
    }

    pub fn stops(&self) -> [f64; 4] {
        self.stops
    }

    /// Position of `count` on the ramp, in `[0, 1]`.
    ///
    /// Each of the three segments covers a third of the ramp. Counts above
    /// the last stop clamp to 1; an all-zero grid maps everything to 0.
    ///
    /// # Examples
    /// ```
    /// use opportunity_spectra::density::CountBreakpoints;
    /// let b = CountBreakpoints::new(1000);
    /// assert_eq!(b.position(0), 0.0);
    /// assert!((b.position(10) - 1.0 / 3.0).abs() < 1e-12);
    /// assert!((b.position(100) - 2.0 / 3.0).abs() < 1e-12);
    /// assert_eq!(b.position(1000), 1.0);
    /// ```
    pub fn position(&self, count: u32) -> f64 {
        let c = f64::from(count);
        let last = self.stops.len() - 1;
        if self.stops[last] <= 0.0 || c <= 0.0 {
            return 0.0;
        }
        if c >= self.stops[last] {
            return 1.0;
        }
        let segments = last as f64;
        self.stops
            .windows(2)
            .enumerate()
            .find(|(_, w)| c <= w[1])
            .map(|(i, w)| {
                let t = if w[1] > w[0] { (c - w[0]) / (w[1] - w[0]) } else { 1.0 };
                (i as f64 + t) / segments
            })
            .unwrap_or(1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleKind;
    use crate::series::RawSeries;

    fn series(rows: Vec<Vec<f64>>) -> CumulativeSeries {
        let raw = RawSeries::new(rows).unwrap();
        let minutes = raw.minutes();
        CumulativeSeries::from_raw(&raw, minutes).unwrap()
    }

    #[test]
    fn test_two_bucket_example() {
        let cum = series(vec![vec![0.0], vec![3.0], vec![6.0]]);
        let scale = Scale::new(ScaleKind::Linear, 0.0, 6.0, 2).unwrap();
        let grid = bin_density(&cum, 3, &scale).unwrap();
        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(0, 1), Some(2));
        assert_eq!(grid.max_count(), 2);
        assert_eq!(grid.iterations(), 3);
    }

    #[test]
    fn test_first_k_rows_only() {
        let cum = series(vec![vec![0.0], vec![6.0], vec![6.0]]);
        let scale = Scale::new(ScaleKind::Linear, 0.0, 6.0, 2).unwrap();
        let grid = bin_density(&cum, 1, &scale).unwrap();
        assert_eq!(grid.column(0), vec![1, 0]);
    }

    #[test]
    fn test_layout_and_rows() {
        // cumulative: [1, 2, 3] and [3, 3, 3]
        let cum = series(vec![vec![1.0, 1.0, 1.0], vec![3.0, 0.0, 0.0]]);
        let scale = Scale::new(ScaleKind::Linear, 1.0, 3.0, 3).unwrap();
        let grid = bin_density(&cum, 2, &scale).unwrap();
        assert_eq!(grid.row(0), &[1, 0, 0]);
        assert_eq!(grid.row(1), &[0, 1, 0]);
        assert_eq!(grid.row(2), &[1, 1, 2]);
        let top_down: Vec<&[u32]> = grid.rows_top_down().collect();
        assert_eq!(top_down, vec![&[1_u32, 1, 2][..], &[0, 1, 0][..], &[1, 0, 0][..]]);
        assert_eq!(grid.max_count(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let cum = series(vec![vec![1.0]]);
        let scale = Scale::new(ScaleKind::Linear, 0.0, 1.0, 2).unwrap();
        let grid = bin_density(&cum, 1, &scale).unwrap();
        assert_eq!(grid.get(1, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_invalid_iteration_count() {
        let cum = series(vec![vec![1.0], vec![2.0]]);
        let scale = Scale::new(ScaleKind::Linear, 0.0, 2.0, 2).unwrap();
        assert_eq!(
            bin_density(&cum, 0, &scale),
            Err(SpectraError::InvalidIterationCount {
                requested: 0,
                available: 2
            })
        );
        assert!(bin_density(&cum, 3, &scale).is_err());
    }

    #[test]
    fn test_log_scale_zero_lands_in_bottom_bucket() {
        let cum = series(vec![vec![0.0, 0.0], vec![0.0, 100.0]]);
        let scale = Scale::new(ScaleKind::Log, 0.0, 100.0, 3).unwrap();
        let grid = bin_density(&cum, 2, &scale).unwrap();
        assert_eq!(grid.column(0), vec![2, 0, 0]);
        assert_eq!(grid.column(1), vec![1, 0, 1]);
    }

    #[test]
    fn test_log_scale_all_zero_series_fills_bottom_row() {
        let cum = series(vec![vec![0.0; 5]; 4]);
        let (lo, hi) = cum.value_range().unwrap();
        let scale = Scale::new(ScaleKind::Log, lo, hi, 500).unwrap();
        let grid = bin_density(&cum, 4, &scale).unwrap();
        assert_eq!(grid.row(0), &[4, 4, 4, 4, 4]);
        assert!(grid.row(250).iter().all(|&c| c == 0));
        assert_eq!(grid.max_count(), 4);
    }

    #[test]
    fn test_breakpoints() {
        let b = CountBreakpoints::new(200);
        assert_eq!(b.stops(), [0.0, 2.0, 20.0, 200.0]);
        assert!((b.position(1) - 1.0 / 6.0).abs() < 1e-12);
        assert!((b.position(11) - 0.5).abs() < 1e-12);
        assert_eq!(b.position(500), 1.0);
        assert_eq!(CountBreakpoints::new(0).position(3), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::scale::ScaleKind;
    use crate::series::RawSeries;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn every_column_sums_to_iteration_count(
            rows in (1_usize..25, 1_usize..15).prop_flat_map(|(i, m)| {
                proptest::collection::vec(proptest::collection::vec(0.0_f64..20.0, m), i)
            }),
            kind in prop_oneof![Just(ScaleKind::Linear), Just(ScaleKind::Log), Just(ScaleKind::Sqrt)],
            buckets in 2_usize..64,
            frac in 0.0_f64..=1.0,
        ) {
            let raw = RawSeries::new(rows).unwrap();
            let cum = CumulativeSeries::from_raw(&raw, raw.minutes()).unwrap();
            let (lo, hi) = cum.value_range().unwrap();
            let scale = Scale::new(kind, lo, hi, buckets).unwrap();
            let k = 1 + ((cum.iterations() - 1) as f64 * frac) as usize;
            let grid = bin_density(&cum, k, &scale).unwrap();
            for minute in 0..grid.minutes() {
                let total: u32 = grid.column(minute).iter().sum();
                prop_assert_eq!(total as usize, k);
            }
            prop_assert!(grid.counts().iter().all(|&c| c <= grid.max_count()));
        }

        #[test]
        fn position_is_monotonic(max in 1_u32..10_000, a in 0_u32..12_000, b in 0_u32..12_000) {
            let bp = CountBreakpoints::new(max);
            let (x, y) = (a.min(b), a.max(b));
            prop_assert!(bp.position(x) <= bp.position(y));
        }
    }
}
