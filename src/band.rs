//! Percentile confidence bands of cumulative trajectories.
//!
//! For every minute after the first, the cross-iteration values are
//! sorted and three order statistics are read off:
//!
//! ```text
//! value = v[⌊n · 0.5⌋]
//! lower = v[⌊n · p_lo⌋]
//! upper = v[min(⌈n · p_hi⌉, n − 1)]
//! ```
//!
//! Minute 0 is skipped: it is the common starting point of every run.
//!
//! # Normalization
//!
//! | Mode | `value` | `lower` | `upper` |
//! |---|---|---|---|
//! | [`Normalization::None`] | median | lower | upper |
//! | [`Normalization::Recenter`] | 0 | lower − median | upper − median |
//! | [`Normalization::Percentage`] | 0 | (lower − median) / median | (upper − median) / median |
//!
//! A zero median under `Percentage` yields NaN or ±∞. That result is
//! passed through untouched so that empty early minutes stay visible in
//! the output.

use crate::error::{Result, SpectraError};
use crate::series::CumulativeSeries;
use crate::stats;

/// Band normalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Normalization {
    #[default]
    None,
    Recenter,
    Percentage,
}

/// Validated percentile bounds with `0 < lower < upper < 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileBounds {
    lower: f64,
    upper: f64,
}

impl PercentileBounds {
    /// # Errors
    /// [`SpectraError::InvalidPercentiles`] unless `0 < lower < upper < 1`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let open_unit = |p: f64| p > 0.0 && p < 1.0;
        if !open_unit(lower) || !open_unit(upper) || lower >= upper {
            return Err(SpectraError::InvalidPercentiles { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

/// One minute of a percentile band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandPoint {
    pub minute: usize,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BandPoint {
    fn normalize(self, mode: Normalization) -> Self {
        let Self {
            minute,
            value,
            lower,
            upper,
        } = self;
        match mode {
            Normalization::None => self,
            Normalization::Recenter => Self {
                minute,
                value: 0.0,
                lower: lower - value,
                upper: upper - value,
            },
            Normalization::Percentage => Self {
                minute,
                value: 0.0,
                lower: (lower - value) / value,
                upper: (upper - value) / value,
            },
        }
    }
}

/// Extracts the percentile band for minutes `1..series.minutes()`.
///
/// # Complexity
/// Time: O(minutes × n log n), Space: O(n)
///
/// # Examples
/// ```
/// use opportunity_spectra::band::{extract_band, Normalization, PercentileBounds};
/// use opportunity_spectra::series::{CumulativeSeries, RawSeries};
///
/// let raw = RawSeries::new(vec![
///     vec![1.0, 2.0, 3.0],
///     vec![3.0, 2.0, 1.0],
///     vec![2.0, 2.0, 2.0],
/// ]).unwrap();
/// let cum = CumulativeSeries::from_raw(&raw, 3).unwrap();
/// let bounds = PercentileBounds::new(0.25, 0.75).unwrap();
/// let band = extract_band(&cum, bounds, Normalization::None);
/// assert_eq!(band.len(), 2);
/// assert_eq!((band[1].value, band[1].lower, band[1].upper), (6.0, 6.0, 6.0));
/// ```
pub fn extract_band(
    series: &CumulativeSeries,
    bounds: PercentileBounds,
    mode: Normalization,
) -> Vec<BandPoint> {
    let mut column = Vec::with_capacity(series.iterations());
    let band: Vec<BandPoint> = (1..series.minutes())
        .filter_map(|minute| {
            column.clear();
            column.extend(series.rows().iter().map(|row| row[minute]));
            stats::sort_ascending(&mut column);
            let point = BandPoint {
                minute,
                value: stats::upper_median(&column)?,
                lower: stats::order_statistic_floor(&column, bounds.lower())?,
                upper: stats::order_statistic_ceil(&column, bounds.upper())?,
            };
            Some(point.normalize(mode))
        })
        .collect();

    if mode == Normalization::Percentage {
        let degenerate = band
            .iter()
            .filter(|p| !p.lower.is_finite() || !p.upper.is_finite())
            .count();
        if degenerate > 0 {
            log::warn!("{degenerate} minutes have a zero median, percentage band is not finite there");
        }
    }
    log::debug!(
        "extracted {:?} band over {} minutes, bounds ({}, {})",
        mode,
        band.len(),
        bounds.lower(),
        bounds.upper()
    );
    band
}

/// Vertical plot limits for a band: `(min lower, max upper)`, each scaled
/// by `padding`.
///
/// Non-finite entries are skipped. Charts conventionally use a padding
/// of 1.25.
///
/// # Returns
/// - `None` if no point has a finite lower and upper bound.
pub fn plot_extent(points: &[BandPoint], padding: f64) -> Option<(f64, f64)> {
    let lo = points
        .iter()
        .map(|p| p.lower)
        .filter(|x| x.is_finite())
        .min_by(f64::total_cmp)?;
    let hi = points
        .iter()
        .map(|p| p.upper)
        .filter(|x| x.is_finite())
        .max_by(f64::total_cmp)?;
    Some((lo * padding, hi * padding))
}

// ============================================================================
// Tests
// ============================================================================
