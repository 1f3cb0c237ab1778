//! Point and cumulative probability at a density-grid cell.
//!
//! For cell `(minute, bucket)` of a grid binned from `K` iterations:
//!
//! ```text
//! value                  = scale.inverse(bucket)
//! point_probability      = grid[bucket][minute] / K
//! cumulative_probability = Σ grid[b][minute] / K   for b = bucket ..= top
//! ```
//!
//! Bucket 0 holds the lowest values, so the cumulative sum runs from the
//! highest bucket down to the queried one: it is the share of iterations
//! that reached at least the queried bucket by that minute.

use crate::density::DensityGrid;
use crate::error::{Result, SpectraError};
use crate::scale::Scale;

/// Result of a cell query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Readout {
    pub minute: usize,
    pub bucket: usize,
    pub value: f64,
    pub point_probability: f64,
    pub cumulative_probability: f64,
}

/// Reads the value and probabilities at `(minute, bucket)`.
///
/// The denominator is the iteration count the grid was binned with.
///
/// # Errors
/// - [`SpectraError::CellOutOfRange`] if the cell is outside the grid.
/// - [`SpectraError::ScaleMismatch`] if `scale` has a different bucket count.
///
/// # Examples
/// ```
/// use opportunity_spectra::density::bin_density;
/// use opportunity_spectra::readout::read_cell;
/// use opportunity_spectra::scale::{Scale, ScaleKind};
/// use opportunity_spectra::series::{CumulativeSeries, RawSeries};
///
/// let raw = RawSeries::new(vec![vec![0.0], vec![3.0], vec![6.0], vec![6.0]]).unwrap();
/// let cum = CumulativeSeries::from_raw(&raw, 1).unwrap();
/// let scale = Scale::new(ScaleKind::Linear, 0.0, 6.0, 3).unwrap();
/// let grid = bin_density(&cum, 4, &scale).unwrap();
/// let r = read_cell(&grid, &scale, 0, 1).unwrap();
/// assert_eq!(r.value, 3.0);
/// assert_eq!(r.point_probability, 0.25);
/// assert_eq!(r.cumulative_probability, 0.75);
/// ```
pub fn read_cell(
    grid: &DensityGrid,
    scale: &Scale,
    minute: usize,
    bucket: usize,
) -> Result<Readout> {
    if scale.bucket_count() != grid.buckets() {
        return Err(SpectraError::ScaleMismatch {
            grid: grid.buckets(),
            scale: scale.bucket_count(),
        });
    }
    let out_of_range = || SpectraError::CellOutOfRange {
        minute,
        bucket,
        minutes: grid.minutes(),
        buckets: grid.buckets(),
    };
    let count = grid.get(minute, bucket).ok_or_else(out_of_range)?;

    let total = grid.iterations() as f64;
    let at_or_above: u32 = (bucket..grid.buckets())
        .filter_map(|b| grid.get(minute, b))
        .sum();
    Ok(Readout {
        minute,
        bucket,
        value: scale.bucket_value(bucket),
        point_probability: f64::from(count) / total,
        cumulative_probability: f64::from(at_or_above) / total,
    })
}

// ============================================================================
// Tests
// ============================================================================
