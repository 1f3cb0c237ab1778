//! Explicit recomputation entry points.
//!
//! A [`Pipeline`] is built once per dataset: it cumulates the raw series
//! over the configured horizon and records the full observed value range.
//! Every parameter change then calls [`Pipeline::recompute`] (or one of
//! the narrower methods) to derive fresh, immutable outputs. Nothing is
//! patched in place, so a caller whose parameters changed mid-way simply
//! drops the stale result.
//!
//! The time horizon is the one parameter fixed at construction: a
//! [`PipelineConfig`] asking for a different `max_minutes` is rejected by
//! [`Pipeline::recompute`], and the caller builds a new pipeline from the
//! raw series instead.
//!
//! # Examples
//! ```
//! use opportunity_spectra::config::PipelineConfig;
//! use opportunity_spectra::pipeline::Pipeline;
//! use opportunity_spectra::series::RawSeries;
//!
//! let raw = RawSeries::new(vec![vec![1.0; 10], vec![2.0; 10], vec![0.5; 10]]).unwrap();
//! let config = PipelineConfig { iteration_count: 3, bucket_count: 16, ..Default::default() };
//! let pipeline = Pipeline::with_config(&raw, &config).unwrap();
//! let snapshot = pipeline.recompute(&config).unwrap();
//! assert_eq!(snapshot.band.len(), 9);
//! assert_eq!(snapshot.density.grid.iterations(), 3);
//! ```

use rand::rngs::SmallRng;

use crate::band::{self, BandPoint, Normalization, PercentileBounds};
use crate::config::PipelineConfig;
use crate::density::{self, DensityGrid};
use crate::error::{Result, SpectraError};
use crate::random::{self, SeededGenerator};
use crate::readout::{self, Readout};
use crate::scale::{Scale, ScaleKind};
use crate::series::{CumulativeSeries, RawSeries};

/// Cumulated dataset plus its full-data value range.
#[derive(Debug, Clone)]
pub struct Pipeline {
    series: CumulativeSeries,
    range: (f64, f64),
    max_minutes: usize,
}

/// Band sequences for the same bounds in all three normalization modes.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralTendency {
    pub plain: Vec<BandPoint>,
    pub recentered: Vec<BandPoint>,
    pub percentage: Vec<BandPoint>,
}

/// A density grid together with the scale it was binned through.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityView {
    pub grid: DensityGrid,
    pub scale: Scale,
}

impl DensityView {
    /// Value and probabilities at a grid cell.
    pub fn readout(&self, minute: usize, bucket: usize) -> Result<Readout> {
        readout::read_cell(&self.grid, &self.scale, minute, bucket)
    }

    /// Axis labels for the value scale.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        self.scale.ticks(count)
    }
}

/// Everything a renderer needs after one parameter change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub band: Vec<BandPoint>,
    pub density: DensityView,
}

impl Pipeline {
    /// Cumulates `raw` over `min(max_minutes, raw.minutes())` minutes.
    pub fn new(raw: &RawSeries, max_minutes: usize) -> Result<Self> {
        let series = CumulativeSeries::from_raw(raw, max_minutes)?;
        let range = series.value_range().ok_or(SpectraError::EmptySeries)?;
        log::debug!(
            "pipeline ready: {} iterations x {} minutes, values in [{}, {}]",
            series.iterations(),
            series.minutes(),
            range.0,
            range.1
        );
        Ok(Self {
            series,
            range,
            max_minutes,
        })
    }

    /// Builds a pipeline using the configured horizon.
    pub fn with_config(raw: &RawSeries, config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Self::new(raw, config.max_minutes)
    }

    pub fn series(&self) -> &CumulativeSeries {
        &self.series
    }

    pub fn iterations(&self) -> usize {
        self.series.iterations()
    }

    pub fn minutes(&self) -> usize {
        self.series.minutes()
    }

    /// Horizon requested at construction, before capping to the data length.
    pub fn max_minutes(&self) -> usize {
        self.max_minutes
    }

    /// Observed `(min, max)` over the full, unsliced series.
    pub fn value_range(&self) -> (f64, f64) {
        self.range
    }

    /// Scale over the full value range.
    pub fn scale(&self, kind: ScaleKind, bucket_count: usize) -> Result<Scale> {
        Scale::new(kind, self.range.0, self.range.1, bucket_count)
    }

    /// Percentile band over every iteration.
    pub fn band(&self, bounds: PercentileBounds, mode: Normalization) -> Vec<BandPoint> {
        band::extract_band(&self.series, bounds, mode)
    }

    /// The same band in all three normalization modes.
    pub fn central_tendency(&self, bounds: PercentileBounds) -> CentralTendency {
        CentralTendency {
            plain: self.band(bounds, Normalization::None),
            recentered: self.band(bounds, Normalization::Recenter),
            percentage: self.band(bounds, Normalization::Percentage),
        }
    }

    /// Density grid of the first `iteration_count` iterations in seed order.
    pub fn density(
        &self,
        kind: ScaleKind,
        bucket_count: usize,
        iteration_count: usize,
        seed: u32,
    ) -> Result<DensityView> {
        self.density_with::<SmallRng>(kind, bucket_count, iteration_count, seed)
    }

    /// Like [`Pipeline::density`], ordering iterations with generator `G`.
    pub fn density_with<G: SeededGenerator>(
        &self,
        kind: ScaleKind,
        bucket_count: usize,
        iteration_count: usize,
        seed: u32,
    ) -> Result<DensityView> {
        let scale = self.scale(kind, bucket_count)?;
        let ordered = random::shuffle_iterations_with::<G>(&self.series, seed);
        let grid = density::bin_density(&ordered, iteration_count, &scale)?;
        Ok(DensityView { grid, scale })
    }

    /// Re-derives the band and the density view for `config`.
    ///
    /// # Errors
    /// [`SpectraError::InvalidConfig`] if `config.max_minutes` differs from
    /// the horizon this pipeline was built with, plus any validation or
    /// binning error.
    pub fn recompute(&self, config: &PipelineConfig) -> Result<Snapshot> {
        config.validate()?;
        if config.max_minutes != self.max_minutes {
            return Err(SpectraError::InvalidConfig(format!(
                "maxMinutes changed from {} to {}, rebuild the pipeline",
                self.max_minutes, config.max_minutes
            )));
        }
        log::debug!("recomputing with {config:?}");
        let band = self.band(config.bounds()?, config.normalization);
        let density = self.density(
            config.scale_kind,
            config.bucket_count,
            config.iteration_count,
            config.seed,
        )?;
        Ok(Snapshot { band, density })
    }
}

// ============================================================================
// Tests
// ============================================================================
