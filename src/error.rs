//! Error taxonomy for the transform pipeline.
//!
//! Invalid inputs and out-of-range queries are reported to the immediate
//! caller. Arithmetic edge cases (a zero median under percentage
//! normalization, non-positive values under a log scale) are not errors:
//! they surface as the natural floating-point result in the output.

use thiserror::Error;

/// Errors produced by the core transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectraError {
    /// The raw series contains no iterations, or its iterations have no minutes.
    #[error("raw series is empty")]
    EmptySeries,

    /// An iteration's length differs from the first iteration's length.
    #[error("iteration {iteration} has {found} minutes, expected {expected}")]
    RaggedSeries {
        iteration: usize,
        expected: usize,
        found: usize,
    },

    /// An increment is negative or not finite.
    #[error("invalid increment {value} at iteration {iteration}, minute {minute}")]
    InvalidIncrement {
        iteration: usize,
        minute: usize,
        value: f64,
    },

    /// The requested horizon is zero.
    #[error("horizon must include at least one minute")]
    InvalidHorizon,

    /// Percentile bounds are outside `(0, 1)` or not strictly ordered.
    #[error("percentile bounds must satisfy 0 < lower < upper < 1, got lower={lower}, upper={upper}")]
    InvalidPercentiles { lower: f64, upper: f64 },

    /// The iteration count is zero or exceeds the available iterations.
    #[error("iteration count {requested} outside 1..={available}")]
    InvalidIterationCount { requested: usize, available: usize },

    /// A scale or grid needs at least two buckets.
    #[error("bucket count must be at least 2, got {0}")]
    InvalidBucketCount(usize),

    /// A scale was paired with a grid of a different resolution.
    #[error("scale has {scale} buckets but grid has {grid}")]
    ScaleMismatch { grid: usize, scale: usize },

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A readout was requested outside the grid.
    #[error("cell (minute {minute}, bucket {bucket}) outside grid of {minutes} minutes x {buckets} buckets")]
    CellOutOfRange {
        minute: usize,
        bucket: usize,
        minutes: usize,
        buckets: usize,
    },

    /// A JSON payload could not be decoded.
    #[error("failed to decode payload: {0}")]
    Decode(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpectraError>;

#[cfg(feature = "serde")]
impl From<serde_json::Error> for SpectraError {
    fn from(err: serde_json::Error) -> Self {
        SpectraError::Decode(err.to_string())
    }
}
