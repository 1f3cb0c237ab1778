//! Recognized pipeline options.
//!
//! With the `serde` feature the configuration reads from JSON using the
//! camelCase option names (`lowerPercentile`, `normalizationMode`,
//! `scaleKind`, ...). Missing fields take their defaults.

use crate::band::{Normalization, PercentileBounds};
use crate::error::{Result, SpectraError};
use crate::scale::ScaleKind;
use crate::series::DEFAULT_MAX_MINUTES;

/// Default number of value buckets (rows of the density grid).
pub const DEFAULT_BUCKET_COUNT: usize = 500;

/// Parameters of one recomputation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PipelineConfig {
    pub lower_percentile: f64,
    pub upper_percentile: f64,
    #[cfg_attr(feature = "serde", serde(rename = "normalizationMode"))]
    pub normalization: Normalization,
    pub scale_kind: ScaleKind,
    /// How many of the seeded-order iterations the density grid includes.
    pub iteration_count: usize,
    pub seed: u32,
    pub bucket_count: usize,
    pub max_minutes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lower_percentile: 0.025,
            upper_percentile: 0.975,
            normalization: Normalization::None,
            scale_kind: ScaleKind::Linear,
            iteration_count: 1,
            seed: 0,
            bucket_count: DEFAULT_BUCKET_COUNT,
            max_minutes: DEFAULT_MAX_MINUTES,
        }
    }
}

impl PipelineConfig {
    /// Checks every option that can be checked without data.
    ///
    /// The iteration count's upper limit depends on the dataset and is
    /// checked at binning time.
    pub fn validate(&self) -> Result<()> {
        self.bounds()?;
        if self.iteration_count == 0 {
            return Err(SpectraError::InvalidConfig(
                "iterationCount must be at least 1".to_string(),
            ));
        }
        if self.bucket_count < 2 {
            return Err(SpectraError::InvalidBucketCount(self.bucket_count));
        }
        if self.max_minutes == 0 {
            return Err(SpectraError::InvalidHorizon);
        }
        Ok(())
    }

    /// Percentile bounds as a validated pair.
    pub fn bounds(&self) -> Result<PercentileBounds> {
        PercentileBounds::new(self.lower_percentile, self.upper_percentile)
    }

    /// Parses and validates a JSON configuration.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket_count, 500);
        assert_eq!(config.max_minutes, 120);
    }

    #[test]
    fn test_validate_rejects() {
        let bad_bounds = PipelineConfig {
            lower_percentile: 0.9,
            upper_percentile: 0.1,
            ..Default::default()
        };
        assert!(matches!(
            bad_bounds.validate(),
            Err(SpectraError::InvalidPercentiles { .. })
        ));

        let no_iterations = PipelineConfig {
            iteration_count: 0,
            ..Default::default()
        };
        assert!(no_iterations.validate().is_err());

        let one_bucket = PipelineConfig {
            bucket_count: 1,
            ..Default::default()
        };
        assert_eq!(one_bucket.validate(), Err(SpectraError::InvalidBucketCount(1)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_camel_case() {
        let config = PipelineConfig::from_json(
            r#"{
                "lowerPercentile": 0.1,
                "upperPercentile": 0.9,
                "normalizationMode": "percentage",
                "scaleKind": "sqrt",
                "iterationCount": 25,
                "seed": 4242
            }"#,
        )
        .unwrap();
        assert_eq!(config.normalization, Normalization::Percentage);
        assert_eq!(config.scale_kind, ScaleKind::Sqrt);
        assert_eq!(config.iteration_count, 25);
        assert_eq!(config.seed, 4242);
        assert_eq!(config.bucket_count, DEFAULT_BUCKET_COUNT);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{ "scaleKind": "cubic" }"#),
            Err(SpectraError::Decode(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json(r#"{ "lowerPercentile": 1.5 }"#),
            Err(SpectraError::InvalidPercentiles { .. })
        ));
    }
}
