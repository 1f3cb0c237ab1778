//! Results payload as published by the simulation runs.
//!
//! ```json
//! { "spectrograph": true, "results": [[0.0, 1.5, ...], ...] }
//! ```
//!
//! `results` holds one row of per-minute increments per iteration. The
//! `spectrograph` flag selects how the payload is meant to be viewed.
//! Fetching the payload is up to the caller.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::series::RawSeries;

/// Which derived view a payload asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsView {
    /// Density grid with iteration slider and readout.
    Spectrograph,
    /// Percentile bands in the three normalization modes.
    CentralTendency,
}

/// Deserialized results payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationResults {
    pub results: Vec<Vec<f64>>,
    #[serde(default)]
    pub spectrograph: bool,
}

impl IntegrationResults {
    /// Decodes a payload from JSON.
    ///
    /// # Examples
    /// ```
    /// use opportunity_spectra::dataset::{IntegrationResults, ResultsView};
    /// let payload = IntegrationResults::from_json(r#"{"results": [[1, 2], [3, 4]]}"#).unwrap();
    /// assert_eq!(payload.view(), ResultsView::CentralTendency);
    /// assert_eq!(payload.into_series().unwrap().iterations(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn view(&self) -> ResultsView {
        if self.spectrograph {
            ResultsView::Spectrograph
        } else {
            ResultsView::CentralTendency
        }
    }

    /// Validates the rows into a [`RawSeries`].
    pub fn into_series(self) -> Result<RawSeries> {
        RawSeries::new(self.results)
    }
}
