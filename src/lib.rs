//! # opportunity-spectra
//!
//! Derived views of repeated-simulation time series.
//!
//! The input is `N` independent iterations, each a sequence of per-minute
//! increments. This crate turns them into the numeric structures a chart
//! renderer consumes; it never touches pixels.
//!
//! ## Modules
//!
//! - [`series`] — validated raw increments and their running totals
//! - [`stats`] — order statistics used by the band extractor
//! - [`random`] — seeded Fisher-Yates reordering of iterations
//! - [`band`] — percentile confidence bands with optional normalization
//! - [`scale`] — linear, log and sqrt value-to-bucket scales with ticks
//! - [`density`] — 2D count grid of cumulative value against time
//! - [`readout`] — point and cumulative probability at a grid cell
//! - [`config`] — recognized options and their defaults
//! - [`dataset`] — JSON results payload (feature `serde`)
//! - [`pipeline`] — explicit recomputation from current parameters
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: every output is recomputed from immutable inputs
//!   and the current parameters, never patched in place.
//! - **Reproducible subsets**: the same seed always yields the same
//!   iteration order, so the first `K` iterations are stable as `K` moves.
//! - **Honest arithmetic**: non-finite results of edge cases are passed
//!   through rather than masked.

pub mod band;
pub mod config;
#[cfg(feature = "serde")]
pub mod dataset;
pub mod density;
pub mod error;
pub mod pipeline;
pub mod random;
pub mod readout;
pub mod scale;
pub mod series;
pub mod stats;

pub use error::{Result, SpectraError};
