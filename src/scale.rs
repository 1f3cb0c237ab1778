//! Monotonic value-to-bucket scales.
//!
//! A [`Scale`] maps a value domain `[min, max]` onto the continuous bucket
//! axis `[0, bucket_count − 1]` and back. Three kinds are supported:
//!
//! | Kind | Transform `τ(x)` | Effective domain |
//! |---|---|---|
//! | [`ScaleKind::Linear`] | `x` | `[min, max]` |
//! | [`ScaleKind::Log`] | `ln x` | `[max(1, min), max]`, inputs below clamp to the bottom |
//! | [`ScaleKind::Sqrt`] | `sign(x)·√|x|` | `[min, max]` |
//!
//! The forward map is `(τ(x) − τ(lo)) / (τ(hi) − τ(lo)) · (bucket_count − 1)`.
//! A degenerate domain (`τ(lo) == τ(hi)`) maps every value to the middle of
//! the axis, except that a log scale always sends inputs at or below its
//! lower bound to position 0.
//!
//! Bucket assignment rounds the continuous position half away from zero
//! and clamps into range, so with 2 buckets over `[0, 6]` the value 3
//! lands in bucket 1.

use crate::error::{Result, SpectraError};

/// Value transform applied before bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScaleKind {
    #[default]
    Linear,
    Log,
    Sqrt,
}

impl ScaleKind {
    fn transform(self, x: f64) -> f64 {
        match self {
            ScaleKind::Linear => x,
            ScaleKind::Log => x.ln(),
            ScaleKind::Sqrt => x.signum() * x.abs().sqrt(),
        }
    }

    fn untransform(self, t: f64) -> f64 {
        match self {
            ScaleKind::Linear => t,
            ScaleKind::Log => t.exp(),
            ScaleKind::Sqrt => t.signum() * t * t,
        }
    }
}

/// An invertible mapping between values and bucket positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    kind: ScaleKind,
    lo: f64,
    hi: f64,
    bucket_count: usize,
}

impl Scale {
    /// Builds a scale over the observed domain `[min, max]`.
    ///
    /// For [`ScaleKind::Log`] the lower bound is raised to 1 (and the upper
    /// bound to at least the lower one) so the logarithm stays finite.
    ///
    /// # Errors
    /// - [`SpectraError::InvalidBucketCount`] if `bucket_count < 2`.
    /// - [`SpectraError::InvalidConfig`] if the domain is not finite or `min > max`.
    ///
    /// # Examples
    /// ```
    /// use opportunity_spectra::scale::{Scale, ScaleKind};
    /// let s = Scale::new(ScaleKind::Linear, 0.0, 6.0, 2).unwrap();
    /// assert_eq!(s.bucket(0.0), 0);
    /// assert_eq!(s.bucket(3.0), 1);
    /// assert_eq!(s.bucket(6.0), 1);
    /// ```
    pub fn new(kind: ScaleKind, min: f64, max: f64, bucket_count: usize) -> Result<Self> {
        if bucket_count < 2 {
            return Err(SpectraError::InvalidBucketCount(bucket_count));
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SpectraError::InvalidConfig(format!(
                "scale domain must be finite with min <= max, got [{min}, {max}]"
            )));
        }
        let (lo, hi) = match kind {
            ScaleKind::Log => {
                let lo = min.max(1.0);
                if lo != min {
                    log::debug!("log scale lower bound raised from {min} to {lo}");
                }
                (lo, max.max(lo))
            }
            ScaleKind::Linear | ScaleKind::Sqrt => (min, max),
        };
        Ok(Self {
            kind,
            lo,
            hi,
            bucket_count,
        })
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// Effective domain after any log clamping.
    pub fn domain(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    fn top(&self) -> f64 {
        (self.bucket_count - 1) as f64
    }

    fn span(&self) -> (f64, f64) {
        (self.kind.transform(self.lo), self.kind.transform(self.hi))
    }

    /// Continuous position of `value` on `[0, bucket_count − 1]`.
    ///
    /// Values outside the domain extrapolate beyond the axis, except that
    /// a log scale clamps inputs at or below its lower bound (including zero
    /// and negatives) to position 0, even when its domain is degenerate.
    pub fn forward(&self, value: f64) -> f64 {
        if self.kind == ScaleKind::Log && value <= self.lo {
            return 0.0;
        }
        let (t0, t1) = self.span();
        if t1 == t0 {
            return self.top() / 2.0;
        }
        (self.kind.transform(value) - t0) / (t1 - t0) * self.top()
    }

    /// Bucket index of `value`: the rounded forward position, clamped.
    pub fn bucket(&self, value: f64) -> usize {
        let pos = self.forward(value).round();
        if pos.is_nan() || pos <= 0.0 {
            0
        } else {
            (pos as usize).min(self.bucket_count - 1)
        }
    }

    /// Value represented by continuous bucket position `position`.
    pub fn inverse(&self, position: f64) -> f64 {
        let (t0, t1) = self.span();
        if t1 == t0 {
            return self.lo;
        }
        self.kind.untransform(t0 + position / self.top() * (t1 - t0))
    }

    /// Representative value of bucket `bucket`.
    pub fn bucket_value(&self, bucket: usize) -> f64 {
        self.inverse(bucket as f64)
    }

    /// Human-friendly axis values inside the domain, roughly `count` of them.
    ///
    /// Linear and sqrt scales step through the domain by 1, 2 or 5 times a
    /// power of ten. Log scales return powers of ten, filled in with their
    /// 2..9 multiples when the domain spans fewer than `count` decades.
    ///
    /// # Examples
    /// ```
    /// use opportunity_spectra::scale::{Scale, ScaleKind};
    /// let s = Scale::new(ScaleKind::Linear, 0.0, 100.0, 500).unwrap();
    /// assert_eq!(s.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    /// ```
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        match self.kind {
            ScaleKind::Linear | ScaleKind::Sqrt => linear_ticks(self.lo, self.hi, count),
            ScaleKind::Log => log_ticks(self.lo, self.hi, count),
        }
    }
}

/// Nice step for covering `span` with about `count` intervals.
fn tick_step(span: f64, count: usize) -> f64 {
    let rough = span / count as f64;
    let mag = 10f64.powf(rough.log10().floor());
    let normalized = rough / mag;
    if normalized >= 50f64.sqrt() {
        mag * 10.0
    } else if normalized >= 10f64.sqrt() {
        mag * 5.0
    } else if normalized >= 2f64.sqrt() {
        mag * 2.0
    } else {
        mag
    }
}

fn linear_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if lo == hi {
        return vec![lo];
    }
    let step = tick_step(hi - lo, count);
    if step < 1.0 {
        // divide by the inverse step so that 0.3 comes out as 0.3
        let inv = (1.0 / step).round();
        tick_indices((lo * inv).ceil(), (hi * inv).floor())
            .map(|k| k / inv)
            .collect()
    } else {
        tick_indices((lo / step).ceil(), (hi / step).floor())
            .map(|k| k * step)
            .collect()
    }
}

fn tick_indices(first: f64, last: f64) -> impl Iterator<Item = f64> {
    (first as i64..=last as i64).map(|k| k as f64)
}

fn log_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    let first = lo.log10().floor();
    let last = hi.log10().ceil();
    if last - first < count as f64 {
        let mut ticks: Vec<f64> = (first as i32..=last as i32)
            .flat_map(|p| (1..10).map(move |m| f64::from(m) * 10f64.powi(p)))
            .filter(|t| *t >= lo && *t <= hi)
            .collect();
        if ticks.is_empty() {
            ticks.push(lo);
        }
        ticks
    } else {
        let decades = ((last - first) as usize).min(count);
        linear_ticks(first, last, decades)
            .into_iter()
            .map(|e| 10f64.powi(e as i32))
            .filter(|t| *t >= lo && *t <= hi)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
