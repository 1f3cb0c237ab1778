//! Order statistics over cross-iteration samples.
//!
//! The band extractor reads percentiles as plain order statistics (no
//! interpolation between neighbours), so that every reported value is a
//! value some iteration actually reached.
//!
//! # Index Rules
//!
//! For sorted data `x[0..n]` and fraction `p ∈ [0, 1]`:
//! - **floor rule**: `x[⌊n·p⌋]`, clamped to `n − 1`
//! - **ceil rule**: `x[⌈n·p⌉]`, clamped to `n − 1`
//!
//! The median is the floor rule at `p = 0.5`, which is the upper median
//! for even-length data.

use std::cmp::Ordering;

/// Sorts `data` ascending in place using IEEE total ordering.
///
/// NaN sorts after every finite value, so a stray NaN never poisons
/// the comparison of its neighbours.
///
/// # Complexity
/// Time: O(n log n), Space: O(1)
pub fn sort_ascending(data: &mut [f64]) {
    data.sort_unstable_by(f64::total_cmp);
}

/// Returns the order statistic at index `⌊n·p⌋` of **pre-sorted** data.
///
/// The index is clamped to `n − 1`, so `p = 1` yields the maximum.
///
/// # Returns
/// - `None` if `sorted_data` is empty or `p` is outside `[0, 1]`.
///
/// # Examples
/// ```
/// use opportunity_spectra::stats::order_statistic_floor;
/// let data = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(order_statistic_floor(&data, 0.5), Some(3.0));
/// assert_eq!(order_statistic_floor(&data, 0.25), Some(2.0));
/// assert_eq!(order_statistic_floor(&data, 1.0), Some(4.0));
/// ```
pub fn order_statistic_floor(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let idx = (n as f64 * p).floor() as usize;
    Some(sorted_data[idx.min(n - 1)])
}

/// Returns the order statistic at index `⌈n·p⌉` of **pre-sorted** data.
///
/// Any index past the end is clamped to `n − 1`. With `n = 40` and
/// `p = 0.975` the raw index is exactly 39; with `n = 3` and `p = 0.75`
/// it is 3 and clamps to 2.
///
/// # Returns
/// - `None` if `sorted_data` is empty or `p` is outside `[0, 1]`.
pub fn order_statistic_ceil(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let idx = (n as f64 * p).ceil() as usize;
    Some(sorted_data[idx.min(n - 1)])
}

/// Returns the upper median (`x[⌊n/2⌋]`) of pre-sorted data.
pub fn upper_median(sorted_data: &[f64]) -> Option<f64> {
    order_statistic_floor(sorted_data, 0.5)
}

/// Returns `(min, max)` over all values, ignoring NaN.
///
/// # Returns
/// - `None` if the iterator yields no non-NaN value.
///
/// # Examples
/// ```
/// use opportunity_spectra::stats::value_range;
/// assert_eq!(value_range([3.0, 1.0, 4.0, 1.0, 5.0]), Some((1.0, 5.0)));
/// assert_eq!(value_range(std::iter::empty::<f64>()), None);
/// ```
pub fn value_range<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((
                if x.total_cmp(&lo) == Ordering::Less { x } else { lo },
                if x.total_cmp(&hi) == Ordering::Greater { x } else { hi },
            )),
        })
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn floor_rule_never_exceeds_ceil_rule(
            mut data in proptest::collection::vec(0.0_f64..1e6, 1..100),
            p in 0.0_f64..=1.0,
        ) {
            sort_ascending(&mut data);
            let lo = order_statistic_floor(&data, p).unwrap();
            let hi = order_statistic_ceil(&data, p).unwrap();
            prop_assert!(lo <= hi, "floor {} > ceil {}", lo, hi);
        }

        #[test]
        fn order_statistics_are_members(
            mut data in proptest::collection::vec(0.0_f64..1e6, 1..100),
            p in 0.0_f64..=1.0,
        ) {
            sort_ascending(&mut data);
            let v = order_statistic_ceil(&data, p).unwrap();
            prop_assert!(data.contains(&v));
        }
    }
}
