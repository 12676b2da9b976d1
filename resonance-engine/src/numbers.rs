//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Fraction `part / whole`, or `None` when `whole` is zero.
#[must_use]
pub fn ratio(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(usize_to_f64(part) / usize_to_f64(whole))
}

/// Express a fraction as a percentage, returning 0.0 for non-finite values.
#[must_use]
pub fn as_percent(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    fraction * 100.0
}
