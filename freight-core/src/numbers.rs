//! Numeric conversion helpers centralizing float-to-integer casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u64 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u64(value: f64) -> u64 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u64>(clamped).unwrap_or(u64::MAX)
}

/// Round a f64 to `places` decimal places, returning 0.0 for non-finite values.
#[must_use]
pub fn round_to_places(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Split a non-negative amount into whole units and hundredths, rounding to
/// the nearest hundredth. Negative and NaN values yield `(0, 0)`.
#[must_use]
pub fn split_hundredths(value: f64) -> (u64, u64) {
    let hundredths = round_f64_to_u64(value * 100.0);
    (hundredths / 100, hundredths % 100)
}
