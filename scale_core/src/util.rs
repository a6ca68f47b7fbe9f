//! Rounding helpers shared by the estimator and report rendering.

/// Round to 5 decimal places, ties away from zero.
#[inline]
pub fn round5(x: f64) -> f64 {
    (x * 100_000.0).round() / 100_000.0
}

/// Round to 1 decimal place, ties away from zero.
#[inline]
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to the nearest integer and clamp into `[lo, hi]` as `u8`.
/// Non-finite input maps to `lo`.
#[inline]
pub fn round_clamp_u8(x: f64, lo: u8, hi: u8) -> u8 {
    if !x.is_finite() {
        return lo;
    }
    let r = x.round().clamp(f64::from(lo), f64::from(hi));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let v = r as u8;
    v
}
