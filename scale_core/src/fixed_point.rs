//! Fixed-point centi-kilogram helpers.
//!
//! Weights arrive as 0.01 kg counts, so the stability filter holds them as
//! integer centi-kilograms (`i32`, 1 ckg = 0.01 kg) and compares exactly.

/// Quantize kilograms to centi-kilograms, rounding to nearest and clamping to
/// the `i32` range. Non-finite values map to 0.
#[inline]
pub fn quantize_to_ckg(x_kg: f64) -> i32 {
    if !x_kg.is_finite() {
        return 0;
    }
    let scaled = (x_kg * 100.0).round();
    if scaled >= f64::from(i32::MAX) {
        i32::MAX
    } else if scaled <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let v = scaled as i32;
        v
    }
}

/// Convert an exclusive kilogram threshold to the smallest ckg bound `t` such
/// that `|d| < t` on integer ckg differences matches `|d| * 0.01 < threshold_kg`.
/// Never returns 0.
#[inline]
pub fn threshold_to_ckg(threshold_kg: f64) -> u32 {
    if !threshold_kg.is_finite() || threshold_kg <= 0.0 {
        return 1;
    }
    // Shave float noise (0.05 * 100 = 5.000000000000001) before taking the ceiling.
    let scaled = (threshold_kg * 100.0 - 1e-9).ceil().max(1.0);
    if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = scaled as u32;
        v
    }
}

/// Absolute difference of two ckg values without overflow.
#[inline]
pub fn abs_diff_ckg(a: i32, b: i32) -> u32 {
    a.abs_diff(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_handles_extremes_and_nan() {
        assert_eq!(quantize_to_ckg(70.5), 7050);
        assert_eq!(quantize_to_ckg(0.004), 0);
        assert_eq!(quantize_to_ckg(f64::NAN), 0);
        assert_eq!(quantize_to_ckg(f64::INFINITY), 0);
        assert_eq!(quantize_to_ckg(1e12), i32::MAX);
        assert_eq!(quantize_to_ckg(-1e12), i32::MIN);
    }

    #[test]
    fn threshold_maps_to_exclusive_bound() {
        assert_eq!(threshold_to_ckg(0.05), 5);
        assert_eq!(threshold_to_ckg(0.055), 6);
        assert_eq!(threshold_to_ckg(0.001), 1);
        assert_eq!(threshold_to_ckg(0.0), 1);
        assert_eq!(threshold_to_ckg(1.0), 100);
    }

    #[test]
    fn abs_diff_spans_full_range() {
        assert_eq!(abs_diff_ckg(i32::MIN, i32::MAX), u32::MAX);
        assert_eq!(abs_diff_ckg(7050, 7045), 5);
    }
}
