//! Fixed-layout payload decoding.
//!
//! Wire layout (big-endian):
//! - bytes 0..2: weight counts, 0.01 kg each
//! - bytes 2..4: impedance counts, 0.1 Ω each (0 = not measured)
//! - `Extended` reserves four more bytes that carry nothing we read.

use crate::error::DecodeError;
use serde::Serialize;

pub const KG_PER_WEIGHT_COUNT: f64 = 0.01;
pub const OHM_PER_IMPEDANCE_COUNT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadLayout {
    /// weight + impedance, at least 4 bytes
    Minimal,
    /// weight + impedance + reserved, at least 8 bytes
    #[default]
    Extended,
}

impl PayloadLayout {
    #[inline]
    pub const fn min_len(self) -> usize {
        match self {
            Self::Minimal => 4,
            Self::Extended => 8,
        }
    }
}

/// One decoded sample. Weight is always > 0; impedance is 0.0 when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedReading {
    pub weight_kg: f64,
    pub impedance_ohm: f64,
}

impl DecodedReading {
    /// True when the scale measured impedance for this sample.
    #[inline]
    pub fn has_impedance(&self) -> bool {
        self.impedance_ohm > 0.0
    }
}

/// Decode a raw advertisement payload. Trailing bytes past the layout are ignored.
pub fn decode(payload: &[u8], layout: PayloadLayout) -> Result<DecodedReading, DecodeError> {
    let min = layout.min_len();
    let too_short = DecodeError::TooShort {
        len: payload.len(),
        min,
    };
    if payload.len() < min {
        return Err(too_short);
    }
    let &[w_hi, w_lo, i_hi, i_lo, ..] = payload else {
        return Err(too_short);
    };

    let weight_counts = u16::from_be_bytes([w_hi, w_lo]);
    if weight_counts == 0 {
        return Err(DecodeError::NonPositiveWeight);
    }
    let impedance_counts = u16::from_be_bytes([i_hi, i_lo]);

    Ok(DecodedReading {
        weight_kg: f64::from(weight_counts) * KG_PER_WEIGHT_COUNT,
        impedance_ohm: if impedance_counts > 0 {
            f64::from(impedance_counts) * OHM_PER_IMPEDANCE_COUNT
        } else {
            0.0
        },
    })
}

/// Encode a reading into the wire layout, zero-padding the reserved bytes.
///
/// Values are rounded to the nearest count and saturate at the u16 range.
pub fn encode(reading: &DecodedReading, layout: PayloadLayout) -> Vec<u8> {
    let w = to_counts(reading.weight_kg / KG_PER_WEIGHT_COUNT);
    let i = to_counts(reading.impedance_ohm / OHM_PER_IMPEDANCE_COUNT);
    let mut out = vec![0_u8; layout.min_len()];
    out[0..2].copy_from_slice(&w.to_be_bytes());
    out[2..4].copy_from_slice(&i.to_be_bytes());
    out
}

fn to_counts(x: f64) -> u16 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    let r = x.round().min(f64::from(u16::MAX));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let v = r as u16;
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_weight_and_impedance() {
        let r = decode(&[0x1b, 0x8a, 0x14, 0x53, 0, 0, 0, 0], PayloadLayout::Extended).unwrap();
        assert_eq!(r.weight_kg, 7050.0 * 0.01);
        assert_eq!(r.impedance_ohm, 5203.0 * 0.1);
        assert!(r.has_impedance());
    }

    #[test]
    fn zero_impedance_means_absent() {
        let r = decode(&[0x1b, 0x8a, 0, 0], PayloadLayout::Minimal).unwrap();
        assert_eq!(r.impedance_ohm, 0.0);
        assert!(!r.has_impedance());
    }

    #[test]
    fn short_payloads_are_rejected_per_layout() {
        assert_eq!(
            decode(&[0x1b, 0x8a, 0x14], PayloadLayout::Minimal),
            Err(DecodeError::TooShort { len: 3, min: 4 })
        );
        assert_eq!(
            decode(&[0x1b, 0x8a, 0x14, 0x53], PayloadLayout::Extended),
            Err(DecodeError::TooShort { len: 4, min: 8 })
        );
        assert_eq!(
            decode(&[], PayloadLayout::Minimal),
            Err(DecodeError::TooShort { len: 0, min: 4 })
        );
    }

    #[test]
    fn zero_weight_is_rejected() {
        assert_eq!(
            decode(&[0, 0, 0x14, 0x53], PayloadLayout::Minimal),
            Err(DecodeError::NonPositiveWeight)
        );
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let a = decode(&[0x1b, 0x8a, 0x14, 0x53], PayloadLayout::Minimal).unwrap();
        let b = decode(&[0x1b, 0x8a, 0x14, 0x53, 9, 9, 9, 9, 9], PayloadLayout::Minimal).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn encode_pads_to_layout_and_saturates() {
        let r = DecodedReading {
            weight_kg: 70.5,
            impedance_ohm: 520.3,
        };
        assert_eq!(encode(&r, PayloadLayout::Minimal), vec![0x1b, 0x8a, 0x14, 0x53]);
        assert_eq!(encode(&r, PayloadLayout::Extended).len(), 8);
        let huge = DecodedReading {
            weight_kg: 1e9,
            impedance_ohm: -3.0,
        };
        assert_eq!(encode(&huge, PayloadLayout::Minimal), vec![0xff, 0xff, 0, 0]);
    }
}
