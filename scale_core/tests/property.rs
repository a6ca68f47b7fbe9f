use proptest::prelude::*;
use scale_core::{
    DecodedReading, EstimationError, PayloadLayout, Sex, StabilityCfg, StabilityFilter,
    StabilityStatus, decode, encode, estimate_raw,
};

fn sex() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Male), Just(Sex::Female)]
}

proptest! {
    #[test]
    fn decode_inverts_encode(raw_w in 1u16..=u16::MAX, raw_z in 0u16..=u16::MAX, extended in any::<bool>()) {
        let layout = if extended { PayloadLayout::Extended } else { PayloadLayout::Minimal };
        let reading = DecodedReading {
            weight_kg: f64::from(raw_w) * 0.01,
            impedance_ohm: if raw_z > 0 { f64::from(raw_z) * 0.1 } else { 0.0 },
        };
        let bytes = encode(&reading, layout);
        prop_assert_eq!(bytes.len(), layout.min_len());
        prop_assert_eq!(&bytes[0..2], &raw_w.to_be_bytes()[..]);
        prop_assert_eq!(&bytes[2..4], &raw_z.to_be_bytes()[..]);
        prop_assert_eq!(decode(&bytes, layout).unwrap(), reading);
    }

    #[test]
    fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
        let _ = decode(&bytes, PayloadLayout::Minimal);
        let _ = decode(&bytes, PayloadLayout::Extended);
    }

    #[test]
    fn clamp_invariants_hold(
        // every weight the 0.01 kg wire counts can carry
        weight in 1.06f64..655.35,
        height in 100.0f64..250.0,
        age in 10u32..=120,
        sex in sex(),
        impedance in prop_oneof![Just(0.0f64), 100.0f64..1500.0],
    ) {
        let c = match estimate_raw(weight, height, age, sex, impedance) {
            Ok(c) => c,
            Err(e) => {
                // Only a body lighter than twice the 1 kg bone floor can run out of tissue share.
                prop_assert_eq!(e, EstimationError::DegenerateInput);
                prop_assert!(weight <= 2.0, "degenerate at {} kg", weight);
                return Ok(());
            }
        };
        prop_assert!((5.0..=50.0).contains(&c.fat_percent));
        let (lo, hi) = if sex == Sex::Male { (33.0, 52.0) } else { (24.0, 42.0) };
        prop_assert!((lo..=hi).contains(&c.muscle_percent));
        prop_assert!((1.0..=5.0).contains(&c.bone_mass));
        prop_assert!((1..=20).contains(&c.visceral_fat_level));
        prop_assert!((500.0..=5000.0).contains(&c.bmr));
        prop_assert!((1.0..=90.0).contains(&c.bmi));
        prop_assert!((16..=100).contains(&c.metabolic_age));
        prop_assert!(c.body_score <= 100);
        prop_assert!((12.0..=18.0).contains(&c.protein_percent));
    }

    #[test]
    fn constant_weight_emits_exactly_once(
        raw_w in 1u16..=u16::MAX,
        n in 2usize..8,
        bump_ms in 0u64..500,
        extra in 0usize..20,
    ) {
        // the window of n samples must span the minimum duration
        let period_ms = 2000u64.div_ceil(n as u64 - 1) + bump_ms;
        let cfg = StabilityCfg { window: n, threshold_kg: 0.05, min_duration_ms: 2000 };
        let mut f = StabilityFilter::new(cfg);
        let reading = DecodedReading { weight_kg: f64::from(raw_w) * 0.01, impedance_ohm: 0.0 };
        let needed = n + extra;
        let mut emits = 0;
        for i in 0..needed {
            if let StabilityStatus::Emit(r) = f.push(reading, i as u64 * period_ms) {
                prop_assert_eq!(r, reading);
                emits += 1;
            }
        }
        prop_assert_eq!(emits, 1);
    }

    #[test]
    fn jitter_below_threshold_still_stabilizes(jitter in proptest::collection::vec(-2i32..=2, 6..20)) {
        let mut f = StabilityFilter::new(StabilityCfg::default());
        let mut emits = 0;
        for (i, j) in jitter.iter().enumerate() {
            let w = f64::from(7050 + j) / 100.0;
            let r = DecodedReading { weight_kg: w, impedance_ohm: 520.3 };
            if matches!(f.push(r, i as u64 * 1000), StabilityStatus::Emit(_)) {
                emits += 1;
            }
        }
        prop_assert_eq!(emits, 1);
    }
}
