#![no_main]
use libfuzzer_sys::fuzz_target;
use scale_core::{Measurement, PayloadLayout, Sex, UserProfile, decode};

fuzz_target!(|data: &[u8]| {
    for layout in [PayloadLayout::Minimal, PayloadLayout::Extended] {
        let Ok(reading) = decode(data, layout) else {
            continue;
        };
        assert!(reading.weight_kg > 0.0);
        assert!(reading.impedance_ohm >= 0.0);
        // Any decodable payload must estimate to a report or a clean rejection.
        if let Ok(profile) = UserProfile::new(30, 175.0, Sex::Female) {
            let _ = Measurement::new(reading, profile);
        }
    }
});
