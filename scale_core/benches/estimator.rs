use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use scale_core::{
    DecodedReading, Measurement, PayloadLayout, Sex, StabilityCfg, StabilityFilter, UserProfile,
    decode, encode, estimate_raw,
};

// Plateau with +/-0.02 kg deterministic jitter
fn synth_weights(n: usize, seed: u32) -> Vec<f64> {
    let mut state = seed.max(1);
    let mut next = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        i32::try_from(x % 5).unwrap_or(0) - 2
    };
    (0..n).map(|_| f64::from(7050 + next()) / 100.0).collect()
}

fn bench_estimate(c: &mut Criterion) {
    c.bench_function("estimate_raw_male", |b| {
        b.iter(|| {
            estimate_raw(
                black_box(70.5),
                black_box(175.0),
                black_box(30),
                Sex::Male,
                black_box(520.3),
            )
        })
    });

    let profile = UserProfile::new(45, 160.0, Sex::Female).unwrap();
    let reading = DecodedReading {
        weight_kg: 55.0,
        impedance_ohm: 600.0,
    };
    c.bench_function("measurement_with_assessment", |b| {
        b.iter(|| Measurement::new(black_box(reading), black_box(profile)))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let weights = synth_weights(512, 0xC0FFEE);
    let payloads: Vec<Vec<u8>> = weights
        .iter()
        .map(|w| {
            encode(
                &DecodedReading {
                    weight_kg: *w,
                    impedance_ohm: 520.3,
                },
                PayloadLayout::Extended,
            )
        })
        .collect();

    c.bench_function("decode_and_stabilize_512", |b| {
        b.iter_batched(
            || StabilityFilter::new(StabilityCfg::default()),
            |mut f| {
                for (i, p) in payloads.iter().enumerate() {
                    if let Ok(r) = decode(p, PayloadLayout::Extended) {
                        black_box(f.push(r, i as u64 * 500));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_estimate, bench_pipeline);
criterion_main!(benches);
