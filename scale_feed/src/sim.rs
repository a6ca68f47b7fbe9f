//! A person stepping on a scale, paced by a `Clock`.
//!
//! The weight climbs linearly to `target_kg` over `ramp_samples` advertisements
//! with no impedance (the scale only measures once settled), then holds at the
//! target with impedance and a small deterministic jitter. Payloads use the
//! scale's own wire layout: big-endian weight in 0.01 kg counts, big-endian
//! impedance in 0.1 Ω counts, zero padding up to `payload_len`.

use crate::SourceResult;
use scale_traits::{Advertisement, AdvertisementSource, Clock};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub device_name: String,
    /// Company identifier stamped on every advertisement.
    pub manufacturer_id: Option<u16>,
    pub target_kg: f64,
    pub impedance_ohm: f64,
    pub ramp_samples: u32,
    /// Plateau length before stepping off (`Ok(None)`). `None` stays forever.
    pub plateau_samples: Option<u32>,
    /// Peak deviation around the target while settled.
    pub jitter_kg: f64,
    pub period: Duration,
    pub payload_len: usize,
    pub seed: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            device_name: "Yoda1".to_string(),
            manufacturer_id: None,
            target_kg: 70.0,
            impedance_ohm: 500.0,
            ramp_samples: 5,
            plateau_samples: Some(20),
            jitter_kg: 0.02,
            period: Duration::from_secs(1),
            payload_len: 8,
            seed: 0x5ca1_e5ee_d000_0001,
        }
    }
}

pub struct SimulatedScale<C: Clock> {
    params: SimParams,
    clock: C,
    emitted: u64,
    rng: u64,
}

impl<C: Clock> SimulatedScale<C> {
    pub fn new(params: SimParams, clock: C) -> Self {
        // xorshift state must be non-zero
        let rng = params.seed.max(1);
        Self {
            params,
            clock,
            emitted: 0,
            rng,
        }
    }

    pub const fn params(&self) -> &SimParams {
        &self.params
    }

    fn next_jitter_counts(&mut self) -> i64 {
        let span = (self.params.jitter_kg.abs() * 100.0).round() as i64;
        if span == 0 {
            return 0;
        }
        self.rng ^= self.rng << 13;
        self.rng ^= self.rng >> 7;
        self.rng ^= self.rng << 17;
        let width = u64::try_from(2 * span + 1).unwrap_or(1);
        i64::try_from(self.rng % width).unwrap_or(0) - span
    }

    /// (weight counts, impedance counts) for the next sample, or `None` once
    /// the person has stepped off.
    fn next_counts(&mut self) -> Option<(u16, u16)> {
        let ramp = u64::from(self.params.ramp_samples);
        let i = self.emitted;
        if let Some(plateau) = self.params.plateau_samples
            && i >= ramp + u64::from(plateau)
        {
            return None;
        }
        let target = (self.params.target_kg * 100.0).round() as i64;
        let (weight, impedance) = if i < ramp {
            // (i + 1) / (ramp + 1) keeps the first sample above zero
            let w = target * i64::try_from(i + 1).unwrap_or(i64::MAX)
                / i64::try_from(ramp + 1).unwrap_or(i64::MAX);
            (w, 0)
        } else {
            let z = (self.params.impedance_ohm * 10.0).round() as i64;
            (target + self.next_jitter_counts(), z)
        };
        self.emitted += 1;
        Some((saturate(weight.max(1)), saturate(impedance)))
    }
}

fn saturate(v: i64) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

fn encode(weight: u16, impedance: u16, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len.max(4));
    out.extend_from_slice(&weight.to_be_bytes());
    out.extend_from_slice(&impedance.to_be_bytes());
    out.resize(len.max(4), 0);
    out
}

impl<C: Clock> AdvertisementSource for SimulatedScale<C> {
    /// Sleeps one period per advertisement; the read timeout is not consulted.
    fn next_advertisement(&mut self, _timeout: Duration) -> SourceResult {
        let Some((weight, impedance)) = self.next_counts() else {
            tracing::debug!(samples = self.emitted, "simulated user stepped off");
            return Ok(None);
        };
        self.clock.sleep(self.params.period);
        tracing::trace!(weight, impedance, "simulated advertisement");
        Ok(Some(
            Advertisement::new(
                self.params.device_name.clone(),
                encode(weight, impedance, self.params.payload_len),
            )
            .with_manufacturer_id(self.params.manufacturer_id),
        ))
    }
}
