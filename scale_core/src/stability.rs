//! Stability filter: sliding window + duration hysteresis.
//!
//! A reading is stable once the last `window` samples step by less than the
//! threshold between neighbours and span at least `min_duration_ms`. Each
//! stabilization episode emits exactly once. An episode ends when a sample
//! drifts from the window's first sample by the threshold or more; the window
//! itself keeps sliding.

use crate::config::StabilityCfg;
use crate::decoder::DecodedReading;
use crate::fixed_point::{abs_diff_ckg, quantize_to_ckg, threshold_to_ckg};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityState {
    Collecting,
    Stable,
}

/// Outcome of pushing one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityStatus {
    /// Window not full, not steady yet, or just broken.
    Collecting,
    /// First stable evaluation of this episode; carries the newest reading.
    Emit(DecodedReading),
    /// Still stable, but this episode already emitted.
    Holding,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    weight_ckg: i32,
    t_ms: u64,
}

#[derive(Debug)]
pub struct StabilityFilter {
    cfg: StabilityCfg,
    threshold_ckg: u32,
    window: VecDeque<Sample>,
    state: StabilityState,
    emitted: bool,
    last_emitted: Option<DecodedReading>,
}

impl StabilityFilter {
    pub fn new(cfg: StabilityCfg) -> Self {
        let cfg = StabilityCfg {
            window: cfg.window.max(2),
            ..cfg
        };
        Self {
            threshold_ckg: threshold_to_ckg(cfg.threshold_kg),
            window: VecDeque::with_capacity(cfg.window),
            state: StabilityState::Collecting,
            emitted: false,
            last_emitted: None,
            cfg,
        }
    }

    #[inline]
    pub const fn state(&self) -> StabilityState {
        self.state
    }

    #[inline]
    pub const fn config(&self) -> &StabilityCfg {
        &self.cfg
    }

    /// Number of samples currently held (never above `window`).
    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The reading most recently emitted, if any.
    #[inline]
    pub const fn last_emitted(&self) -> Option<DecodedReading> {
        self.last_emitted
    }

    /// Feed one decoded sample observed at `t_ms` (monotonic, session-relative).
    pub fn push(&mut self, reading: DecodedReading, t_ms: u64) -> StabilityStatus {
        self.window.push_back(Sample {
            weight_ckg: quantize_to_ckg(reading.weight_kg),
            t_ms,
        });
        while self.window.len() > self.cfg.window {
            self.window.pop_front();
        }
        if self.window.len() < self.cfg.window {
            self.state = StabilityState::Collecting;
            return StabilityStatus::Collecting;
        }

        if self.is_steady() && self.span_ms() >= self.cfg.min_duration_ms {
            self.state = StabilityState::Stable;
            if self.emitted || self.last_emitted == Some(reading) {
                return StabilityStatus::Holding;
            }
            self.emitted = true;
            self.last_emitted = Some(reading);
            tracing::info!(
                weight_kg = reading.weight_kg,
                impedance_ohm = reading.impedance_ohm,
                "reading stabilized"
            );
            return StabilityStatus::Emit(reading);
        }

        if self.is_broken() && self.emitted {
            tracing::debug!("stabilization episode broken");
            self.emitted = false;
        }
        self.state = StabilityState::Collecting;
        StabilityStatus::Collecting
    }

    /// Take back the last emission while keeping the window, so the next
    /// stable sample emits again.
    pub fn retract(&mut self) {
        self.emitted = false;
        self.last_emitted = None;
    }

    /// Drop every sample and forget the episode, including the last emitted reading.
    pub fn reset(&mut self) {
        self.window.clear();
        self.state = StabilityState::Collecting;
        self.emitted = false;
        self.last_emitted = None;
    }

    fn is_steady(&self) -> bool {
        self.window
            .iter()
            .zip(self.window.iter().skip(1))
            .all(|(a, b)| abs_diff_ckg(a.weight_ckg, b.weight_ckg) < self.threshold_ckg)
    }

    fn is_broken(&self) -> bool {
        let Some(first) = self.window.front() else {
            return false;
        };
        self.window
            .iter()
            .any(|s| abs_diff_ckg(s.weight_ckg, first.weight_ckg) >= self.threshold_ckg)
    }

    fn span_ms(&self) -> u64 {
        match (self.window.front(), self.window.back()) {
            (Some(first), Some(last)) => last.t_ms.saturating_sub(first.t_ms),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(w: f64) -> DecodedReading {
        DecodedReading {
            weight_kg: w,
            impedance_ohm: 500.0,
        }
    }

    fn filter() -> StabilityFilter {
        StabilityFilter::new(StabilityCfg::default())
    }

    #[test]
    fn needs_full_window_before_evaluating() {
        let mut f = filter();
        assert_eq!(f.push(r(70.0), 0), StabilityStatus::Collecting);
        assert_eq!(f.push(r(70.0), 1000), StabilityStatus::Collecting);
        assert_eq!(f.len(), 2);
        assert_eq!(f.push(r(70.0), 2000), StabilityStatus::Emit(r(70.0)));
        assert_eq!(f.state(), StabilityState::Stable);
    }

    #[test]
    fn too_short_a_span_keeps_collecting() {
        let mut f = filter();
        f.push(r(70.0), 0);
        f.push(r(70.0), 500);
        assert_eq!(f.push(r(70.0), 1999), StabilityStatus::Collecting);
        assert_eq!(f.push(r(70.0), 2600), StabilityStatus::Emit(r(70.0)));
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut f = filter();
        f.push(r(70.00), 0);
        f.push(r(70.05), 1000);
        assert_eq!(f.push(r(70.10), 2000), StabilityStatus::Collecting);
        let mut f = filter();
        f.push(r(70.00), 0);
        f.push(r(70.04), 1000);
        assert_eq!(f.push(r(70.08), 2000), StabilityStatus::Emit(r(70.08)));
    }

    #[test]
    fn emits_once_per_episode() {
        let mut f = filter();
        let mut emits = 0;
        for i in 0..20_u64 {
            if let StabilityStatus::Emit(_) = f.push(r(70.5), i * 1000) {
                emits += 1;
            }
        }
        assert_eq!(emits, 1);
    }

    #[test]
    fn break_re_arms_emission_for_a_new_weight() {
        let mut f = filter();
        for i in 0..5_u64 {
            f.push(r(70.5), i * 1000);
        }
        assert_eq!(f.push(r(75.0), 5000), StabilityStatus::Collecting);
        f.push(r(75.0), 6000);
        assert_eq!(f.push(r(75.0), 7000), StabilityStatus::Emit(r(75.0)));
    }

    #[test]
    fn retract_re_arms_without_dropping_the_window() {
        let mut f = filter();
        for i in 0..3_u64 {
            f.push(r(70.5), i * 1000);
        }
        assert_eq!(f.push(r(70.5), 3000), StabilityStatus::Holding);
        f.retract();
        assert_eq!(f.last_emitted(), None);
        assert_eq!(f.len(), 3);
        assert_eq!(f.push(r(70.5), 4000), StabilityStatus::Emit(r(70.5)));
    }

    #[test]
    fn identical_reading_after_break_stays_suppressed() {
        let mut f = filter();
        for i in 0..3_u64 {
            f.push(r(70.5), i * 1000);
        }
        f.push(r(60.0), 3000);
        for i in 4..10_u64 {
            assert_ne!(
                f.push(r(70.5), i * 1000),
                StabilityStatus::Emit(r(70.5)),
                "same reading must not be re-emitted"
            );
        }
        assert_eq!(f.last_emitted(), Some(r(70.5)));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut f = filter();
        for i in 0..3_u64 {
            f.push(r(70.5), i * 1000);
        }
        f.reset();
        assert!(f.is_empty());
        assert_eq!(f.last_emitted(), None);
        assert_eq!(f.state(), StabilityState::Collecting);
        for i in 0..2_u64 {
            f.push(r(70.5), i * 1000);
        }
        assert_eq!(f.push(r(70.5), 2000), StabilityStatus::Emit(r(70.5)));
    }

    #[test]
    fn window_below_two_is_raised() {
        let f = StabilityFilter::new(StabilityCfg {
            window: 0,
            ..StabilityCfg::default()
        });
        assert_eq!(f.config().window, 2);
    }
}
