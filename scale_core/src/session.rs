//! Measurement session: the single writer for one advertisement stream.
//!
//! Owns the profile, the stability filter and the publisher. Each payload
//! goes decode → publish latest → stabilize → (estimate + classify) → publish.

use std::sync::Arc;
use std::time::Instant;

use scale_traits::clock::{Clock, MonotonicClock};

use crate::config::{PipelineMode, StabilityCfg};
use crate::decoder::{PayloadLayout, decode};
use crate::error::{BuildError, Result};
use crate::profile::UserProfile;
use crate::snapshot::{SnapshotPublisher, SnapshotReader};
use crate::stability::{StabilityFilter, StabilityStatus};
use crate::status::IngestStatus;
use crate::types::Measurement;

/// What happens after stabilization. Full mode always carries its profile.
#[derive(Debug, Clone, Copy)]
enum Stage {
    WeightOnly,
    Full(UserProfile),
}

pub struct MeasurementSession {
    stage: Stage,
    layout: PayloadLayout,
    filter: StabilityFilter,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    publisher: SnapshotPublisher,
}

impl core::fmt::Debug for MeasurementSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasurementSession")
            .field("stage", &self.stage)
            .field("layout", &self.layout)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl MeasurementSession {
    pub fn builder() -> MeasurementSessionBuilder {
        MeasurementSessionBuilder::default()
    }

    /// Read-only handle to the latest published values.
    pub fn reader(&self) -> SnapshotReader {
        self.publisher.reader()
    }

    pub const fn mode(&self) -> PipelineMode {
        match self.stage {
            Stage::WeightOnly => PipelineMode::WeightOnly,
            Stage::Full(_) => PipelineMode::Full,
        }
    }

    pub const fn profile(&self) -> Option<&UserProfile> {
        match &self.stage {
            Stage::WeightOnly => None,
            Stage::Full(p) => Some(p),
        }
    }

    pub const fn layout(&self) -> PayloadLayout {
        self.layout
    }

    /// Start a fresh measurement: restart the session clock and clear the filter.
    /// Published snapshots stay until overwritten.
    pub fn begin(&mut self) {
        self.epoch = self.clock.now();
        self.filter.reset();
    }

    /// Ingest a payload stamped with the session clock.
    pub fn ingest(&mut self, payload: &[u8]) -> IngestStatus {
        let t_ms = self.clock.ms_since(self.epoch);
        self.ingest_at(payload, t_ms)
    }

    /// Ingest a payload observed at `t_ms` (milliseconds since the caller's epoch,
    /// non-decreasing across calls).
    pub fn ingest_at(&mut self, payload: &[u8], t_ms: u64) -> IngestStatus {
        let reading = match decode(payload, self.layout) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, len = payload.len(), "dropping undecodable payload");
                return IngestStatus::Rejected(e);
            }
        };
        tracing::debug!(
            t_ms,
            weight_kg = reading.weight_kg,
            impedance_ohm = reading.impedance_ohm,
            "sample"
        );
        self.publisher.publish_reading(reading);

        let stable = match self.filter.push(reading, t_ms) {
            StabilityStatus::Collecting => return IngestStatus::Collecting,
            StabilityStatus::Holding => return IngestStatus::Holding,
            StabilityStatus::Emit(r) => r,
        };

        match self.stage {
            Stage::WeightOnly => {
                self.publisher.publish_stable_weight(stable.weight_kg);
                IngestStatus::WeightStable(stable)
            }
            Stage::Full(profile) => match Measurement::new(stable, profile) {
                Ok(m) => {
                    let m = Arc::new(m);
                    tracing::info!(
                        weight_kg = stable.weight_kg,
                        bmi = m.composition.bmi,
                        fat_percent = m.composition.fat_percent,
                        body_score = m.composition.body_score,
                        "report published"
                    );
                    self.publisher.publish_measurement(Arc::clone(&m));
                    IngestStatus::Reported(m)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        weight_kg = stable.weight_kg,
                        impedance_ohm = stable.impedance_ohm,
                        "discarding degenerate reading"
                    );
                    // Nothing was published, so the episode has no result yet.
                    self.filter.retract();
                    IngestStatus::Discarded(e)
                }
            },
        }
    }
}

#[derive(Default)]
pub struct MeasurementSessionBuilder {
    profile: Option<UserProfile>,
    mode: PipelineMode,
    layout: PayloadLayout,
    stability: StabilityCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

impl MeasurementSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn layout(mut self, layout: PayloadLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn stability(mut self, cfg: StabilityCfg) -> Self {
        self.stability = cfg;
        self
    }

    /// Inject a custom clock (tests and replays). Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<MeasurementSession> {
        if self.stability.window < 2 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stability window must be >= 2",
            )));
        }
        if !(self.stability.threshold_kg.is_finite() && self.stability.threshold_kg > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stability threshold must be > 0",
            )));
        }
        let stage = match (self.mode, self.profile) {
            (PipelineMode::WeightOnly, _) => Stage::WeightOnly,
            (PipelineMode::Full, Some(p)) => Stage::Full(p),
            (PipelineMode::Full, None) => {
                return Err(eyre::Report::new(BuildError::MissingProfile));
            }
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let epoch = clock.now();
        Ok(MeasurementSession {
            stage,
            layout: self.layout,
            filter: StabilityFilter::new(self.stability),
            clock,
            epoch,
            publisher: SnapshotPublisher::new(),
        })
    }
}
