use crate::error::{NoResultReason, Result as CoreResult, ScaleError};
use crate::logger::{ReportEvent, ReportSink};
use crate::sampler::Sampler;
use crate::session::MeasurementSession;
use crate::status::IngestStatus;
use crate::types::Measurement;
use crossbeam_channel::RecvTimeoutError;
use scale_traits::AdvertisementSource;
use scale_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How long the run loop waits on the sampler before re-checking the
/// deadline and the shutdown flag.
const POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Give up when no result arrives within this long.
    pub scan_timeout: Duration,
    /// Per-read wait handed to the source.
    pub read_timeout: Duration,
    /// Return as soon as the first result is published.
    pub stop_after_report: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            scan_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_millis(500),
            stop_after_report: true,
        }
    }
}

/// What a run produced. At least one of `measurement` / `stable_weight_kg`
/// is set when `run` returns `Ok`.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub measurement: Option<Arc<Measurement>>,
    pub stable_weight_kg: Option<f64>,
    /// Advertisements received within the scan window.
    pub samples: u64,
    pub rejected: u64,
    pub discarded: u64,
}

impl RunOutcome {
    pub const fn has_result(&self) -> bool {
        self.measurement.is_some() || self.stable_weight_kg.is_some()
    }
}

/// Drive `session` from `source` until a result is published (when
/// `stop_after_report`), the scan times out, the source ends, or `shutdown`
/// is raised. Sample timestamps come from `clock` at arrival, relative to the
/// start of the run.
///
/// Ends with `ScaleError::NoStableReading` when nothing was published.
pub fn run<S, C>(
    source: S,
    session: &mut MeasurementSession,
    sink: &dyn ReportSink,
    params: &RunParams,
    clock: C,
    shutdown: Option<&AtomicBool>,
) -> CoreResult<RunOutcome>
where
    S: AdvertisementSource + Send + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    session.begin();
    let epoch = clock.now();
    let scan_timeout_ms = u64::try_from(params.scan_timeout.as_millis()).unwrap_or(u64::MAX);
    let sampler = Sampler::spawn(source, params.read_timeout, clock.clone());
    tracing::info!(
        mode = ?session.mode(),
        scan_timeout_ms,
        "measurement start"
    );

    let mut outcome = RunOutcome::default();
    let reason = loop {
        if shutdown.is_some_and(|f| f.load(Ordering::Relaxed)) {
            break NoResultReason::Interrupted;
        }

        let stamped = match sampler.recv_timeout(POLL) {
            Ok(s) => s,
            Err(RecvTimeoutError::Timeout) => {
                if clock.ms_since(epoch) >= scan_timeout_ms {
                    break NoResultReason::ScanTimeout;
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break NoResultReason::SourceEnded,
        };

        let t_ms = u64::try_from(stamped.at.saturating_duration_since(epoch).as_millis())
            .unwrap_or(u64::MAX);
        if t_ms >= scan_timeout_ms {
            break NoResultReason::ScanTimeout;
        }
        outcome.samples += 1;

        match session.ingest_at(&stamped.advertisement.payload, t_ms) {
            IngestStatus::Rejected(_) => outcome.rejected += 1,
            IngestStatus::Collecting | IngestStatus::Holding => {}
            IngestStatus::Discarded(_) => {
                outcome.discarded += 1;
                tracing::warn!("please step on the scale again for re-measurement");
            }
            IngestStatus::WeightStable(r) => {
                sink.record(ReportEvent::StableWeight(r.weight_kg));
                outcome.stable_weight_kg = Some(r.weight_kg);
                if params.stop_after_report {
                    log_complete(&outcome, &sampler);
                    return Ok(outcome);
                }
            }
            IngestStatus::Reported(m) => {
                sink.record(ReportEvent::Measurement(&m));
                outcome.stable_weight_kg = Some(m.reading.weight_kg);
                outcome.measurement = Some(m);
                if params.stop_after_report {
                    log_complete(&outcome, &sampler);
                    return Ok(outcome);
                }
            }
        }
    };

    if outcome.has_result() {
        tracing::info!(%reason, samples = outcome.samples, "measurement run ended");
        return Ok(outcome);
    }
    tracing::warn!(
        %reason,
        samples = outcome.samples,
        rejected = outcome.rejected,
        discarded = outcome.discarded,
        source_errors = sampler.error_count(),
        "no stable reading"
    );
    Err(crate::error::Report::new(ScaleError::NoStableReading(reason)))
}

fn log_complete(outcome: &RunOutcome, sampler: &Sampler) {
    tracing::info!(
        samples = outcome.samples,
        rejected = outcome.rejected,
        discarded = outcome.discarded,
        source_errors = sampler.error_count(),
        "measurement complete"
    );
}
