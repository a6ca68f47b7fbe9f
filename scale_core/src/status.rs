//! Status returned for each advertisement fed into a session.

use crate::decoder::DecodedReading;
use crate::error::{DecodeError, EstimationError};
use crate::types::Measurement;
use std::sync::Arc;

/// Outcome of ingesting one payload. Failures are values, never `Err`:
/// the caller decides whether to keep listening.
#[derive(Debug, Clone)]
pub enum IngestStatus {
    /// Payload did not decode; the sample was dropped.
    Rejected(DecodeError),
    /// Decoded; not stable yet (or the episode just broke).
    Collecting,
    /// Stable, but this episode has already produced its result.
    Holding,
    /// Weight-only mode: a stable weight was published.
    WeightStable(DecodedReading),
    /// Full mode: a report was estimated, classified and published.
    Reported(Arc<Measurement>),
    /// Full mode: the stable reading was degenerate; nothing was published.
    Discarded(EstimationError),
}
