use crate::SourceResult;
use crate::error::FeedError;
use scale_config::CaptureRow;
use scale_traits::{Advertisement, AdvertisementSource, Clock};
use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

/// Plays back captured advertisements, sleeping on the clock so each row
/// arrives `elapsed_ms` after the first read.
pub struct ReplaySource<C: Clock> {
    rows: VecDeque<CaptureRow>,
    clock: C,
    start: Option<Instant>,
}

impl<C: Clock> ReplaySource<C> {
    pub fn new(rows: Vec<CaptureRow>, clock: C) -> Self {
        Self {
            rows: rows.into(),
            clock,
            start: None,
        }
    }

    /// Load a capture CSV (`elapsed_ms,device_name,payload_hex`, optionally
    /// followed by `manufacturer_id`).
    pub fn from_csv(path: &Path, clock: C) -> Result<Self, FeedError> {
        let rows = scale_config::load_capture_csv(path)
            .map_err(|e| FeedError::Replay(format!("{e:#}")))?;
        tracing::debug!(rows = rows.len(), path = %path.display(), "capture loaded");
        Ok(Self::new(rows, clock))
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl<C: Clock> AdvertisementSource for ReplaySource<C> {
    fn next_advertisement(&mut self, _timeout: Duration) -> SourceResult {
        let Some(row) = self.rows.pop_front() else {
            return Ok(None);
        };
        let start = *self.start.get_or_insert_with(|| self.clock.now());
        let due = Duration::from_millis(row.elapsed_ms);
        let elapsed = self.clock.now().saturating_duration_since(start);
        if let Some(wait) = due.checked_sub(elapsed) {
            self.clock.sleep(wait);
        }
        Ok(Some(
            Advertisement::new(row.device_name, row.payload)
                .with_manufacturer_id(row.manufacturer_id),
        ))
    }
}
