//! Test and helper sources for scale_core.

use scale_traits::clock::Clock;
use scale_traits::{Advertisement, AdvertisementSource};
use std::collections::VecDeque;
use std::time::Duration;

type SourceResult = Result<Option<Advertisement>, Box<dyn std::error::Error + Send + Sync>>;

/// A source that always errors; never yields an advertisement.
pub struct NoopSource;

impl AdvertisementSource for NoopSource {
    fn next_advertisement(&mut self, _timeout: Duration) -> SourceResult {
        Err(Box::new(std::io::Error::other("noop source")))
    }
}

/// Plays a fixed list of payloads, sleeping `gap` on the clock before each one,
/// then ends the stream.
pub struct ScriptedSource<C: Clock> {
    items: VecDeque<Vec<u8>>,
    gap: Duration,
    clock: C,
}

impl<C: Clock> ScriptedSource<C> {
    pub fn new(payloads: impl IntoIterator<Item = Vec<u8>>, gap: Duration, clock: C) -> Self {
        Self {
            items: payloads.into_iter().collect(),
            gap,
            clock,
        }
    }
}

impl<C: Clock> AdvertisementSource for ScriptedSource<C> {
    fn next_advertisement(&mut self, _timeout: Duration) -> SourceResult {
        let Some(payload) = self.items.pop_front() else {
            return Ok(None);
        };
        self.clock.sleep(self.gap);
        Ok(Some(Advertisement::new("scripted", payload)))
    }
}
