use crate::SourceResult;
use crate::error::FeedError;
use scale_traits::{Advertisement, AdvertisementSource};
use std::time::Duration;

/// Case-insensitive device-name substring match, plus an optional
/// manufacturer-id match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    token: String,
    manufacturer_id: Option<u16>,
}

impl NameFilter {
    /// An empty token accepts every device, named or not.
    pub fn new(token: &str, manufacturer_id: Option<u16>) -> Self {
        Self {
            token: token.trim().to_lowercase(),
            manufacturer_id,
        }
    }

    pub fn matches(&self, ad: &Advertisement) -> bool {
        if let Some(id) = self.manufacturer_id
            && ad.manufacturer_id != Some(id)
        {
            return false;
        }
        if self.token.is_empty() {
            return true;
        }
        ad.device_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&self.token))
    }
}

/// Foreign advertisements skipped per read before giving the caller a
/// chance to check for shutdown.
const MAX_SKIPS: usize = 64;

/// Wraps a source and skips advertisements the filter rejects.
pub struct Filtered<S> {
    inner: S,
    filter: NameFilter,
}

impl<S> Filtered<S> {
    pub const fn new(inner: S, filter: NameFilter) -> Self {
        Self { inner, filter }
    }
}

impl<S: AdvertisementSource> AdvertisementSource for Filtered<S> {
    /// Each inner read gets the full `timeout`. A burst of foreign devices
    /// ends in `FeedError::Timeout` after `MAX_SKIPS` misses.
    fn next_advertisement(&mut self, timeout: Duration) -> SourceResult {
        for _ in 0..MAX_SKIPS {
            match self.inner.next_advertisement(timeout)? {
                Some(ad) if self.filter.matches(&ad) => return Ok(Some(ad)),
                Some(ad) => {
                    tracing::trace!(device = ?ad.device_name, "skipping advertisement from other device");
                }
                None => return Ok(None),
            }
        }
        Err(Box::new(FeedError::Timeout))
    }
}
