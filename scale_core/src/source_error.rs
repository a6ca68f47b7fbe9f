//! Maps `Box<dyn Error>` from the source trait boundary to typed `ScaleError`.
//!
//! `scale_traits::AdvertisementSource` returns boxed errors; this module turns
//! them into our enum, with a feature-gated path for `scale_feed::FeedError`.

use crate::error::ScaleError;

/// Map a trait-boundary error to a typed `ScaleError`.
///
/// Known feed errors are downcast first, then string heuristics apply.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> ScaleError {
    #[cfg(feature = "feed-errors")]
    {
        if let Some(fe) = e.downcast_ref::<scale_feed::FeedError>() {
            return match fe {
                scale_feed::FeedError::Timeout => ScaleError::Timeout,
                other => ScaleError::SourceFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        ScaleError::Timeout
    } else {
        ScaleError::Source(s)
    }
}
