pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// One manufacturer-data record as seen by a BLE scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Advertised local name, if the device sent one.
    pub device_name: Option<String>,
    /// Company identifier the manufacturer data was keyed by.
    pub manufacturer_id: Option<u16>,
    /// Raw manufacturer-specific payload.
    pub payload: Vec<u8>,
}

impl Advertisement {
    pub fn new(device_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            device_name: Some(device_name.into()),
            manufacturer_id: None,
            payload,
        }
    }

    #[must_use]
    pub fn with_manufacturer_id(mut self, id: Option<u16>) -> Self {
        self.manufacturer_id = id;
        self
    }
}

/// A stream of advertisements from the radio (or a stand-in for it).
///
/// `Ok(None)` signals that the stream has ended for good; errors are
/// transient and the caller keeps listening.
pub trait AdvertisementSource {
    fn next_advertisement(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Advertisement>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<S: AdvertisementSource + ?Sized> AdvertisementSource for Box<S> {
    fn next_advertisement(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Advertisement>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_advertisement(timeout)
    }
}
