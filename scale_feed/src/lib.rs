//! Advertisement feeds standing in for the BLE radio.
//!
//! - `SimulatedScale`: someone stepping on the scale, then standing still
//! - `ReplaySource`: a recorded capture played back with its original timing
//! - `Filtered`: device-name / manufacturer-id filtering in front of any source
//!
//! A real radio backend implements `scale_traits::AdvertisementSource` the same way.

pub mod error;
pub mod filter;
pub mod replay;
pub mod sim;

pub use error::FeedError;
pub use filter::{Filtered, NameFilter};
pub use replay::ReplaySource;
pub use sim::{SimParams, SimulatedScale};

type SourceResult = std::result::Result<
    Option<scale_traits::Advertisement>,
    Box<dyn std::error::Error + Send + Sync>,
>;
