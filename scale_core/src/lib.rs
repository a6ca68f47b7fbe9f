#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core measurement pipeline (radio-agnostic).
//!
//! This crate turns raw scale advertisements into body-composition reports.
//! All radio interaction goes through `scale_traits::AdvertisementSource`.
//!
//! ## Architecture
//!
//! - **Decoding**: fixed-layout payload → `DecodedReading` (`decoder` module)
//! - **Stability**: sliding window + duration hysteresis, one emission per episode (`stability`)
//! - **Estimation**: one ordered, clamped computation → frozen `BodyComposition` (`estimator`)
//! - **Classification**: per-metric bands, body type, goals (`classify`) and text rendering (`report`)
//! - **Session**: owns profile + filter, publishes snapshots (`session`, `snapshot`)
//! - **Orchestration**: background sampling thread and run loop (`sampler`, `runner`)
//!
//! ## Fixed-Point Weights
//!
//! The stability filter compares weights in integer centi-kilograms (1 ckg = 0.01 kg),
//! the scale's native resolution, so threshold tests are exact.

pub mod classify;
pub mod config;
pub mod conversions;
pub mod decoder;
pub mod error;
pub mod estimator;
pub mod fixed_point;
pub mod logger;
pub mod mocks;
pub mod profile;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod session;
pub mod snapshot;
pub mod source_error;
pub mod stability;
pub mod status;
pub mod types;
pub mod util;

pub use classify::{Assessment, Band, BodyType, Rating, assess};
pub use config::{PipelineMode, StabilityCfg};
pub use decoder::{DecodedReading, PayloadLayout, decode, encode};
pub use error::{BuildError, DecodeError, EstimationError, NoResultReason, ProfileError, ScaleError};
pub use estimator::{BodyComposition, estimate, estimate_raw};
pub use logger::{FileReportSink, NullSink, ReportEvent, ReportSink};
pub use profile::{Sex, UserProfile};
pub use runner::{RunOutcome, RunParams};
pub use session::{MeasurementSession, MeasurementSessionBuilder};
pub use snapshot::{Snapshot, SnapshotPublisher, SnapshotReader};
pub use stability::{StabilityFilter, StabilityState, StabilityStatus};
pub use status::IngestStatus;
pub use types::Measurement;
