use thiserror::Error;

/// Payload could not be turned into a reading. Recoverable: drop the sample.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },
    #[error("payload carries a zero weight")]
    NonPositiveWeight,
}

/// Estimation produced a zero fat%, muscle% or muscle mass (or had unusable inputs).
/// The whole report must be discarded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EstimationError {
    #[error("degenerate input: estimation produced a zero core metric")]
    DegenerateInput,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("age {0} is outside [10, 120]")]
    AgeOutOfRange(u32),
    #[error("height {0} cm is outside [100, 250]")]
    HeightOutOfRange(f64),
    #[error("unknown sex '{0}' (expected m, male, f or female)")]
    UnknownSex(String),
}

/// Why a run ended without a published result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResultReason {
    ScanTimeout,
    SourceEnded,
    Interrupted,
}

impl std::fmt::Display for NoResultReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ScanTimeout => "scan timed out",
            Self::SourceEnded => "advertisement stream ended",
            Self::Interrupted => "interrupted",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone)]
pub enum ScaleError {
    #[error("advertisement source error: {0}")]
    Source(String),
    #[error("advertisement source fault: {0}")]
    SourceFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timeout waiting for advertisement")]
    Timeout,
    #[error("no stable reading: {0}")]
    NoStableReading(NoResultReason),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing user profile (required in full mode)")]
    MissingProfile,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
