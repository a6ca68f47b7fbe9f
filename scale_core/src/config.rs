//! Runtime configuration types for the measurement pipeline.
//!
//! These are separate from the TOML-deserialized config in `scale_config`;
//! see `conversions` for the bridge.

/// Stability filter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityCfg {
    /// Samples that must agree before a reading counts as stable (>= 2).
    pub window: usize,
    /// Exclusive bound on adjacent weight steps and on drift from the window's first sample (kg).
    pub threshold_kg: f64,
    /// Minimum span between first and last sample timestamps of the window (ms).
    pub min_duration_ms: u64,
}

impl Default for StabilityCfg {
    fn default() -> Self {
        Self {
            window: 3,
            threshold_kg: 0.05,
            min_duration_ms: 2000,
        }
    }
}

/// What the session does with a stable reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineMode {
    /// Estimate, classify and publish a full report.
    #[default]
    Full,
    /// Publish the stable weight only; no profile needed.
    WeightOnly,
}
