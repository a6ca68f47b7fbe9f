//! `From` implementations bridging `scale_config` types to `scale_core` types.

use crate::config::{PipelineMode, StabilityCfg};
use crate::decoder::PayloadLayout;
use crate::error::ProfileError;
use crate::profile::{Sex, UserProfile};
use crate::runner::RunParams;
use std::time::Duration;

// ── StabilityCfg ─────────────────────────────────────────────────────────────

impl From<&scale_config::StabilityCfg> for StabilityCfg {
    fn from(c: &scale_config::StabilityCfg) -> Self {
        Self {
            window: c.window,
            threshold_kg: c.threshold_kg,
            min_duration_ms: c.min_duration_ms,
        }
    }
}

// ── PayloadLayout ────────────────────────────────────────────────────────────

impl From<scale_config::Layout> for PayloadLayout {
    fn from(l: scale_config::Layout) -> Self {
        match l {
            scale_config::Layout::Minimal => Self::Minimal,
            scale_config::Layout::Extended => Self::Extended,
        }
    }
}

// ── PipelineMode ─────────────────────────────────────────────────────────────

impl From<scale_config::PipelineMode> for PipelineMode {
    fn from(m: scale_config::PipelineMode) -> Self {
        match m {
            scale_config::PipelineMode::Full => Self::Full,
            scale_config::PipelineMode::WeightOnly => Self::WeightOnly,
        }
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&scale_config::ScanCfg> for RunParams {
    fn from(c: &scale_config::ScanCfg) -> Self {
        Self {
            scan_timeout: Duration::from_millis(c.timeout_ms),
            read_timeout: Duration::from_millis(c.read_timeout_ms),
            stop_after_report: c.stop_after_report,
        }
    }
}

// ── UserProfile ──────────────────────────────────────────────────────────────

/// Build a profile from the stored `[profile]` section. `Ok(None)` when any
/// field is missing.
pub fn profile_from_cfg(c: &scale_config::ProfileCfg) -> Result<Option<UserProfile>, ProfileError> {
    let (Some(age), Some(height_cm), Some(sex)) = (c.age, c.height_cm, c.sex.as_deref()) else {
        return Ok(None);
    };
    let sex: Sex = sex.parse()?;
    UserProfile::new(age, height_cm, sex).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_conversion() {
        let cfg = scale_config::Config::default();
        assert_eq!(StabilityCfg::from(&cfg.stability), StabilityCfg::default());
        assert_eq!(RunParams::from(&cfg.scan), RunParams::default());
        assert_eq!(PayloadLayout::from(cfg.decoder.layout), PayloadLayout::Extended);
        assert_eq!(PipelineMode::from(cfg.pipeline.mode), PipelineMode::Full);
    }

    #[test]
    fn partial_profile_is_none() {
        let c = scale_config::ProfileCfg {
            age: Some(30),
            height_cm: None,
            sex: Some("m".into()),
        };
        assert_eq!(profile_from_cfg(&c), Ok(None));
    }

    #[test]
    fn full_profile_is_validated() {
        let c = scale_config::ProfileCfg {
            age: Some(30),
            height_cm: Some(175.0),
            sex: Some("Male".into()),
        };
        let p = profile_from_cfg(&c).unwrap().unwrap();
        assert_eq!(p.sex(), Sex::Male);
        let bad = scale_config::ProfileCfg {
            sex: Some("other".into()),
            ..c
        };
        assert!(matches!(profile_from_cfg(&bad), Err(ProfileError::UnknownSex(_))));
    }
}
