//! Pipeline assembly: config mapping, source selection and the run itself.

use crate::cli::{ProfileArgs, SimArgs};
use scale_core::conversions::profile_from_cfg;
use scale_core::error::{BuildError, Result as CoreResult};
use scale_core::runner::{self, RunOutcome, RunParams};
use scale_core::{
    FileReportSink, MeasurementSession, NullSink, PayloadLayout, PipelineMode, ReportSink,
    StabilityCfg, UserProfile,
};
use scale_feed::{Filtered, NameFilter, ReplaySource, SimParams, SimulatedScale};
use scale_traits::clock::{ManualClock, MonotonicClock};
use scale_traits::AdvertisementSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

pub struct MeasureOpts<'a> {
    pub replay: Option<&'a Path>,
    pub profile: &'a ProfileArgs,
    pub weight_only: bool,
    pub scan_timeout_ms: Option<u64>,
    pub no_log: bool,
    pub sim: &'a SimArgs,
}

/// CLI flags win over the stored `[profile]`. `None` when any field is missing.
pub fn resolve_profile(
    cfg: &scale_config::ProfileCfg,
    args: &ProfileArgs,
) -> CoreResult<Option<UserProfile>> {
    let merged = scale_config::ProfileCfg {
        age: args.age.or(cfg.age),
        height_cm: args.height.or(cfg.height_cm),
        sex: args.sex.clone().or_else(|| cfg.sex.clone()),
    };
    profile_from_cfg(&merged).map_err(eyre::Report::new)
}

pub fn require_profile(
    cfg: &scale_config::ProfileCfg,
    args: &ProfileArgs,
) -> CoreResult<UserProfile> {
    resolve_profile(cfg, args)?.ok_or_else(|| eyre::Report::new(BuildError::MissingProfile))
}

fn sim_params(cfg: &scale_config::Config, layout: PayloadLayout, args: &SimArgs) -> SimParams {
    let token = cfg.device.name_token.trim();
    SimParams {
        device_name: if token.is_empty() { "Yoda1" } else { token }.to_string(),
        manufacturer_id: cfg.device.manufacturer_id,
        target_kg: args.sim_weight,
        impedance_ohm: args.sim_impedance,
        ramp_samples: args.sim_ramp,
        plateau_samples: Some(args.sim_plateau),
        period: Duration::from_millis(args.sim_period_ms),
        payload_len: layout.min_len(),
        ..SimParams::default()
    }
}

fn build_session(
    cfg: &scale_config::Config,
    profile: Option<UserProfile>,
    weight_only: bool,
) -> CoreResult<MeasurementSession> {
    let mode = if weight_only {
        PipelineMode::WeightOnly
    } else {
        PipelineMode::from(cfg.pipeline.mode)
    };
    let mut builder = MeasurementSession::builder()
        .mode(mode)
        .layout(cfg.decoder.layout.into())
        .stability(StabilityCfg::from(&cfg.stability));
    if let Some(p) = profile {
        builder = builder.profile(p);
    }
    builder.build()
}

pub fn run_measure(
    cfg: &scale_config::Config,
    opts: &MeasureOpts<'_>,
    shutdown: &Arc<AtomicBool>,
) -> CoreResult<RunOutcome> {
    let profile = resolve_profile(&cfg.profile, opts.profile)?;
    let mut session = build_session(cfg, profile, opts.weight_only)?;

    let mut params = RunParams::from(&cfg.scan);
    if let Some(ms) = opts.scan_timeout_ms {
        params.scan_timeout = Duration::from_millis(ms);
    }

    let sink: Box<dyn ReportSink> = if opts.no_log {
        Box::new(NullSink)
    } else {
        let files = FileReportSink::new(
            cfg.output.reading_log.as_ref().map(PathBuf::from),
            cfg.output.report_log.as_ref().map(PathBuf::from),
        );
        tracing::info!(
            reading_log = ?files.reading_log(),
            report_log = ?files.report_log(),
            "result logs"
        );
        Box::new(files)
    };

    let filter = NameFilter::new(&cfg.device.name_token, cfg.device.manufacturer_id);
    let clock = MonotonicClock::new();
    let source: Box<dyn AdvertisementSource + Send> = match opts.replay {
        Some(path) => {
            tracing::info!(path = %path.display(), "replaying capture");
            Box::new(Filtered::new(ReplaySource::from_csv(path, clock)?, filter))
        }
        None => {
            let sim = SimulatedScale::new(sim_params(cfg, session.layout(), opts.sim), clock);
            Box::new(Filtered::new(sim, filter))
        }
    };

    runner::run(
        source,
        &mut session,
        sink.as_ref(),
        &params,
        clock,
        Some(shutdown.as_ref()),
    )
}

/// Run the configured pipeline against a short simulated stream on a manual
/// clock, so it finishes instantly whatever the stability settings are.
pub fn self_check(cfg: &scale_config::Config) -> CoreResult<RunOutcome> {
    let profile = match resolve_profile(&cfg.profile, &ProfileArgs::default())? {
        Some(p) => p,
        None => UserProfile::new(30, 175.0, scale_core::Sex::Male).map_err(eyre::Report::new)?,
    };
    let mut session = build_session(cfg, Some(profile), false)?;
    let period = Duration::from_secs(1);
    // The sampler thread and the run loop must share one timeline.
    let clock = ManualClock::new();
    let settle = u32::try_from(cfg.stability.min_duration_ms / 1000).unwrap_or(u32::MAX);
    let window = u32::try_from(cfg.stability.window).unwrap_or(u32::MAX);
    let sim = SimulatedScale::new(
        SimParams {
            ramp_samples: 3,
            plateau_samples: Some(window.saturating_add(settle).saturating_add(2)),
            period,
            payload_len: session.layout().min_len(),
            ..SimParams::default()
        },
        clock.clone(),
    );
    let params = RunParams {
        scan_timeout: Duration::from_secs(24 * 60 * 60),
        read_timeout: period,
        stop_after_report: true,
    };
    runner::run(sim, &mut session, &NullSink, &params, clock, None)
}
