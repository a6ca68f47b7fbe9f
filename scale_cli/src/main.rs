//! `bodyscale`: read a BLE body-composition scale and report.

mod cli;
mod error_fmt;
mod measure;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE, LayoutArg};
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use eyre::WrapErr;
use measure::MeasureOpts;
use scale_core::error::{Result as CoreResult, ScaleError};
use scale_core::report::{render_narrative, render_summary};
use scale_core::runner::RunOutcome;
use scale_core::types::now_timestamp;
use scale_core::{DecodedReading, Measurement, PayloadLayout, decode};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let code = match try_main(cli) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            if JSON_MODE.get().copied().unwrap_or(false) {
                println!("{}", format_error_json(&e));
            } else {
                eprintln!("{}", humanize(&e));
            }
            exit_code_for_error(&e)
        }
    };
    std::process::exit(code);
}

fn try_main(cli: Cli) -> CoreResult<()> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging);

    match cli.cmd {
        Commands::Measure {
            sim,
            replay,
            profile,
            weight_only,
            scan_timeout_ms,
            no_log,
            sim_args,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "failed to install Ctrl-C handler");
                }
            }
            if sim || replay.is_none() {
                tracing::info!("using simulated scale");
            }
            let opts = MeasureOpts {
                replay: replay.as_deref(),
                profile: &profile,
                weight_only,
                scan_timeout_ms,
                no_log,
                sim: &sim_args,
            };
            let outcome = measure::run_measure(&cfg, &opts, &shutdown)?;
            print_outcome(&outcome, cli.json);
        }
        Commands::Estimate {
            weight,
            impedance,
            profile,
        } => {
            let profile = measure::require_profile(&cfg.profile, &profile)?;
            let reading = DecodedReading {
                weight_kg: weight,
                impedance_ohm: impedance,
            };
            let m = Measurement::new(reading, profile).wrap_err("estimation failed")?;
            print_measurement(&m, None, cli.json);
        }
        Commands::Decode { payload, layout } => {
            let layout = layout.map_or_else(|| cfg.decoder.layout.into(), |l| match l {
                LayoutArg::Minimal => PayloadLayout::Minimal,
                LayoutArg::Extended => PayloadLayout::Extended,
            });
            let bytes = hex::decode(payload.trim())
                .map_err(|e| eyre::eyre!("invalid hex payload '{payload}': {e}"))?;
            let reading = decode(&bytes, layout)?;
            if cli.json {
                println!("{}", serde_json::to_string(&reading)?);
            } else {
                println!(
                    "weight_kg={:.2} impedance_ohm={:.1}",
                    reading.weight_kg, reading.impedance_ohm
                );
            }
        }
        Commands::SelfCheck => {
            let outcome = measure::self_check(&cfg)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "self_check": "ok", "samples": outcome.samples })
                );
            } else {
                println!("self-check ok ({} samples)", outcome.samples);
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> CoreResult<scale_config::Config> {
    let Some(path) = path else {
        return Ok(scale_config::Config::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        eyre::Report::new(ScaleError::Io(format!("read config {}: {e}", path.display())))
    })?;
    let cfg = scale_config::load_toml(&text)
        .map_err(|e| eyre::Report::new(ScaleError::Config(e.to_string())))?;
    cfg.validate()
        .map_err(|e| eyre::Report::new(ScaleError::Config(format!("{e}"))))?;
    Ok(cfg)
}

/// Console layer on stderr (JSON lines with `--json`) plus an optional
/// JSON file layer. `RUST_LOG` beats `--log-level`, which beats `[logging] level`.
fn init_tracing(json: bool, cli_level: Option<&str>, logging: &scale_config::Logging) {
    let level = cli_level
        .or(logging.level.as_deref())
        .unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = logging.file.as_deref().map(|file| {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "bodyscale.log".into(), |n| n.to_os_string());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init();
}

fn print_measurement(m: &Measurement, samples: Option<u64>, json: bool) {
    let ts = now_timestamp();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "report",
                "timestamp": ts,
                "samples": samples,
                "metrics": m.metrics(),
                "measurement": m,
            })
        );
    } else {
        println!("{}", render_summary(m, &ts));
        println!("{}", render_narrative(m, &ts));
    }
}

fn print_outcome(outcome: &RunOutcome, json: bool) {
    if let Some(m) = &outcome.measurement {
        print_measurement(m, Some(outcome.samples), json);
        return;
    }
    if let Some(w) = outcome.stable_weight_kg {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "stable_weight",
                    "timestamp": now_timestamp(),
                    "samples": outcome.samples,
                    "weight_kg": w,
                })
            );
        } else {
            println!("Stable weight: {w:.2} kg");
        }
    }
}
