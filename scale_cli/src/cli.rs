//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "bodyscale", version, about = "BLE body-composition scale reader")]
pub struct Cli {
    /// Path to config TOML (typed). Built-in defaults when omitted.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit results and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Profile flags; each one overrides the matching `[profile]` config value.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Age in years (10..=120)
    #[arg(long)]
    pub age: Option<u32>,
    /// Height in centimetres (100..=250)
    #[arg(long, value_name = "CM")]
    pub height: Option<f64>,
    /// m | male | f | female
    #[arg(long)]
    pub sex: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// Weight the simulated user settles at (kg)
    #[arg(long, value_name = "KG", default_value_t = 70.0)]
    pub sim_weight: f64,
    /// Impedance reported once settled (ohm); 0 disables impedance
    #[arg(long, value_name = "OHM", default_value_t = 500.0)]
    pub sim_impedance: f64,
    /// Advertisement period (ms)
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub sim_period_ms: u64,
    /// Samples spent stepping on before the weight settles
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub sim_ramp: u32,
    /// Settled samples before stepping off
    #[arg(long, value_name = "N", default_value_t = 20)]
    pub sim_plateau: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LayoutArg {
    /// weight + impedance (>= 4 bytes)
    Minimal,
    /// weight + impedance + reserved bytes (>= 8 bytes)
    Extended,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for the scale and report once the weight settles
    Measure {
        /// Use the built-in simulated scale (default when --replay is absent)
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "replay")]
        sim: bool,
        /// Replay a capture CSV (elapsed_ms,device_name,payload_hex)
        #[arg(long, value_name = "FILE")]
        replay: Option<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Only publish the stable weight; no profile needed
        #[arg(long, action = ArgAction::SetTrue)]
        weight_only: bool,
        /// Override scan.timeout_ms
        #[arg(long, value_name = "MS")]
        scan_timeout_ms: Option<u64>,
        /// Do not append to the reading/report logs
        #[arg(long, action = ArgAction::SetTrue)]
        no_log: bool,
        #[command(flatten)]
        sim_args: SimArgs,
    },
    /// One-shot report from an explicit weight and impedance
    Estimate {
        /// Weight (kg)
        #[arg(long, value_name = "KG")]
        weight: f64,
        /// Impedance (ohm); 0 means not measured
        #[arg(long, value_name = "OHM", default_value_t = 0.0)]
        impedance: f64,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Decode one advertisement payload given as hex
    Decode {
        /// Payload bytes, e.g. 1b8a1454
        #[arg(value_name = "HEX")]
        payload: String,
        /// Override decoder.layout
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
    },
    /// Validate the config and run the pipeline against a short simulated stream
    SelfCheck,
}
