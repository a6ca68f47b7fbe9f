#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and capture parsing for the scale pipeline.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section has defaults, so an empty file is a valid config.
//! - The capture CSV loader enforces headers and ordering so a recorded
//!   advertisement stream can be replayed with its original timing.
use serde::Deserialize;

/// Capture CSV schema.
///
/// Expected headers:
/// elapsed_ms,device_name,payload_hex[,manufacturer_id]
///
/// Example:
/// elapsed_ms,device_name,payload_hex,manufacturer_id
/// 0,Yoda1,1b8a145400000000,343
/// 500,Yoda1,1b8a145400000000,343
///
/// `manufacturer_id` is a decimal company id; an empty cell or a missing
/// column means the advertisement carried none.
#[derive(Debug, Deserialize, Clone)]
pub struct CaptureRecord {
    pub elapsed_ms: u64,
    pub device_name: String,
    pub payload_hex: String,
    #[serde(default)]
    pub manufacturer_id: Option<u16>,
}

/// A decoded capture row: payload bytes ready to be fed to a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRow {
    pub elapsed_ms: u64,
    pub device_name: String,
    pub payload: Vec<u8>,
    pub manufacturer_id: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceCfg {
    /// Case-insensitive substring the advertised name must contain. Empty accepts any device.
    pub name_token: String,
    /// Only accept manufacturer data keyed by this company id when set.
    pub manufacturer_id: Option<u16>,
}

impl Default for DeviceCfg {
    fn default() -> Self {
        Self {
            name_token: "Yoda1".to_string(),
            manufacturer_id: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// weight + impedance only (>= 4 bytes)
    Minimal,
    /// weight + impedance with reserved trailing bytes (>= 8 bytes)
    #[default]
    Extended,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DecoderCfg {
    pub layout: Layout,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StabilityCfg {
    /// Number of consecutive samples that must agree
    pub window: usize,
    /// Maximum step between adjacent samples (kg), exclusive
    pub threshold_kg: f64,
    /// Minimum span between the first and last sample of the window (ms)
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScanCfg {
    /// Give up on a measurement after this long (ms)
    pub timeout_ms: u64,
    /// Per-read wait on the advertisement source (ms)
    pub read_timeout_ms: u64,
    /// End the run after the first published result
    pub stop_after_report: bool,
}

impl Default for ScanCfg {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            read_timeout_ms: 500,
            stop_after_report: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Decode, stabilize, estimate and report
    #[default]
    Full,
    /// Decode and stabilize only; publish the stable weight
    WeightOnly,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PipelineCfg {
    pub mode: PipelineMode,
}

/// Optional stored profile; CLI flags take precedence.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ProfileCfg {
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    /// "m" | "male" | "f" | "female"
    pub sex: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    /// Append-only `<timestamp>: <metrics>` log. Unset disables it.
    pub reading_log: Option<String>,
    /// Append-only narrative report log. Unset disables it.
    pub report_log: Option<String>,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            reading_log: Some("weight_log.txt".to_string()),
            report_log: Some("body_composition_report.txt".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceCfg,
    #[serde(default)]
    pub decoder: DecoderCfg,
    #[serde(default)]
    pub stability: StabilityCfg,
    #[serde(default)]
    pub scan: ScanCfg,
    #[serde(default)]
    pub pipeline: PipelineCfg,
    #[serde(default)]
    pub profile: ProfileCfg,
    #[serde(default)]
    pub output: OutputCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Accepted spellings for the profile's sex field.
pub fn is_known_sex(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "m" | "male" | "f" | "female"
    )
}

pub fn load_capture_csv(path: &std::path::Path) -> eyre::Result<Vec<CaptureRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open capture CSV {:?}: {}", path, e))?;

    // Enforce exact headers; the manufacturer id column is optional
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["elapsed_ms", "device_name", "payload_hex"];
    let actual: Vec<String> = headers.iter().map(ToString::to_string).collect();
    let known = match actual.len() {
        3 => actual[..] == expected,
        4 => actual[..3] == expected && actual[3] == "manufacturer_id",
        _ => false,
    };
    if !known {
        eyre::bail!(
            "capture CSV must have headers 'elapsed_ms,device_name,payload_hex[,manufacturer_id]', got: {}",
            actual.join(",")
        );
    }

    let mut records = Vec::new();
    for (idx, rec) in rdr.deserialize::<CaptureRecord>().enumerate() {
        match rec {
            Ok(r) => records.push(r),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    rows_from_records(records)
}

/// Decode hex payloads and check that timestamps never go backwards.
pub fn rows_from_records(records: Vec<CaptureRecord>) -> eyre::Result<Vec<CaptureRow>> {
    let mut rows = Vec::with_capacity(records.len());
    let mut prev_ms = 0_u64;
    for (i, rec) in records.into_iter().enumerate() {
        if rec.elapsed_ms < prev_ms {
            eyre::bail!(
                "capture elapsed_ms must be non-decreasing (row {} goes back to {} ms)",
                i + 2,
                rec.elapsed_ms
            );
        }
        prev_ms = rec.elapsed_ms;
        let payload = hex::decode(rec.payload_hex.trim())
            .map_err(|e| eyre::eyre!("invalid payload_hex in row {}: {}", i + 2, e))?;
        rows.push(CaptureRow {
            elapsed_ms: rec.elapsed_ms,
            device_name: rec.device_name,
            payload,
            manufacturer_id: rec.manufacturer_id,
        });
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Stability
        if self.stability.window < 2 {
            eyre::bail!("stability.window must be >= 2");
        }
        if self.stability.window > 64 {
            eyre::bail!("stability.window is unreasonably large (>64)");
        }
        if !(self.stability.threshold_kg > 0.0 && self.stability.threshold_kg <= 5.0) {
            eyre::bail!("stability.threshold_kg must be in (0.0, 5.0]");
        }
        if self.stability.min_duration_ms > 5 * 60 * 1000 {
            eyre::bail!("stability.min_duration_ms is unreasonably large (>5min)");
        }

        // Scan
        if self.scan.timeout_ms == 0 {
            eyre::bail!("scan.timeout_ms must be >= 1");
        }
        if self.scan.timeout_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("scan.timeout_ms is unreasonably large (>24h)");
        }
        if self.scan.read_timeout_ms == 0 {
            eyre::bail!("scan.read_timeout_ms must be >= 1");
        }

        // Profile (optional fields, checked only when present)
        if let Some(age) = self.profile.age
            && !(10..=120).contains(&age)
        {
            eyre::bail!("profile.age must be in [10, 120]");
        }
        if let Some(h) = self.profile.height_cm
            && !(100.0..=250.0).contains(&h)
        {
            eyre::bail!("profile.height_cm must be in [100, 250]");
        }
        if let Some(sex) = &self.profile.sex
            && !is_known_sex(sex)
        {
            eyre::bail!("profile.sex must be one of m, male, f, female");
        }

        // Logging
        if let Some(rot) = &self.logging.rotation
            && !matches!(rot.as_str(), "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never, daily, hourly");
        }

        // Device, decoder, pipeline: serde restricts to known values

        Ok(())
    }
}
