//! Human-readable error descriptions and structured JSON error formatting.

use scale_core::error::{
    BuildError, DecodeError, EstimationError, NoResultReason, ProfileError, ScaleError,
};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingProfile => {
                "What happened: No user profile was given, and full reports need one.\nLikely causes: --age, --height or --sex missing, and no complete [profile] section in the config.\nHow to fix: Pass all three (e.g. `bodyscale measure --age 30 --height 175 --sex m`) or use --weight-only.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(pe) = err.downcast_ref::<ProfileError>() {
        return format!(
            "What happened: The user profile is invalid ({pe}).\nLikely causes: A typo in --age/--height/--sex or in the [profile] section.\nHow to fix: Age must be 10-120 years, height 100-250 cm, sex one of m, male, f, female."
        );
    }

    if let Some(se) = err.downcast_ref::<ScaleError>() {
        return match se {
            ScaleError::NoStableReading(NoResultReason::ScanTimeout) => {
                "What happened: No stable reading before the scan timed out.\nLikely causes: Nobody stood still on the scale, the scale is asleep, or another device name is being advertised.\nHow to fix: Please step on the scale again for re-measurement. Check [device] name_token and raise scan.timeout_ms if needed.".to_string()
            }
            ScaleError::NoStableReading(NoResultReason::SourceEnded) => {
                "What happened: The advertisement stream ended before the weight settled.\nLikely causes: The capture is too short, or the user stepped off early.\nHow to fix: Please step on the scale again for re-measurement, or record a longer capture.".to_string()
            }
            ScaleError::NoStableReading(NoResultReason::Interrupted) => {
                "What happened: Measurement interrupted before a stable reading.\nLikely causes: Ctrl-C or a termination signal.\nHow to fix: Start a new measurement.".to_string()
            }
            ScaleError::Config(msg) => format!(
                "What happened: Configuration could not be loaded ({msg}).\nLikely causes: TOML syntax error or a value outside its allowed range.\nHow to fix: Edit the config file, then rerun."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if err.downcast_ref::<EstimationError>().is_some() {
        return "What happened: The reading produced a degenerate body composition.\nLikely causes: The weight or impedance is implausible for this profile.\nHow to fix: Please step on the scale again for re-measurement.".to_string();
    }

    if let Some(de) = err.downcast_ref::<DecodeError>() {
        return format!(
            "What happened: The payload could not be decoded ({de}).\nLikely causes: Wrong payload layout or a packet from another device.\nHow to fix: Check decoder.layout (minimal needs 4 bytes, extended 8)."
        );
    }

    // String-based heuristics for errors coming from feeds or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("capture csv must have headers") {
        return "Invalid headers in capture CSV. Expected 'elapsed_ms,device_name,payload_hex' with an optional 'manufacturer_id' column.".to_string();
    }

    if lower.contains("capture replay") {
        return format!(
            "What happened: The capture file could not be replayed.\nLikely causes: Missing file, bad hex payloads or timestamps going backwards.\nHow to fix: Fix the capture CSV. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 scan timeout, 4 stream ended, 5 interrupted,
/// 6 degenerate reading, 1 for everything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(ScaleError::NoStableReading(reason)) = err.downcast_ref::<ScaleError>() {
        return match reason {
            NoResultReason::ScanTimeout => 3,
            NoResultReason::SourceEnded => 4,
            NoResultReason::Interrupted => 5,
        };
    }
    if err.downcast_ref::<EstimationError>().is_some() {
        return 6;
    }
    1
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(ScaleError::NoStableReading(reason)) = err.downcast_ref::<ScaleError>() {
        return match reason {
            NoResultReason::ScanTimeout => "ScanTimeout",
            NoResultReason::SourceEnded => "SourceEnded",
            NoResultReason::Interrupted => "Interrupted",
        };
    }
    if err.downcast_ref::<EstimationError>().is_some() {
        return "DegenerateInput";
    }
    if err.downcast_ref::<BuildError>().is_some() || err.downcast_ref::<ProfileError>().is_some()
    {
        return "InvalidInput";
    }
    if err.downcast_ref::<DecodeError>().is_some() {
        return "DecodeError";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
