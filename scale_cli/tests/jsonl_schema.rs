use assert_cmd::prelude::*;
use rstest::rstest;
use serde_json::Value;
use std::process::Command;

fn last_json_line(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with('{'))
        .unwrap_or_else(|| panic!("no JSON line on stdout: {text}"));
    serde_json::from_str(line).unwrap()
}

/// Validate the JSONL schema for a one-shot report.
#[rstest]
fn jsonl_report_schema() {
    let out = Command::cargo_bin("bodyscale")
        .unwrap()
        .args(["--json", "--log-level", "error", "estimate"])
        .args(["--weight", "75", "--impedance", "500"])
        .args(["--age", "30", "--height", "175", "--sex", "m"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = last_json_line(&out);

    assert_eq!(v["event"], "report");
    assert!(v["timestamp"].is_string());
    assert!(v["samples"].is_null());

    let metrics = v["metrics"].as_object().unwrap();
    for key in [
        "weight_kg",
        "impedance",
        "age",
        "height_cm",
        "sex",
        "bmi",
        "fat_percent",
        "muscle_percent",
        "bmr",
        "metabolic_age",
        "body_score",
    ] {
        assert!(metrics.contains_key(key), "metrics missing {key}");
    }
    assert_eq!(metrics["sex"], "male");

    let m = &v["measurement"];
    assert!(m["composition"]["bmi"].as_f64().unwrap() > 0.0);
    let a = &m["assessment"];
    assert!(a["bmi"]["band"].is_string());
    assert!(a["bmi"]["message"].is_string());
    assert!(!a["goals"].as_array().unwrap().is_empty());
}

#[rstest]
fn jsonl_decode_schema() {
    let out = Command::cargo_bin("bodyscale")
        .unwrap()
        .args(["--json", "decode", "1b8a145400000000"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = last_json_line(&out);
    assert!((v["weight_kg"].as_f64().unwrap() - 70.5).abs() < 1e-9);
    assert!((v["impedance_ohm"].as_f64().unwrap() - 520.4).abs() < 1e-9);
}

/// Errors in JSON mode are one object on stdout with a stable reason name.
#[rstest]
#[case(&["estimate", "--weight", "70"], "InvalidInput", 1)]
#[case(&["estimate", "--weight", "0.01", "--age", "30", "--height", "175", "--sex", "f"], "DegenerateInput", 6)]
#[case(&["measure", "--weight-only", "--sim-period-ms", "1000", "--scan-timeout-ms", "100", "--no-log"], "ScanTimeout", 3)]
fn jsonl_error_schema(#[case] args: &[&str], #[case] reason: &str, #[case] code: i32) {
    let out = Command::cargo_bin("bodyscale")
        .unwrap()
        .args(["--json", "--log-level", "off"])
        .args(args)
        .assert()
        .code(code)
        .get_output()
        .stdout
        .clone();
    let v = last_json_line(&out);
    assert_eq!(v["reason"], reason);
    assert_eq!(v["exit_code"], code);
    assert!(v["message"].as_str().unwrap().starts_with("What happened:"));
}
