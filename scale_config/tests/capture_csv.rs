use std::fs::File;
use std::io::Write;

use rstest::rstest;
use scale_config::{CaptureRecord, load_capture_csv, rows_from_records};
use tempfile::tempdir;

fn record(ms: u64, hex: &str) -> CaptureRecord {
    CaptureRecord {
        elapsed_ms: ms,
        device_name: "Yoda1".to_string(),
        payload_hex: hex.to_string(),
        manufacturer_id: None,
    }
}

#[rstest]
fn loads_well_formed_capture() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "elapsed_ms,device_name,payload_hex").unwrap();
    writeln!(f, "0,Yoda1,1b8a145400000000").unwrap();
    writeln!(f, "500, Yoda1 ,1B8A145400000000").unwrap();

    let rows = load_capture_csv(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].payload, vec![0x1b, 0x8a, 0x14, 0x54, 0, 0, 0, 0]);
    assert_eq!(rows[1].elapsed_ms, 500);
    assert_eq!(rows[1].device_name, "Yoda1");
    assert_eq!(rows[0].payload, rows[1].payload);
}

#[rstest]
fn rejects_wrong_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "ms,name,data").unwrap();
    writeln!(f, "0,Yoda1,1b8a").unwrap();

    let err = load_capture_csv(&path).unwrap_err();
    assert!(
        err.to_string()
            .contains("capture CSV must have headers 'elapsed_ms,device_name,payload_hex")
    );
}

#[rstest]
fn manufacturer_id_column_is_optional_per_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "elapsed_ms,device_name,payload_hex,manufacturer_id").unwrap();
    writeln!(f, "0,Yoda1,1b8a145400000000,343").unwrap();
    writeln!(f, "10,Phone,00ff,").unwrap();

    let rows = load_capture_csv(&path).unwrap();
    assert_eq!(rows[0].manufacturer_id, Some(0x0157));
    assert_eq!(rows[1].manufacturer_id, None);
}

#[rstest]
fn three_column_capture_has_no_manufacturer_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "elapsed_ms,device_name,payload_hex").unwrap();
    writeln!(f, "0,Yoda1,1b8a145400000000").unwrap();

    let rows = load_capture_csv(&path).unwrap();
    assert_eq!(rows[0].manufacturer_id, None);
}

#[rstest]
#[case("elapsed_ms,device_name,payload_hex,vendor")]
#[case("elapsed_ms,device_name,payload_hex,manufacturer_id,rssi")]
#[case("elapsed_ms,device_name")]
fn rejects_unknown_extra_columns(#[case] header: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "{header}").unwrap();

    let err = load_capture_csv(&path).unwrap_err();
    assert!(err.to_string().contains("capture CSV must have headers"));
}

#[rstest]
fn rejects_non_numeric_elapsed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "elapsed_ms,device_name,payload_hex").unwrap();
    writeln!(f, "soon,Yoda1,1b8a").unwrap();

    let err = load_capture_csv(&path).unwrap_err();
    assert!(err.to_string().contains("invalid CSV row 2"));
}

#[rstest]
fn rejects_time_going_backwards() {
    let err = rows_from_records(vec![record(100, "00"), record(50, "00")]).unwrap_err();
    assert!(err.to_string().contains("non-decreasing"));
}

#[rstest]
#[case("zz")]
#[case("abc")]
fn rejects_bad_hex(#[case] hex: &str) {
    let err = rows_from_records(vec![record(0, hex)]).unwrap_err();
    assert!(err.to_string().contains("invalid payload_hex in row 2"));
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let err = load_capture_csv(&dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("open capture CSV"));
}
