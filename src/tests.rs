// End-to-end tests for run_export.

use super::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

const LOG: &str = "#Software: Microsoft Internet Information Services 6.0
#Version: 1.0
#Date: 2002-05-24 20:18:01
#Fields: date time c-ip cs-method cs-uri-stem sc-status
2002-05-24 20:18:01 172.224.24.114 GET /Default.htm 200
2002-05-24 20:18:02 172.224.24.300 GET /Default.htm 200
2002-05-24 20:18:03 172.224.24.114 GET /Images/logo.gif 304
";

fn log_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write log");
    file
}

#[test]
fn test_run_export_csv() {
    let log = log_file(LOG);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let report = run_export(Config {
        file: log.path().to_path_buf(),
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report.rows_written, 2);
    assert_eq!(report.warnings, 1);
    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,time,c_ip,cs_method,cs_uri_stem,sc_status");
    assert_eq!(lines[2], "2002-05-24,20:18:03,172.224.24.114,GET,/Images/logo.gif,304");
}

#[test]
fn test_run_export_jsonl() {
    let log = log_file(LOG);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.jsonl");
    let report = run_export(Config {
        file: log.path().to_path_buf(),
        output: Some(output.clone()),
        format: ExportFormat::Jsonl,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report.rows_written, 2);
    let first: serde_json::Value =
        serde_json::from_str(std::fs::read_to_string(&output).unwrap().lines().next().unwrap())
            .unwrap();
    assert_eq!(first["sc_status"], serde_json::json!(200));
}

#[test]
fn test_run_export_missing_file() {
    let err = run_export(Config {
        file: PathBuf::from("definitely/not/here.log"),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("Failed to open log file"));
}

#[test]
fn test_run_export_bad_header() {
    let log = log_file("#Version: 2.0\n#Fields: date\n2002-05-24\n");
    let dir = TempDir::new().unwrap();
    let err = run_export(Config {
        file: log.path().to_path_buf(),
        output: Some(dir.path().join("out.csv")),
        ..Default::default()
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("Line 1"));
}

#[test]
fn test_run_export_missing_geoip_database() {
    let log = log_file(LOG);
    let err = run_export(Config {
        file: log.path().to_path_buf(),
        geoip_ipv4: Some(PathBuf::from("nonexistent.mmdb")),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("GeoIP"));
}

#[test]
fn test_run_export_garbled_directive_after_rows() {
    let log = log_file(&format!("{LOG}# !!\n2002-05-24 20:18:04 10.0.0.1 GET / 200\n"));
    let dir = TempDir::new().unwrap();
    let err = run_export(Config {
        file: log.path().to_path_buf(),
        output: Some(dir.path().join("out.csv")),
        ..Default::default()
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("Line 8: Malformed directive"));
}
