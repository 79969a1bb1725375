// Integration tests for the streamguard binary
//
// Each test works in its own temporary --out-dir so runs never share
// alerts.csv or rendered reports.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn streamguard() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("streamguard")
}

#[test]
fn test_run_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();

    streamguard()
        .arg("run")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote report"))
        .stdout(predicate::str::contains("Wrote plot"));

    let alerts = fs::read_to_string(dir.path().join("alerts.csv")).unwrap();
    let mut lines = alerts.lines();
    assert_eq!(lines.next(), Some("t,value,score,is_anomaly"));
    assert_eq!(lines.count(), 600);

    let report = fs::read_to_string(dir.path().join("drift_report.html")).unwrap();
    assert!(report.contains("<!DOCTYPE html>"));
    assert!(report.contains("Cohen"));

    let plot = fs::read_to_string(dir.path().join("stream_plot.html")).unwrap();
    assert!(plot.contains("<svg"));
}

#[test]
fn test_stream_prints_alerts_and_summary() {
    let dir = TempDir::new().unwrap();

    let output = streamguard()
        .arg("stream")
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ALERT]"), "stderr: {}", stderr);
    assert!(stderr.contains("Done."));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["processed"], 600);
    assert_eq!(summary["rejected"], 0);
    assert!(summary["alerts_csv"].as_str().unwrap().ends_with("alerts.csv"));
}

#[test]
fn test_stream_respects_event_count() {
    let dir = TempDir::new().unwrap();

    streamguard()
        .args(["stream", "-n", "40", "--seed", "7"])
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    let alerts = fs::read_to_string(dir.path().join("alerts.csv")).unwrap();
    assert_eq!(alerts.lines().count(), 41);
}

#[test]
fn test_report_without_stream_fails() {
    let dir = TempDir::new().unwrap();

    streamguard()
        .arg("report")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing").and(predicate::str::contains("alerts.csv")));

    assert!(!dir.path().join("drift_report.html").exists());
}

#[test]
fn test_plot_without_stream_fails() {
    let dir = TempDir::new().unwrap();

    streamguard()
        .arg("plot")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing"));
}

#[test]
fn test_report_json_format() {
    let dir = TempDir::new().unwrap();

    streamguard()
        .arg("stream")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    streamguard()
        .args(["report", "--format", "json"])
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    let json = fs::read_to_string(dir.path().join("drift_report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["reference_label"], "t < 300");
    assert_eq!(report["effect_threshold"], 0.5);
    assert_eq!(report["reference"]["count"], 300);
    assert_eq!(report["current"]["count"], 300);
    assert!(report["decision"]["effect_size"].is_number());
    assert_eq!(report["decision"]["flagged"], true);
}

#[test]
fn test_report_text_format_with_cutover() {
    let dir = TempDir::new().unwrap();

    streamguard()
        .arg("stream")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    streamguard()
        .args(["report", "--format", "text", "--cutover", "350"])
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("t < 350"))
        .stdout(predicate::str::contains("Cohen's d"))
        .stdout(predicate::str::contains("DRIFT DETECTED"));
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("streamguard.toml");
    fs::write(&config, "[anomaly]\nz_threshold = -1.0\n").unwrap();

    streamguard()
        .arg("stream")
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid [anomaly] configuration"));

    assert!(!dir.path().join("alerts.csv").exists());
}

#[test]
fn test_config_file_sets_cutover() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("streamguard.toml");
    fs::write(&config, "[drift]\ncutover = 200\n").unwrap();

    streamguard()
        .arg("stream")
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    streamguard()
        .args(["report", "--format", "text"])
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("t < 200"));
}

#[test]
fn test_missing_subcommand_fails() {
    streamguard().assert().failure();
}
