use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    f.write_all(content.as_bytes()).expect("write config");
    f.flush().expect("flush");
    f
}

fn valid_config() -> NamedTempFile {
    write_config(
        r#"
[pins]
fine = 17
coarse = 27
trigger = 22
servo_pwm = 0

[runner]
tick_rate_hz = 2000
"#,
    )
}

fn turngate() -> Command {
    Command::cargo_bin("turngate_cli").expect("binary")
}

#[test]
fn check_config_accepts_a_valid_file() {
    let cfg = valid_config();
    turngate()
        .args(["--config"])
        .arg(cfg.path())
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config ok"));
}

#[test]
fn check_config_json_mode() {
    let cfg = valid_config();
    let output = turngate()
        .args(["--config"])
        .arg(cfg.path())
        .args(["--json", "check-config"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is one JSON object");
    assert_eq!(v["ok"], true);
}

#[test]
fn check_config_rejects_bad_stability() {
    let cfg = write_config(
        r#"
[pins]
fine = 17
coarse = 27
trigger = 22

[stability]
relative_threshold = 2.0
"#,
    );
    turngate()
        .args(["--config"])
        .arg(cfg.path())
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("relative_threshold"));
}

#[test]
fn missing_config_file_fails() {
    turngate()
        .args(["--config", "/nonexistent/turngate.toml", "check-config"])
        .assert()
        .failure();
}

#[test]
fn predict_reports_the_wait() {
    let cfg = valid_config();
    let output = turngate()
        .args(["--config"])
        .arg(cfg.path())
        .args([
            "--json",
            "predict",
            "--last-turn-us",
            "600000",
            "--time-in-round-us",
            "0",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["ok"], true);
    // Reference model at 600 ms projects 601858 µs; fall time is 418344 µs.
    assert_eq!(v["wait_us"], 601_858 - 418_344);
}

#[test]
fn predict_refuses_a_stopped_platform() {
    let cfg = valid_config();
    turngate()
        .args(["--config"])
        .arg(cfg.path())
        .args(["predict", "--last-turn-us", "9000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sanity bound"));
}

#[test]
fn bounded_sim_run_completes() {
    let cfg = valid_config();
    turngate()
        .args(["--config"])
        .arg(cfg.path())
        .args(["run", "--ticks", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("done: 50 ticks"));
}

#[test]
fn bounded_sim_run_json_reports_counters() {
    let cfg = valid_config();
    let output = turngate()
        .args(["--config"])
        .arg(cfg.path())
        .args(["--json", "run", "--ticks", "20"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().last().expect("summary line");
    let v: serde_json::Value = serde_json::from_str(line).expect("json summary");
    assert_eq!(v["ok"], true);
    assert_eq!(v["ticks"], 20);
}
