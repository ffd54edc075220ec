//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the cableroute-cli binary (finds it in target/debug when run via cargo test).
fn cableroute_cli() -> Command {
    cargo_bin_cmd!("cableroute-cli")
}

/// Path to cableroute library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("cableroute")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = cableroute_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("BS 7671"));
}

#[test]
fn test_cli_version() {
    let mut cmd = cableroute_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_route_human() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("straight_route.json");

    cmd.arg("route").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Board to isolator"))
        .stdout(predicate::str::contains("Length:     2.00 m"))
        .stdout(predicate::str::contains("BS 7671 Appendix 4"));
}

#[test]
fn test_cli_route_json_output() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("straight_route.json");

    cmd.arg("route").arg(path).arg("--format").arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["path"]["kind"], "found");
    assert_eq!(json["checks"].as_array().map(Vec::len), Some(9));
    assert_eq!(json["summary"]["info"], 3);
}

#[test]
fn test_cli_route_with_config() {
    let mut cmd = cableroute_cli();
    let route = fixtures_dir().join("straight_route.json");
    let config = fixtures_dir().join("settings.json");

    cmd.arg("route").arg(route).arg("--config").arg(config);

    cmd.assert().success();
}

#[test]
fn test_cli_route_fail_on_fail() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("blocked_route.json");

    cmd.arg("route").arg(path).arg("--fail-on").arg("fail");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("No routed path"));
}

#[test]
fn test_cli_route_fail_on_warning() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("straight_route.json");

    // Support spacing sits on the limit, which is a warning
    cmd.arg("route").arg(&path).arg("--fail-on").arg("fail");
    cmd.assert().success();

    let mut cmd = cableroute_cli();
    cmd.arg("route").arg(&path).arg("--fail-on").arg("warning");
    cmd.assert().failure();
}

#[test]
fn test_cli_nonexistent_file() {
    let mut cmd = cableroute_cli();

    cmd.arg("route").arg("nonexistent.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    std::fs::write(&config, r#"{ "pathfinding": { "grid_size": 0 } }"#).unwrap();

    let mut cmd = cableroute_cli();
    cmd.arg("route")
        .arg(fixtures_dir().join("straight_route.json"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("grid_size"));
}

#[test]
fn test_cli_rules() {
    let mut cmd = cableroute_cli();

    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("voltage-drop"))
        .stdout(predicate::str::contains("cable-identification"));
}

#[test]
fn test_cli_rules_verbose() {
    let mut cmd = cableroute_cli();

    cmd.arg("rules").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Voltage drop between origin and load"));
}

#[test]
fn test_cli_path_open_plane() {
    let mut cmd = cableroute_cli();

    cmd.args([
        "path", "--width", "1000", "--height", "1000", "--start", "0,0", "--end", "200,0",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Path found (2 vertices)"))
        .stdout(predicate::str::contains("(200, 0)"));
}

#[test]
fn test_cli_path_blocked_json() {
    let mut cmd = cableroute_cli();

    cmd.args([
        "path",
        "--width",
        "1000",
        "--height",
        "1000",
        "--start",
        "100,500",
        "--end",
        "900,500",
        "--obstacle",
        "480,0,40,1000",
        "--format",
        "json",
    ]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["kind"], "fallback");
    assert_eq!(json["reason"], "unreachable");
}

#[test]
fn test_cli_path_stops_at_expansion_budget() {
    let mut cmd = cableroute_cli();

    cmd.args([
        "path",
        "--width",
        "1000",
        "--height",
        "1000",
        "--start",
        "0,0",
        "--end",
        "900,900",
        "--max-expansions",
        "3",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("search budget exhausted"));
}

#[test]
fn test_cli_path_uses_config_settings() {
    let mut cmd = cableroute_cli();
    let config = fixtures_dir().join("settings.json");

    cmd.args([
        "path", "--width", "1000", "--height", "1000", "--start", "0,0", "--end", "200,0",
    ])
    .arg("--config")
    .arg(config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Grid 25 with 0 obstacles"))
        .stdout(predicate::str::contains("Path found (2 vertices)"));
}

#[test]
fn test_cli_path_far_outside_start_falls_back() {
    let mut cmd = cableroute_cli();

    cmd.args([
        "path", "--width", "1000", "--height", "1000", "--start", "1e30,0", "--end", "0,0",
        "--format", "json",
    ]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["kind"], "fallback");
    assert_eq!(json["reason"], "unreachable");
}

#[test]
fn test_cli_path_rejects_malformed_point() {
    let mut cmd = cableroute_cli();

    cmd.args([
        "path", "--width", "1000", "--height", "1000", "--start", "0", "--end", "200,0",
    ]);

    cmd.assert().failure();
}

#[test]
fn test_cli_clash() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("services.json");

    cmd.arg("clash").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tray-01"))
        .stdout(predicate::str::contains("Critical: 1"))
        .stdout(predicate::str::contains("Major:    1"));
}

#[test]
fn test_cli_clash_json() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("services.json");

    cmd.arg("clash").arg(path).arg("--format").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tray-01:duct-07"))
        .stdout(predicate::str::contains("tray-01:pipe-12"));
}

#[test]
fn test_cli_verbose_logs_to_stderr() {
    let mut cmd = cableroute_cli();
    let path = fixtures_dir().join("straight_route.json");

    cmd.arg("-v").arg("route").arg(path).arg("--format").arg("json");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Routing"));
}
