//! Integration tests for the `fleetwatch` CLI binary.
//!
//! Argument parsing, help output and completions run without a service;
//! data commands run against a wiremock fleet service.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fleetwatch` binary with env isolation.
///
/// Clears all `FLEETWATCH_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn fleetwatch_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fleetwatch");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("FLEETWATCH_PROFILE")
        .env_remove("FLEETWATCH_API_URL")
        .env_remove("FLEETWATCH_WS_URL")
        .env_remove("FLEETWATCH_OUTPUT")
        .env_remove("FLEETWATCH_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn vehicle_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "vehicleNumber": format!("TRK-{id}"),
        "driverName": "Sam Rivera",
        "status": status,
        "destination": "West Yard",
        "currentLocation": { "lat": 51.5074, "lng": -0.1278 },
        "speed": 100.0,
        "lastUpdated": "2024-05-01T12:00:00Z",
        "batteryLevel": 64
    })
}

async fn fleet_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [vehicle_json("v1", "idle"), vehicle_json("v2", "en_route")],
            "total": 2,
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/status/en_route"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [vehicle_json("v2", "en_route")],
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/v9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Vehicle not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "total": 2, "idle": 1, "en_route": 1, "delivered": 0,
                "average_speed": 100.0, "timestamp": "2024-05-01T12:00:00Z"
            },
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = fleetwatch_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("vehicles")
                .and(predicate::str::contains("stats"))
                .and(predicate::str::contains("watch")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fleetwatch"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .arg("teleport")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_status_filter() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args(["vehicles", "list", "--status", "parked"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fleetwatch"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Data commands ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_vehicles_list_json() {
    let server = fleet_server().await;
    let home = tempfile::tempdir().unwrap();
    let mut cmd = fleetwatch_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "-o", "json", "vehicles", "list"]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let vehicles = body.as_array().unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[1]["vehicleNumber"], "TRK-v2");
    assert_eq!(vehicles[1]["status"], "en_route");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_vehicles_list_by_status_plain() {
    let server = fleet_server().await;
    let home = tempfile::tempdir().unwrap();
    let mut cmd = fleetwatch_cmd(home.path());
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "plain",
        "vehicles",
        "list",
        "--status",
        "en-route",
    ]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "v2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_vehicles_table_shows_mph() {
    let server = fleet_server().await;
    let home = tempfile::tempdir().unwrap();
    let mut cmd = fleetwatch_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "v", "ls"]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("62 mph"), "{stdout}");
    assert!(stdout.contains("En Route"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_vehicles_get_missing_exits_not_found() {
    let server = fleet_server().await;
    let home = tempfile::tempdir().unwrap();
    let mut cmd = fleetwatch_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "vehicles", "get", "v9"]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("Vehicle not found"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stats_detail() {
    let server = fleet_server().await;
    let home = tempfile::tempdir().unwrap();
    let mut cmd = fleetwatch_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "stats"]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Vehicles: 2"), "{stdout}");
    assert!(stdout.contains("Average Speed:  62 mph"), "{stdout}");
}

#[test]
fn test_unreachable_service_exits_connection() {
    let home = tempfile::tempdir().unwrap();
    let output = fleetwatch_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9", "--timeout", "2", "stats"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(text.contains("Network error"), "{text}");
}

#[test]
fn test_bad_api_url_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args(["--api-url", "ftp://fleet.example.com", "stats"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_under_home() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args([
            "--api-url",
            "http://localhost:5000",
            "--ws-url",
            "ws://localhost:5000",
            "config",
            "init",
            "--name",
            "local",
        ])
        .assert()
        .success();

    fleetwatch_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[local]")
                .and(predicate::str::contains("http://localhost:5000"))
                .and(predicate::str::contains("Default profile:  local")),
        );

    fleetwatch_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local *"));
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch_cmd(home.path())
        .args(["--profile", "prod", "stats"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}
