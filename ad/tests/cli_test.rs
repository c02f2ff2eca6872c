//! Command-line tests for the `ad` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `ad` isolated from the developer's config, logs and environment
fn ad(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ad").expect("binary");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("AUTODEV_API_URL")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().expect("temp dir");
    ad(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("AUTODEV_API_URL"));
}

#[test]
fn test_missing_endpoint_fails_fast() {
    let home = TempDir::new().expect("temp dir");
    ad(&home)
        .args(["plan", "Ship it"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_blank_endpoint_counts_as_missing() {
    let home = TempDir::new().expect("temp dir");
    ad(&home)
        .env("AUTODEV_API_URL", "   ")
        .args(["health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_origin_from_config_file() {
    let home = TempDir::new().expect("temp dir");
    std::fs::write(home.path().join(".autodev.yml"), "api:\n  origin: \"http://127.0.0.1:9\"\n")
        .expect("write config");

    // The origin is used, so this gets as far as the network and fails there
    ad(&home)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured").not())
        .stderr(predicate::str::contains("unreachable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/plan"))
        .and(body_json(json!({ "goal": "Ship it" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "s-42",
            "goal": "Ship it",
            "plan": ["Analyze", "Build"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    ad(&home)
        .args(["--api-url", &format!("{}///", server.uri()), "plan", "Ship it", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"session_id\": \"s-42\""))
        .stdout(predicate::str::contains("\"Build\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_text_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "s-42",
            "goal": "Ship it",
            "plan": ["Analyze", "Build"]
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    ad(&home)
        .env("AUTODEV_API_URL", server.uri())
        .args(["plan", "Ship it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Analyze"))
        .stdout(predicate::str::contains("2. Build"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let home = TempDir::new().expect("temp dir");
    ad(&home)
        .args(["-u", &server.uri(), "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}
