#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DAY_FIXTURE: &str = include_str!("../../../fixtures/london/day_2024-03-11.json");

/// Writes a config.toml pointing the client at `server`.
fn write_config(dir: &Path, server: &MockServer) {
    let content = format!(
        "[api]\nbase_url = \"{}/api/times/\"\nmin_interval_ms = 0\ntimeout_secs = 5\n",
        server.uri()
    );
    std::fs::write(dir.join("config.toml"), content).unwrap();
}

fn fixture_without(field: &str) -> Value {
    let mut value: Value = serde_json::from_str(DAY_FIXTURE).unwrap();
    value.as_object_mut().unwrap().remove(field);
    value
}

#[test]
fn test_help_lists_feeds() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("week"))
        .stdout(predicate::str::contains("year"))
        .stdout(predicate::str::contains("ramadan"));
}

#[test]
fn test_week_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.args(["week", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--today"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_invalid_today_is_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.args(["week", "--today", "11/03/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--today"));
}

#[test]
fn test_missing_api_key_names_env_var() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.env_remove("LONDON_PRAYER_TIMES_API_KEY")
        .arg("--dir")
        .arg(dir.path())
        .args(["week", "--today", "2024-03-11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LONDON_PRAYER_TIMES_API_KEY"));
}

#[test]
fn test_ramadan_out_of_range_year() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.env_remove("LONDON_PRAYER_TIMES_API_KEY")
        .arg("--dir")
        .arg(dir.path())
        .args(["ramadan", "--year", "2100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the supported range"));
}

#[test]
fn test_config_init_writes_defaults() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    // Assert
    let content = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(content.contains("londonprayertimes.com"));
    assert!(content.contains("min_interval_ms = 100"));

    let mut again = cargo_bin_cmd!("prayerfeed");
    again
        .arg("--dir")
        .arg(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_week_feed_end_to_end() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/times/"))
        .and(query_param("key", "test-key"))
        .and(query_param("24hours", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAY_FIXTURE))
        .expect(7)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let output = dir.path().join("out").join("week.json");

    // Act
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.env("LONDON_PRAYER_TIMES_API_KEY", "test-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["week", "--today", "2024-03-11", "--output"])
        .arg(&output)
        .assert()
        .success();

    // Assert
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["timezone"], "Europe/London");
    assert_eq!(doc["effective_today"], "2024-03-11");
    assert_eq!(doc["days_count"], 7);
    assert_eq!(doc["days"][0]["date"], "2024-03-11");
    assert_eq!(doc["days"][6]["date"], "2024-03-17");
    assert_eq!(doc["days"][0]["maghrib_jamaah"], "18:10");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_incomplete_response_fails_without_output() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/times/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture_without("fajr")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    let output = dir.path().join("week.json");

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.env("LONDON_PRAYER_TIMES_API_KEY", "test-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["week", "--today", "2024-03-11", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fajr"))
        .stderr(predicate::str::contains("2024-03-11"));
    assert!(!output.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_key_fails() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/times/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("prayerfeed");
    cmd.env("LONDON_PRAYER_TIMES_API_KEY", "wrong-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["week", "--today", "2024-03-11", "--output"])
        .arg(dir.path().join("week.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"))
        .stderr(predicate::str::contains("wrong-key").not());
}
