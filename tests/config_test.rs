//! Tests for loading ledger configuration from TOML.

use std::fs;
use std::time::Duration;
use strictly_connect4::Address;
use strictly_ledger::LedgerConfig;
use tempfile::TempDir;

#[test]
fn test_defaults_applied() {
    let config = LedgerConfig::from_toml(
        r#"
gateway_url = "http://localhost:8545"
account = "0xa11ce00000000000000000000000000000000001"
"#,
    )
    .expect("Config should parse");

    assert_eq!(config.gateway_url(), "http://localhost:8545");
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert_eq!(config.tick_interval(), Duration::from_secs(1));
    assert_eq!(*config.request_timeout_ms(), 10_000);
    assert_eq!(*config.default_timeout_secs(), 60);
    assert_eq!(
        config.require_account().expect("account"),
        &Address::new("0xA11CE00000000000000000000000000000000001")
    );
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("ledger.toml");
    fs::write(
        &path,
        r#"
gateway_url = "http://gateway.test"
account = "0xb0b0000000000000000000000000000000000002"
poll_interval_ms = 2000
tick_interval_ms = 250
default_timeout_secs = 300
"#,
    )
    .expect("Failed to write TOML");

    let config = LedgerConfig::from_file(&path).expect("Config should load");
    assert_eq!(config.poll_interval(), Duration::from_secs(2));
    assert_eq!(config.tick_interval(), Duration::from_millis(250));
    assert_eq!(*config.default_timeout_secs(), 300);
}

#[test]
fn test_missing_gateway_rejected() {
    let err = LedgerConfig::from_toml("poll_interval_ms = 100").expect_err("gateway_url required");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_zero_interval_rejected() {
    let err = LedgerConfig::from_toml(
        r#"
gateway_url = "http://localhost"
account = "0x01"
tick_interval_ms = 0
"#,
    )
    .expect_err("zero tick");
    assert!(err.message.contains("non-zero"));
}

#[test]
fn test_missing_file_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = LedgerConfig::from_file(dir.path().join("absent.toml")).expect_err("no file");
    assert!(err.message.contains("Failed to read config file"));
}
