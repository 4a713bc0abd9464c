// Tests for server configuration loading

use chgraph_web::{ServerConfig, load_server_config};
use std::fs;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_server_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.address(), "127.0.0.1:8080");
    assert_eq!(config.upstream, "https://beta.companieshouse.gov.uk");
    assert_eq!(config.timeout_secs, 10);
    assert_eq!(config.max_listed, 35);
}

#[test]
fn test_file_overrides_some_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "port = 9090\nupstream = \"http://127.0.0.1:1234\"\n").unwrap();

    let config = load_server_config(&path).unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.upstream, "http://127.0.0.1:1234");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.max_listed, 35);
}

#[test]
fn test_invalid_value_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "port = \"not a port\"\n").unwrap();

    assert!(load_server_config(&path).is_err());
}
