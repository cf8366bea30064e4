use stats_probe::config::{mask_token, ConfigOverrides, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use stats_probe::{ProbeConfig, ProbeError};
use std::fs;

#[test]
fn test_defaults_need_a_token() {
    let config = ProbeConfig::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    assert!(matches!(config.validate(), Err(ProbeError::Config(_))));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let config = ProbeConfig::load_or_default(path.to_str().unwrap()).unwrap();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert!(config.api.token.is_none());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.toml");
    fs::write(
        &path,
        "[api]\nbase_url = \"https://tracker.example.com/\"\ntoken = \"abc\"\n\n[output]\nverbosity = 1\n",
    )
    .unwrap();

    let config = ProbeConfig::load_or_default(path.to_str().unwrap()).unwrap();
    assert_eq!(config.base_url(), "https://tracker.example.com");
    assert_eq!(config.api.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    assert_eq!(config.output.verbosity, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_broken_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[api\nbase_url = ").unwrap();

    let result = ProbeConfig::load_or_default(path.to_str().unwrap());
    assert!(matches!(result, Err(ProbeError::Config(_))));
}

#[test]
fn test_overrides_win_over_file() {
    let mut config = ProbeConfig::default();
    config.api.token = Some("from-file".to_string());

    config.apply(ConfigOverrides {
        base_url: Some("http://10.0.0.5:9000".to_string()),
        token: Some("from-flag".to_string()),
        timeout_seconds: Some(3),
        verbosity: None,
        api_log_path: Some("api.log".to_string()),
    });

    assert_eq!(config.base_url(), "http://10.0.0.5:9000");
    assert_eq!(config.api.token.as_deref(), Some("from-flag"));
    assert_eq!(config.api.timeout_seconds, 3);
    assert_eq!(config.output.verbosity, 0);
    assert_eq!(config.output.api_log_path.as_deref(), Some("api.log"));
}

#[test]
fn test_validation_rules() {
    let mut config = ProbeConfig::default();
    config.api.token = Some("   ".to_string());
    assert!(config.validate().is_err(), "blank token");

    config.api.token = Some("t".to_string());
    config.api.base_url = "localhost:8000".to_string();
    assert!(config.validate().is_err(), "scheme required");

    config.api.base_url = DEFAULT_BASE_URL.to_string();
    config.api.timeout_seconds = 0;
    assert!(config.validate().is_err(), "zero timeout");

    config.api.timeout_seconds = 10;
    assert!(config.validate().is_ok());
}

#[test]
fn test_saved_default_has_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("stats_probe.toml");
    ProbeConfig::default().save(path.to_str().unwrap()).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(!written.contains("token"));
    assert!(written.contains(DEFAULT_BASE_URL));
}

#[test]
fn test_mask_token() {
    assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9"), "eyJhbG…");
    assert_eq!(mask_token("abc"), "***");
    assert_eq!(mask_token(""), "");
}

#[test]
fn test_unusable_token_is_a_config_error() {
    let mut config = ProbeConfig::default();
    config.api.token = Some("abc\ndef".to_string());
    let result = stats_probe::TimeTrackerClient::new(&config);
    assert!(matches!(result, Err(ProbeError::Config(_))));
}
