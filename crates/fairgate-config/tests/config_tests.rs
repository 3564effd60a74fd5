// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Fairgate configuration system.

use fairgate_config::diagnostic::ConfigError;
use fairgate_config::model::FairgateConfig;
use fairgate_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_fairgate_config() {
    let toml = r#"
[log]
level = "debug"

[smtp]
host = "smtp.example.com"
port = 2525
sender = "passes@fair.example"
client_id = "fairgate-app"
client_secret = "cs-123"
refresh_token = "rt-456"
token_url = "https://auth.example/token"

[credential]
signing_key = "a-key-of-sufficient-length"

[dispatch]
send_timeout_secs = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.smtp.host, "smtp.example.com");
    assert_eq!(config.smtp.port, 2525);
    assert_eq!(config.smtp.sender.as_deref(), Some("passes@fair.example"));
    assert_eq!(config.smtp.client_id.as_deref(), Some("fairgate-app"));
    assert_eq!(config.smtp.client_secret.as_deref(), Some("cs-123"));
    assert_eq!(config.smtp.refresh_token.as_deref(), Some("rt-456"));
    assert_eq!(config.smtp.token_url, "https://auth.example/token");
    assert_eq!(
        config.credential.signing_key.as_deref(),
        Some("a-key-of-sufficient-length")
    );
    assert_eq!(config.dispatch.send_timeout_secs, 10);
}

/// Missing sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.log.level, "info");
    assert_eq!(config.smtp.host, "smtp.gmail.com");
    assert_eq!(config.smtp.port, 587);
    assert!(config.smtp.sender.is_none());
    assert!(config.smtp.client_id.is_none());
    assert!(config.smtp.client_secret.is_none());
    assert!(config.smtp.refresh_token.is_none());
    assert_eq!(config.smtp.token_url, "https://oauth2.googleapis.com/token");
    assert!(config.credential.signing_key.is_none());
    assert_eq!(config.dispatch.send_timeout_secs, 30);
}

/// Unknown field in [smtp] produces a diagnostic, not a panic.
#[test]
fn unknown_field_produces_diagnostic() {
    let errors = load_and_validate_str("[smtp]\nsneder = \"x@y.com\"\n")
        .expect_err("should reject unknown field");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "sneder")),
        "expected an UnknownKey diagnostic, got: {errors:?}"
    );
}

/// The unknown-key diagnostic suggests the close valid key.
#[test]
fn unknown_field_suggests_correction() {
    let errors =
        load_and_validate_str("[smtp]\nsneder = \"x@y.com\"\n").expect_err("should reject");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("sender"));
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn semantic_validation_runs_after_deserialization() {
    let errors = load_and_validate_str("[dispatch]\nsend_timeout_secs = 0\n")
        .expect_err("zero timeout should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("send_timeout_secs")
    )));
}

/// FAIRGATE_SMTP_CLIENT_SECRET maps to smtp.client_secret, not smtp.client.secret.
#[test]
#[serial_test::serial]
fn env_var_overrides_with_underscore_keys() {
    unsafe {
        std::env::set_var("FAIRGATE_SMTP_CLIENT_SECRET", "from-env");
        std::env::set_var("FAIRGATE_DISPATCH_SEND_TIMEOUT_SECS", "7");
    }

    let config =
        fairgate_config::load_config_from_path(std::path::Path::new("/nonexistent/fairgate.toml"))
            .expect("env-only config should load");
    assert_eq!(config.smtp.client_secret.as_deref(), Some("from-env"));
    assert_eq!(config.dispatch.send_timeout_secs, 7);

    unsafe {
        std::env::remove_var("FAIRGATE_SMTP_CLIENT_SECRET");
        std::env::remove_var("FAIRGATE_DISPATCH_SEND_TIMEOUT_SECS");
    }
}

/// Plain serde deserialization honors deny_unknown_fields too.
#[test]
fn deny_unknown_fields_at_serde_level() {
    let result = toml::from_str::<FairgateConfig>("[credential]\nsigning_kee = \"x\"\n");
    assert!(result.is_err());
}
