// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.
//! Channel credential presence is deliberately NOT validated here: a missing
//! secret must surface at first channel acquisition, not at load time.

use crate::diagnostic::ConfigError;
use crate::model::FairgateConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors rather than failing fast.
pub fn validate_config(config: &FairgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.log.level
            ),
        });
    }

    if config.smtp.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "smtp.host must not be empty".to_string(),
        });
    }

    if config.smtp.port == 0 {
        errors.push(ConfigError::Validation {
            message: "smtp.port must be non-zero".to_string(),
        });
    }

    if config.smtp.token_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "smtp.token_url must not be empty".to_string(),
        });
    }

    // A set-but-malformed sender is a config mistake worth catching early;
    // an unset sender is a legitimate deferred-to-acquire state.
    if let Some(sender) = &config.smtp.sender
        && !sender.contains('@')
    {
        errors.push(ConfigError::Validation {
            message: format!("smtp.sender `{sender}` does not look like an email address"),
        });
    }

    if config.dispatch.send_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.send_timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(key) = &config.credential.signing_key
        && key.len() < 16
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "credential.signing_key must be at least 16 bytes, got {}",
                key.len()
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
