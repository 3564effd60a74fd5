// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Fairgate dispatcher.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, producing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Fairgate configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; channel credentials left unset surface at first acquisition,
/// not at load time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FairgateConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Outbound SMTP channel settings.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Credential token settings.
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Batch dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Outbound SMTP channel configuration.
///
/// The four credential fields are `Option` on purpose: their absence must
/// surface as a channel error on first use, never as a startup crash.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// SMTP relay hostname.
    #[serde(default = "default_smtp_host")]
    pub host: String,

    /// SMTP submission port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Authorized sender address. Required at first acquisition.
    #[serde(default)]
    pub sender: Option<String>,

    /// OAuth application identity (client id). Required at first acquisition.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret. Required at first acquisition.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Long-lived refresh token exchanged for short-lived access tokens.
    /// Required at first acquisition.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token exchange endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            sender: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            token_url: default_token_url(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Credential token configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// HMAC-SHA256 signing key for issued tokens. `None` issues unsigned
    /// tokens (scanners can parse but not verify issuer authenticity).
    #[serde(default)]
    pub signing_key: Option<String>,
}

/// Batch dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Per-send timeout in seconds. One unreachable recipient must not
    /// stall the whole batch.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

fn default_send_timeout_secs() -> u64 {
    30
}
