// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./fairgate.toml` > `~/.config/fairgate/fairgate.toml`
//! > `/etc/fairgate/fairgate.toml` with environment variable overrides via
//! the `FAIRGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FairgateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/fairgate/fairgate.toml` (system-wide)
/// 3. `~/.config/fairgate/fairgate.toml` (user XDG config)
/// 4. `./fairgate.toml` (local directory)
/// 5. `FAIRGATE_*` environment variables
pub fn load_config() -> Result<FairgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FairgateConfig::default()))
        .merge(Toml::file("/etc/fairgate/fairgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("fairgate/fairgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("fairgate.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FairgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FairgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FairgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FairgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FAIRGATE_SMTP_CLIENT_SECRET` must map
/// to `smtp.client_secret`, not `smtp.client.secret`.
fn env_provider() -> Env {
    Env::prefixed("FAIRGATE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("log_", "log.", 1)
            .replacen("smtp_", "smtp.", 1)
            .replacen("credential_", "credential.", 1)
            .replacen("dispatch_", "dispatch.", 1);
        mapped.into()
    })
}
