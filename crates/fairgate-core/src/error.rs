// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Fairgate dispatcher.

use thiserror::Error;

/// The primary error type used across Fairgate crates.
#[derive(Debug, Error)]
pub enum FairgateError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential construction failed (serialization or barcode rendering).
    #[error("encoding error: {message}")]
    Encoding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A message template was given incomplete data.
    #[error("missing field `{field}` for template {template}")]
    MissingField { template: String, field: String },

    /// Channel acquisition failed. Fatal for the process until restart:
    /// every subsequent send short-circuits with this error.
    #[error("outbound channel unavailable: {message}")]
    ChannelUnavailable { message: String },

    /// An individual send failed. Recoverable, isolated to one recipient.
    #[error("delivery to {recipient} failed: {message}")]
    Delivery {
        recipient: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A send exceeded the configured per-send timeout.
    #[error("delivery to {recipient} timed out after {duration:?}")]
    Timeout {
        recipient: String,
        duration: std::time::Duration,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FairgateError {
    /// Whether this error aborts a whole batch rather than a single attendee.
    ///
    /// Only a channel that cannot authenticate is fatal -- there is no point
    /// attempting the remaining sends against it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FairgateError::ChannelUnavailable { .. })
    }
}
