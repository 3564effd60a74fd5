// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exchange of the long-lived refresh secret for a short-lived access token.
//!
//! One round trip against the configured token endpoint, performed as part
//! of channel acquisition. The access token lives only as long as the
//! process's SMTP session; there is no refresh loop.

use serde::Deserialize;
use tracing::debug;

use fairgate_core::FairgateError;

/// A short-lived access credential returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Performs the refresh-token grant against `token_url`.
///
/// Any failure (network, non-2xx status, unparseable body) maps to
/// [`FairgateError::ChannelUnavailable`] -- a channel that cannot
/// authenticate is unusable, not degraded.
pub async fn exchange(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<AccessToken, FairgateError> {
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let response = http
        .post(token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| FairgateError::ChannelUnavailable {
            message: format!("token exchange request failed: {e}"),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FairgateError::ChannelUnavailable {
            message: format!("token endpoint returned {status}: {body}"),
        });
    }

    let token: AccessToken =
        response
            .json()
            .await
            .map_err(|e| FairgateError::ChannelUnavailable {
                message: format!("token endpoint returned an unparseable body: {e}"),
            })?;

    debug!(expires_in = ?token.expires_in, "access token obtained");
    Ok(token)
}
