// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP outbound channel for the Fairgate dispatcher.
//!
//! Implements [`OutboundChannel`] over lettre with lazy, once-guarded
//! acquisition: the first send (not process start) exchanges the long-lived
//! refresh secret for an access token, builds the authenticated transport,
//! and runs one connection probe. The resulting Ready or Failed state is
//! cached for the process lifetime -- a Failed acquisition is never retried,
//! and every later send short-circuits with the same error until restart.

pub mod token;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use fairgate_config::model::SmtpConfig;
use fairgate_core::{DeliveryReceipt, FairgateError, HealthStatus, OutboundChannel, OutboundEmail};

/// The acquired, reusable session: authenticated transport plus the parsed
/// sender mailbox. Read-only after acquisition; sends need no locking.
struct Handle {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

/// Authenticated SMTP channel, acquired once on first use.
///
/// Construction never fails: a missing or invalid secret surfaces as a
/// [`FairgateError::ChannelUnavailable`] from the first send that needs the
/// channel, not as a startup crash.
pub struct SmtpChannel {
    config: SmtpConfig,
    http: reqwest::Client,
    // Ready (Ok) or Failed (Err) once initialized; OnceCell serializes the
    // initializer so a raced first use acquires exactly once.
    handle: OnceCell<Result<Handle, String>>,
}

impl SmtpChannel {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            handle: OnceCell::new(),
        }
    }

    /// Returns the cached handle, acquiring it on first call.
    async fn handle(&self) -> Result<&Handle, FairgateError> {
        let slot = self
            .handle
            .get_or_init(|| async {
                match self.acquire().await {
                    Ok(handle) => {
                        info!(host = %self.config.host, "outbound channel ready");
                        Ok(handle)
                    }
                    Err(e) => {
                        let message = e.to_string();
                        error!(error = %message, "outbound channel acquisition failed");
                        Err(message)
                    }
                }
            })
            .await;

        match slot {
            Ok(handle) => Ok(handle),
            Err(message) => Err(FairgateError::ChannelUnavailable {
                message: message.clone(),
            }),
        }
    }

    /// One-time acquisition: secret exchange, transport construction, and a
    /// single connection probe before the channel is considered Ready.
    async fn acquire(&self) -> Result<Handle, FairgateError> {
        let sender = self.required("smtp.sender", self.config.sender.as_deref())?;
        let client_id = self.required("smtp.client_id", self.config.client_id.as_deref())?;
        let client_secret =
            self.required("smtp.client_secret", self.config.client_secret.as_deref())?;
        let refresh_token =
            self.required("smtp.refresh_token", self.config.refresh_token.as_deref())?;

        let sender: Mailbox = sender
            .parse()
            .map_err(|e| FairgateError::ChannelUnavailable {
                message: format!("smtp.sender is not a valid mailbox: {e}"),
            })?;

        debug!(token_url = %self.config.token_url, "exchanging refresh secret");
        let access = token::exchange(
            &self.http,
            &self.config.token_url,
            client_id,
            client_secret,
            refresh_token,
        )
        .await?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| FairgateError::ChannelUnavailable {
                message: format!("failed to build SMTP transport: {e}"),
            })?
            .port(self.config.port)
            .credentials(Credentials::new(
                sender.email.to_string(),
                access.access_token,
            ))
            .authentication(vec![Mechanism::Xoauth2])
            .build();

        // Verify the channel actually works before marking it Ready.
        let reachable =
            transport
                .test_connection()
                .await
                .map_err(|e| FairgateError::ChannelUnavailable {
                    message: format!("SMTP connection probe failed: {e}"),
                })?;
        if !reachable {
            return Err(FairgateError::ChannelUnavailable {
                message: format!(
                    "SMTP relay {}:{} did not accept the connection probe",
                    self.config.host, self.config.port
                ),
            });
        }

        Ok(Handle { transport, sender })
    }

    fn required<'a>(
        &self,
        key: &str,
        value: Option<&'a str>,
    ) -> Result<&'a str, FairgateError> {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| FairgateError::ChannelUnavailable {
                message: format!("{key} is not configured"),
            })
    }
}

#[async_trait]
impl OutboundChannel for SmtpChannel {
    async fn send(&self, email: OutboundEmail) -> Result<DeliveryReceipt, FairgateError> {
        let handle = self.handle().await?;

        let to: Mailbox = email
            .recipient
            .parse()
            .map_err(|e| FairgateError::Delivery {
                recipient: email.recipient.clone(),
                message: format!("invalid recipient address: {e}"),
                source: None,
            })?;

        let message = Message::builder()
            .from(handle.sender.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| FairgateError::Delivery {
                recipient: email.recipient.clone(),
                message: format!("failed to build message: {e}"),
                source: Some(Box::new(e)),
            })?;

        let response =
            handle
                .transport
                .send(message)
                .await
                .map_err(|e| FairgateError::Delivery {
                    recipient: email.recipient.clone(),
                    message: format!("SMTP send failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

        let detail: String = response.message().collect::<Vec<&str>>().join(" ");
        debug!(recipient = %email.recipient, response = %detail, "message accepted by relay");
        Ok(DeliveryReceipt(if detail.is_empty() {
            "accepted".to_string()
        } else {
            detail
        }))
    }

    async fn health_check(&self) -> Result<HealthStatus, FairgateError> {
        match self.handle().await {
            Ok(handle) => match handle.transport.test_connection().await {
                Ok(true) => Ok(HealthStatus::Healthy),
                Ok(false) => Ok(HealthStatus::Unhealthy(
                    "SMTP relay refused the connection probe".into(),
                )),
                Err(e) => Ok(HealthStatus::Unhealthy(format!(
                    "SMTP relay unreachable: {e}"
                ))),
            },
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}
