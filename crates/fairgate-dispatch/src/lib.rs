// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch dispatch of attendee notifications.
//!
//! [`BatchDispatcher`] iterates a list of attendees, mints a credential and
//! composes a message for each, and delivers over the shared channel. Each
//! unit of work returns a `Result` that is collected into one
//! [`DispatchReport`] entry -- a failure for one attendee never aborts or
//! skips the rest, and the report always holds exactly one outcome per
//! attendee, in input order. The only batch-fatal condition is a channel
//! that cannot authenticate at all.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use fairgate_compose as compose;
use fairgate_core::{
    Attendee, DeliveryReceipt, DispatchOutcome, DispatchReport, EventContext, FairgateError,
    MessageTemplate, OutboundChannel, OutboundEmail,
};
use fairgate_credential::{Credential, CredentialEncoder};

/// Drives one batch of sends against an injected channel.
///
/// The channel handle is the only shared resource; it is acquired lazily by
/// its own once-guard, so concurrent `dispatch` calls over one dispatcher
/// are safe.
pub struct BatchDispatcher {
    channel: Arc<dyn OutboundChannel>,
    encoder: CredentialEncoder,
    send_timeout: Duration,
}

impl BatchDispatcher {
    pub fn new(
        channel: Arc<dyn OutboundChannel>,
        encoder: CredentialEncoder,
        send_timeout: Duration,
    ) -> Self {
        Self {
            channel,
            encoder,
            send_timeout,
        }
    }

    /// Attempts every attendee exactly once and returns the full report.
    ///
    /// Returns `Err` only for batch-fatal conditions: an unauthenticatable
    /// channel ([`FairgateError::ChannelUnavailable`]) or a `VendorRollup`
    /// with no attendees or no vendor address
    /// ([`FairgateError::MissingField`]). Everything else is recorded as a
    /// `Failed` outcome and iteration continues.
    pub async fn dispatch(
        &self,
        attendees: &[Attendee],
        context: &EventContext,
        template: MessageTemplate,
    ) -> Result<DispatchReport, FairgateError> {
        info!(count = attendees.len(), template = %template, "dispatch started");

        let report = match template {
            MessageTemplate::VendorRollup => {
                self.dispatch_rollup(attendees, context).await?
            }
            MessageTemplate::CheckInCredential | MessageTemplate::QuizOnly => {
                self.dispatch_per_attendee(attendees, context, template)
                    .await?
            }
        };

        info!(
            sent = report.sent_count(),
            failed = report.failed_count(),
            "dispatch finished"
        );
        Ok(report)
    }

    async fn dispatch_per_attendee(
        &self,
        attendees: &[Attendee],
        context: &EventContext,
        template: MessageTemplate,
    ) -> Result<DispatchReport, FairgateError> {
        let mut report = DispatchReport::new();

        for attendee in attendees {
            match self.process_one(attendee, context, template).await {
                Ok(receipt) => {
                    report.push(DispatchOutcome::sent(attendee.email.clone(), receipt));
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(recipient = %attendee.email, error = %e, "attendee send failed");
                    report.push(DispatchOutcome::failed(attendee.email.clone(), e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Credential mint -> compose -> bounded send, for one attendee.
    async fn process_one(
        &self,
        attendee: &Attendee,
        context: &EventContext,
        template: MessageTemplate,
    ) -> Result<DeliveryReceipt, FairgateError> {
        let credential = match template {
            MessageTemplate::CheckInCredential => Some(self.encoder.encode(
                &attendee.email,
                &context.booth_name,
                &context.bazaar_name,
            )?),
            _ => None,
        };

        let message =
            compose::compose_for_attendee(template, attendee, context, credential.as_ref())?;
        self.bounded_send(message).await
    }

    /// One message to the vendor carrying every attendee's credential.
    ///
    /// The report still carries one outcome per attendee: an attendee whose
    /// credential cannot be minted is recorded `Failed` and left out of the
    /// roll-up; the remaining attendees share the single send's result.
    async fn dispatch_rollup(
        &self,
        attendees: &[Attendee],
        context: &EventContext,
    ) -> Result<DispatchReport, FairgateError> {
        if attendees.is_empty() {
            // Fail fast rather than send (or silently skip) an empty roll-up.
            return Err(FairgateError::MissingField {
                template: MessageTemplate::VendorRollup.to_string(),
                field: "attendees".to_string(),
            });
        }

        let mut entries: Vec<(Attendee, Credential)> = Vec::with_capacity(attendees.len());
        let mut encode_failures: Vec<Option<String>> = Vec::with_capacity(attendees.len());

        for attendee in attendees {
            match self.encoder.encode(
                &attendee.email,
                &context.booth_name,
                &context.bazaar_name,
            ) {
                Ok(credential) => {
                    entries.push((attendee.clone(), credential));
                    encode_failures.push(None);
                }
                Err(e) => {
                    warn!(recipient = %attendee.email, error = %e, "credential mint failed");
                    encode_failures.push(Some(e.to_string()));
                }
            }
        }

        let send_result = if entries.is_empty() {
            // Every credential failed; nothing to send.
            None
        } else {
            let message = compose::compose_vendor_rollup(&entries, context)?;
            match self.bounded_send(message).await {
                Err(e) if e.is_fatal() => return Err(e),
                result => Some(result),
            }
        };

        let mut report = DispatchReport::new();
        for (attendee, failure) in attendees.iter().zip(&encode_failures) {
            let outcome = match failure {
                Some(error) => DispatchOutcome::failed(attendee.email.clone(), error.clone()),
                None => match &send_result {
                    Some(Ok(receipt)) => {
                        DispatchOutcome::sent(attendee.email.clone(), receipt.clone())
                    }
                    Some(Err(e)) => DispatchOutcome::failed(attendee.email.clone(), e.to_string()),
                    None => DispatchOutcome::failed(
                        attendee.email.clone(),
                        "roll-up not sent: no credential could be minted".to_string(),
                    ),
                },
            };
            report.push(outcome);
        }

        Ok(report)
    }

    /// Sends with the configured per-send timeout so one unreachable
    /// recipient cannot stall the batch.
    async fn bounded_send(&self, message: OutboundEmail) -> Result<DeliveryReceipt, FairgateError> {
        let recipient = message.recipient.clone();
        match timeout(self.send_timeout, self.channel.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(FairgateError::Timeout {
                recipient,
                duration: self.send_timeout,
            }),
        }
    }
}
