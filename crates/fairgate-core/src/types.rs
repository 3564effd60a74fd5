// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Fairgate workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A registered attendee, owned by registration storage and read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub booth_id: String,
}

/// Per-batch event context. Immutable for the duration of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub booth_name: String,
    pub bazaar_name: String,
    /// Base URL for check-in deep links, e.g. `https://fair.example/checkin`.
    pub check_in_base_url: String,
    /// Recipient for the `VendorRollup` template. Required only for that template.
    #[serde(default)]
    pub vendor_email: Option<String>,
}

/// The closed set of message templates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MessageTemplate {
    /// Credential image plus a deep link into the check-in/quiz flow.
    CheckInCredential,
    /// Deep link only, no credential.
    QuizOnly,
    /// One message to the vendor containing every attendee's credential.
    VendorRollup,
}

/// A rendered, ready-to-send message. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Opaque acknowledgement returned by a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt(pub String);

/// Health reported by a channel probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Channel is ready for sends.
    Healthy,
    /// Channel is not operational.
    Unhealthy(String),
}

/// Outcome of one attendee's send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent { receipt: DeliveryReceipt },
    Failed { error: String },
}

/// One report entry per attendee attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Identifier of the recipient this outcome belongs to (attendee email,
    /// or the vendor address for rollups).
    pub attendee: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

impl DispatchOutcome {
    pub fn sent(attendee: impl Into<String>, receipt: DeliveryReceipt) -> Self {
        Self {
            attendee: attendee.into(),
            status: DeliveryStatus::Sent { receipt },
        }
    }

    pub fn failed(attendee: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            attendee: attendee.into(),
            status: DeliveryStatus::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self.status, DeliveryStatus::Sent { .. })
    }
}

/// Aggregate result of one batch. Entries preserve attendee input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: DispatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[DispatchOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.sent_count()
    }
}

impl IntoIterator for DispatchReport {
    type Item = DispatchOutcome;
    type IntoIter = std::vec::IntoIter<DispatchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}
