// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound channel trait for authenticated message delivery.

use async_trait::async_trait;

use crate::error::FairgateError;
use crate::types::{DeliveryReceipt, HealthStatus, OutboundEmail};

/// An authenticated, process-scoped delivery channel.
///
/// Implementations acquire their underlying session lazily on the first
/// `send` and reuse it for every subsequent send. Acquisition must happen
/// exactly once even when first use is raced from concurrent tasks; a failed
/// acquisition is terminal for the process, and later sends must return
/// [`FairgateError::ChannelUnavailable`] without re-attempting it.
///
/// `send` carries no retry or dedup logic of its own -- retry policy belongs
/// to the caller.
#[async_trait]
pub trait OutboundChannel: Send + Sync + 'static {
    /// Delivers one message, returning the channel's acknowledgement.
    async fn send(&self, email: OutboundEmail) -> Result<DeliveryReceipt, FairgateError>;

    /// Probes the channel, acquiring it first if it has never been used.
    async fn health_check(&self) -> Result<HealthStatus, FairgateError>;
}
