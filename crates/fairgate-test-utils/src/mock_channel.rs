// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound channel for deterministic testing.
//!
//! `MockChannel` implements [`OutboundChannel`] with the same lazy,
//! once-guarded acquisition shape as the real SMTP channel, plus scripted
//! per-recipient failures and stalls for exercising dispatcher isolation
//! and timeout behavior.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};

use fairgate_core::{DeliveryReceipt, FairgateError, HealthStatus, OutboundChannel, OutboundEmail};

/// A scriptable in-memory channel.
///
/// - **sent**: messages accepted by `send()` are captured for assertion
/// - **fail_recipient**: sends to that address fail with a delivery error
/// - **stall_recipient**: sends to that address sleep before completing
/// - **acquire_count**: how many acquisition attempts actually ran
pub struct MockChannel {
    ready: OnceCell<Result<(), String>>,
    acquire_count: Arc<AtomicUsize>,
    acquire_failure: Option<String>,
    failing: Mutex<HashSet<String>>,
    stalls: Mutex<HashMap<String, Duration>>,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MockChannel {
    /// Create a channel that acquires successfully on first use.
    pub fn new() -> Self {
        Self {
            ready: OnceCell::new(),
            acquire_count: Arc::new(AtomicUsize::new(0)),
            acquire_failure: None,
            failing: Mutex::new(HashSet::new()),
            stalls: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Create a channel whose acquisition fails with the given message.
    pub fn with_failed_acquire(message: impl Into<String>) -> Self {
        Self {
            acquire_failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Script sends to `recipient` to fail with a delivery error.
    pub async fn fail_recipient(&self, recipient: impl Into<String>) {
        self.failing.lock().await.insert(recipient.into());
    }

    /// Script sends to `recipient` to sleep for `duration` before completing.
    pub async fn stall_recipient(&self, recipient: impl Into<String>, duration: Duration) {
        self.stalls.lock().await.insert(recipient.into(), duration);
    }

    /// All messages accepted so far, in send order.
    pub async fn sent_messages(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Number of acquisition attempts that actually executed.
    pub fn acquire_count(&self) -> usize {
        self.acquire_count.load(Ordering::SeqCst)
    }

    async fn ensure_ready(&self) -> Result<(), FairgateError> {
        let slot = self
            .ready
            .get_or_init(|| async {
                self.acquire_count.fetch_add(1, Ordering::SeqCst);
                // Yield so raced first uses really overlap the initializer.
                tokio::task::yield_now().await;
                match &self.acquire_failure {
                    Some(message) => Err(message.clone()),
                    None => Ok(()),
                }
            })
            .await;

        slot.clone()
            .map_err(|message| FairgateError::ChannelUnavailable { message })
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboundChannel for MockChannel {
    async fn send(&self, email: OutboundEmail) -> Result<DeliveryReceipt, FairgateError> {
        self.ensure_ready().await?;

        if let Some(delay) = self.stalls.lock().await.get(&email.recipient).copied() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().await.contains(&email.recipient) {
            return Err(FairgateError::Delivery {
                recipient: email.recipient.clone(),
                message: "scripted delivery failure".into(),
                source: None,
            });
        }

        let receipt = format!("mock-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(email);
        Ok(DeliveryReceipt(receipt))
    }

    async fn health_check(&self) -> Result<HealthStatus, FairgateError> {
        match self.ensure_ready().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}
