// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Fairgate credential and dispatch system.
//!
//! Provides the shared domain types, the error taxonomy, and the
//! [`OutboundChannel`] trait implemented by delivery backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FairgateError;
pub use traits::OutboundChannel;
pub use types::{
    Attendee, DeliveryReceipt, DeliveryStatus, DispatchOutcome, DispatchReport, EventContext,
    HealthStatus, MessageTemplate, OutboundEmail,
};
