// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams implemented by delivery backends.

pub mod channel;

pub use channel::OutboundChannel;
