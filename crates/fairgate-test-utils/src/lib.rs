// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Fairgate workspace.

pub mod mock_channel;

pub use mock_channel::MockChannel;
