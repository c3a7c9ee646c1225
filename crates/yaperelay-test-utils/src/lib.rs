// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for yaperelay integration tests: mock collaborators and
//! an end-to-end harness over a scratch database.

pub mod harness;
pub mod mock_notifier;
pub mod mock_sender;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_notifier::MockNotifier;
pub use mock_sender::MockSender;
