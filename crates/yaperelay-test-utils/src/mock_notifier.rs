// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock presentation notifier that counts refresh signals.

use std::sync::atomic::{AtomicUsize, Ordering};

use yaperelay_core::DashboardNotifier;

/// Counts refresh signals for assertion in tests.
#[derive(Debug, Default)]
pub struct MockNotifier {
    refreshes: AtomicUsize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl DashboardNotifier for MockNotifier {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
