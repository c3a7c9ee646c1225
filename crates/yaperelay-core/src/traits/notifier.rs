// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presentation refresh signal.

/// Fire-and-forget "refresh" signal toward any presentation surface
/// (dashboard, widget). At-most-once best effort, no return value, no
/// delivery guarantee.
pub trait DashboardNotifier: Send + Sync {
    fn refresh(&self);
}

/// A notifier that does nothing; for headless deployments and tests that
/// don't assert on refreshes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl DashboardNotifier for NoopNotifier {
    fn refresh(&self) {}
}
