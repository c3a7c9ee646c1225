// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message sender for deterministic testing.
//!
//! `MockSender` implements `MessageSender` with captured deliveries and
//! scriptable per-number failures for assertion in tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::Mutex;

use yaperelay_core::{MessageSender, RelayError};

/// A mock delivery transport.
///
/// Deliveries passed to `send()` are captured and retrievable via
/// [`sent_messages`](MockSender::sent_messages); numbers registered with
/// [`fail_number`](MockSender::fail_number) reject delivery.
pub struct MockSender {
    available: AtomicBool,
    failing: StdMutex<HashSet<String>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            failing: StdMutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Toggle the send-permission analog.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every delivery to `number` fail.
    pub fn fail_number(&self, number: &str) {
        self.failing
            .lock()
            .expect("failing set poisoned")
            .insert(number.to_string());
    }

    /// All `(number, text)` pairs delivered so far, in order.
    pub async fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSender for MockSender {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn send(&self, number: &str, text: &str) -> Result<(), RelayError> {
        let failing = self
            .failing
            .lock()
            .expect("failing set poisoned")
            .contains(number);
        if failing {
            return Err(RelayError::Send {
                message: format!("mock transport rejected {number}"),
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((number.to_string(), text.to_string()));
        Ok(())
    }
}
