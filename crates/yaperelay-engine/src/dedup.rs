// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-time, bounded-size dedup window for redelivered notifications.
//!
//! Notification systems redeliver and update notifications in place, so the
//! same logical event can arrive more than once -- under the same key, or
//! under a fresh key with an identical payload. Two independent matching
//! strategies guard against both mechanisms.

/// How long an entry stays eligible for matching, in milliseconds.
pub const DEDUP_WINDOW_MS: i64 = 30_000;

/// Maximum retained entries. Notifications arrive at human timescales, so a
/// small bound keeps memory flat.
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
struct DedupEntry {
    post_time: i64,
    text: String,
    seen_at: i64,
}

/// Sliding-window duplicate detector keyed by notification key.
///
/// Entries are kept in insertion order; expiry is enforced lazily on every
/// check rather than by a timer, so window enforcement is exact to the
/// granularity of calls. Callers serialize access (the pipeline holds this
/// behind a mutex).
#[derive(Debug, Default)]
pub struct DedupWindow {
    entries: Vec<(String, DedupEntry)>,
}

impl DedupWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the notification identified by `key` / `post_time` / `text`
    /// is a repeat within the window. Records the notification when it is
    /// not. Uses the current process time.
    pub fn should_skip(&mut self, key: &str, post_time: i64, text: &str) -> bool {
        self.should_skip_at(key, post_time, text, chrono::Utc::now().timestamp_millis())
    }

    /// [`should_skip`](Self::should_skip) with an injectable clock, for tests.
    pub fn should_skip_at(&mut self, key: &str, post_time: i64, text: &str, now_ms: i64) -> bool {
        // Purge expired entries on every call.
        self.entries
            .retain(|(_, entry)| now_ms - entry.seen_at <= DEDUP_WINDOW_MS);

        // Presence of the key alone is sufficient to skip, regardless of
        // text or post time. The existing entry is not refreshed.
        if self.entries.iter().any(|(k, _)| k == key) {
            return true;
        }

        // Same payload under a different key.
        if self
            .entries
            .iter()
            .any(|(_, entry)| entry.text == text && entry.post_time == post_time)
        {
            return true;
        }

        self.entries.push((
            key.to_string(),
            DedupEntry {
                post_time,
                text: text.to_string(),
                seen_at: now_ms,
            },
        ));
        while self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }

        false
    }

    /// Drops all recorded entries.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_key(dedup: &DedupWindow, key: &str) -> bool {
        dedup.entries.iter().any(|(k, _)| k == key)
    }

    #[test]
    fn first_sight_is_not_skipped() {
        let mut dedup = DedupWindow::new();
        assert!(!dedup.should_skip_at("k1", 100, "hello", 1_000));
    }

    #[test]
    fn repeat_key_is_skipped() {
        let mut dedup = DedupWindow::new();
        assert!(!dedup.should_skip_at("k1", 100, "hello", 1_000));
        assert!(dedup.should_skip_at("k1", 100, "hello", 1_001));
    }

    #[test]
    fn repeat_key_skips_even_with_different_payload() {
        let mut dedup = DedupWindow::new();
        assert!(!dedup.should_skip_at("k1", 100, "hello", 1_000));
        assert!(dedup.should_skip_at("k1", 999, "different text", 1_001));
    }

    #[test]
    fn identical_payload_under_new_key_is_skipped() {
        let mut dedup = DedupWindow::new();
        assert!(!dedup.should_skip_at("k2", 100, "same text", 1_000));
        assert!(dedup.should_skip_at("k3", 100, "same text", 1_001));
    }

    #[test]
    fn same_text_different_post_time_is_not_a_duplicate() {
        let mut dedup = DedupWindow::new();
        assert!(!dedup.should_skip_at("k2", 100, "same text", 1_000));
        assert!(!dedup.should_skip_at("k3", 200, "same text", 1_001));
    }

    #[test]
    fn entry_expires_after_window() {
        let mut dedup = DedupWindow::new();
        assert!(!dedup.should_skip_at("k1", 100, "hello", 1_000));
        // Still inside the window.
        assert!(dedup.should_skip_at("k1", 100, "hello", 1_000 + DEDUP_WINDOW_MS));
        // Beyond it: purged, eligible again.
        assert!(!dedup.should_skip_at("k1", 100, "hello", 1_000 + DEDUP_WINDOW_MS + 1));
    }

    #[test]
    fn evicts_oldest_inserted_beyond_capacity() {
        let mut dedup = DedupWindow::new();
        for i in 0..=MAX_ENTRIES {
            assert!(!dedup.should_skip_at(&format!("k{i}"), i as i64, &format!("text {i}"), 1_000));
        }
        assert_eq!(dedup.len(), MAX_ENTRIES);
        assert!(!contains_key(&dedup, "k0"));
        assert!(contains_key(&dedup, "k1"));
        assert!(contains_key(&dedup, &format!("k{MAX_ENTRIES}")));
    }

    #[test]
    fn reset_clears_everything() {
        let mut dedup = DedupWindow::new();
        dedup.should_skip_at("k1", 100, "hello", 1_000);
        dedup.reset();
        assert!(dedup.is_empty());
        assert!(!dedup.should_skip_at("k1", 100, "hello", 1_001));
    }
}
