// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateless text matchers: amount extraction, time extraction, relevance
//! classification, destination-number validation.
//!
//! Extraction is best-effort. Absence of a match is not an error, just an
//! empty result; when a text holds several candidates, the first match by
//! scan order wins.

use std::sync::LazyLock;

use regex::Regex;

/// Currency prefix ("S/", "S.", "S/.") followed by a numeric value with
/// 0-2 decimal digits using either "." or "," as separator.
static AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(s/\s*|s\.\s*|s/\.\s*)([0-9]+([.,][0-9]{1,2})?)")
        .expect("amount regex is valid")
});

/// `HH:MM`, hour 0-23 with optional zero padding, minute 00-59.
static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([01]?\d|2[0-3]):[0-5]\d\b").expect("time regex is valid"));

/// Destination numbers: optional leading "+", 7-15 digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone regex is valid"));

/// Extracts the first currency amount from `text`, normalized to
/// `"S/ <value>"` with "." as the decimal separator. Empty string when no
/// amount is present.
pub fn extract_amount(text: &str) -> String {
    match AMOUNT_REGEX.captures(text) {
        Some(caps) => {
            let value = caps[2].replace(',', ".");
            format!("S/ {value}")
        }
        None => String::new(),
    }
}

/// Extracts the first `HH:MM` time from `text`, literally. Empty string
/// when no valid time is present.
pub fn extract_time(text: &str) -> String {
    TIME_REGEX
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// A text is relevant when it carries an amount pattern or contains any of
/// the configured keyword substrings, case-insensitively.
pub fn is_relevant(text: &str, keywords: &[String]) -> bool {
    if !extract_amount(text).is_empty() {
        return true;
    }
    let normalized = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| normalized.contains(&keyword.to_lowercase()))
}

/// Whether `number` is an acceptable destination address.
pub fn is_valid_number(number: &str) -> bool {
    PHONE_REGEX.is_match(number)
}
