// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification processing engine for yaperelay.
//!
//! Three pieces: stateless pattern extraction ([`extract`]), a bounded
//! sliding-window duplicate detector ([`dedup`]), and the pipeline that
//! orchestrates them against the collaborator traits ([`pipeline`]).

pub mod dedup;
pub mod extract;
pub mod pipeline;

pub use dedup::{DedupWindow, DEDUP_WINDOW_MS, MAX_ENTRIES};
pub use pipeline::{EventPipeline, Outcome};
