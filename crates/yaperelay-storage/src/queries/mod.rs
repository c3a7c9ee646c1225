// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over the raw connection.

pub mod events;
pub mod settings;
