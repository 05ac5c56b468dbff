// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the statistics engine.

use super::StoreError;

/// Errors from a statistics pass.
///
/// Pure computation never fails; only the store round-trips can. Degenerate
/// input (zero transfers) is not an error — the engine short-circuits with
/// `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Reading transfers or writing aggregates failed.
    #[error("store failure during statistics pass: {0}")]
    Store(#[from] StoreError),
}
