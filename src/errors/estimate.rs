// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for block-height estimation.

use super::ProviderError;

/// Errors from the timestamp-to-block-height estimator.
///
/// Oracle failures propagate unchanged; the estimator never retries
/// internally. Callers may retry the whole estimation.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    /// A timestamp-oracle call failed mid-search.
    #[error("oracle failure during block-height estimation: {0}")]
    Oracle(#[from] ProviderError),

    /// The search interval is unusable (e.g. a zero-height chain).
    #[error("invalid search bounds: {reason}")]
    InvalidBounds {
        /// What made the bounds unusable
        reason: String,
    },
}

impl EstimationError {
    /// Create an `InvalidBounds` error with a reason.
    pub fn invalid_bounds(reason: impl Into<String>) -> Self {
        EstimationError::InvalidBounds {
            reason: reason.into(),
        }
    }
}
