// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the log scanner.

use alloy_primitives::BlockNumber;

use super::{EstimationError, MetadataError, ProviderError, StoreError};
use crate::model::ScanReport;

/// Errors that abort a scan invocation.
///
/// `ResultTooLarge` never reaches the caller — the scanner absorbs it via its
/// backoff transition. Every variant here is terminal for the invocation; the
/// last committed checkpoint stays valid so the next invocation resumes
/// where this one stopped.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The provider failed in a non-recoverable way mid-scan.
    #[error("provider failure after {} calls: {source}", report.provider_calls)]
    Provider {
        /// The underlying provider error
        #[source]
        source: ProviderError,
        /// Counters accumulated up to the failure, for diagnostics
        report: ScanReport,
    },

    /// The persistence collaborator failed; the batch was aborted without a
    /// checkpoint advance.
    #[error("store failure after {} calls: {source}", report.provider_calls)]
    Store {
        /// The underlying store error
        #[source]
        source: StoreError,
        /// Counters accumulated up to the failure, for diagnostics
        report: ScanReport,
    },

    /// Resolving an unknown start block failed.
    #[error("start-block estimation failed: {0}")]
    Estimation(#[from] EstimationError),

    /// The metadata collaborator could not describe the collection.
    #[error("collection metadata unavailable: {0}")]
    Metadata(#[from] MetadataError),

    /// The resolved start block is past the chain head observed at scan
    /// start — nothing to scan and likely a stale checkpoint or clock skew.
    #[error("start block {start_block} is beyond chain head {head}")]
    StartBeyondHead {
        /// Block the scan would have started from
        start_block: BlockNumber,
        /// Chain head observed at scan start
        head: BlockNumber,
    },
}

impl ScanError {
    pub(crate) fn provider(source: ProviderError, report: ScanReport) -> Self {
        ScanError::Provider { source, report }
    }

    pub(crate) fn store(source: StoreError, report: ScanReport) -> Self {
        ScanError::Store { source, report }
    }

    /// Counters accumulated before the scan aborted, when the failure
    /// happened inside the scan loop.
    pub fn report(&self) -> Option<ScanReport> {
        match self {
            ScanError::Provider { report, .. } | ScanError::Store { report, .. } => Some(*report),
            _ => None,
        }
    }
}
