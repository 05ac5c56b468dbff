// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the persistence collaborator.

use alloy_primitives::B256;

/// Errors surfaced by a [`TransferStore`](crate::store::TransferStore).
///
/// `DuplicateKey` is only reported when a backend cannot silently skip a
/// conflicting row itself; bulk inserts treat it as a per-row skip, not a
/// batch failure. Any `Backend` error aborts the batch without advancing the
/// checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row with the same `(tx_hash, log_index)` already exists.
    #[error("transfer {tx_hash}#{log_index} already stored")]
    DuplicateKey {
        /// Transaction hash of the conflicting transfer
        tx_hash: B256,
        /// Log index of the conflicting transfer
        log_index: u64,
    },

    /// The collection a write refers to is not present in the store.
    #[error("unknown collection: {contract_address}")]
    UnknownCollection {
        /// The contract address that was not found
        contract_address: alloy_primitives::Address,
    },

    /// Backend failure (connection loss, constraint violation other than the
    /// transfer key, serialization failure, ...).
    #[error("store backend failure during {operation}")]
    Backend {
        /// Description of the failed operation
        operation: String,
        /// The underlying backend error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Create a `Backend` error from any underlying error type.
    pub fn backend(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::Backend {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}
