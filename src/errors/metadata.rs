// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the collection-metadata collaborator.

/// Errors surfaced by a [`CollectionMetadata`](crate::metadata::CollectionMetadata)
/// source.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The metadata source has no entry for the requested contract.
    #[error("no metadata for contract {contract_address}")]
    UnknownContract {
        /// The contract address that was looked up
        contract_address: alloy_primitives::Address,
    },

    /// The lookup itself failed (HTTP failure, malformed response, ...).
    #[error("metadata lookup failed: {details}")]
    LookupFailed {
        /// Details about the failure
        details: String,
    },
}

impl MetadataError {
    /// Create a `LookupFailed` error with details.
    pub fn lookup_failed(details: impl Into<String>) -> Self {
        MetadataError::LookupFailed {
            details: details.into(),
        }
    }
}
