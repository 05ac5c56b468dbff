// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the blockchain provider collaborator.

/// Errors surfaced by a [`ChainClient`](crate::provider::ChainClient).
///
/// Only [`ResultTooLarge`](ProviderError::ResultTooLarge) is recoverable: the
/// scanner reacts to it by shrinking its window and retrying the same start
/// block. Everything else aborts the current scan, leaving the last committed
/// checkpoint in place for a future resumable retry.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider refused to serve the response because it exceeded its
    /// (undocumented) page ceiling.
    #[error("result exceeds the provider page ceiling for {operation}")]
    ResultTooLarge {
        /// Description of the request that overflowed (e.g. "logs 100-200")
        operation: String,
    },

    /// The provider throttled the request.
    #[error("provider rate limited {operation}")]
    RateLimited {
        /// Description of the throttled request
        operation: String,
    },

    /// Connectivity or provider-side failure that is neither a page overflow
    /// nor an explicit throttle.
    #[error("network failure during {operation}")]
    Network {
        /// Description of the failed request
        operation: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The requested block does not exist on the provider.
    ///
    /// Different from a failed call: the RPC succeeded but returned nothing.
    #[error("block not found: {block_number}")]
    BlockNotFound {
        /// The block height that was not found
        block_number: u64,
    },
}

impl ProviderError {
    /// Create a `ResultTooLarge` error for the described request.
    pub fn result_too_large(operation: impl Into<String>) -> Self {
        ProviderError::ResultTooLarge {
            operation: operation.into(),
        }
    }

    /// Create a `RateLimited` error for the described request.
    pub fn rate_limited(operation: impl Into<String>) -> Self {
        ProviderError::RateLimited {
            operation: operation.into(),
        }
    }

    /// Create a `Network` error from any underlying error type.
    pub fn network(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Network {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Whether the scanner may recover from this error by shrinking its
    /// window and retrying.
    pub fn is_result_too_large(&self) -> bool {
        matches!(self, ProviderError::ResultTooLarge { .. })
    }
}
