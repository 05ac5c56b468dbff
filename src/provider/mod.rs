// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain provider collaborator
//!
//! The scanner and estimator never talk to an RPC endpoint directly; they
//! depend on the narrow [`ChainClient`] capability set, which keeps them
//! testable against scripted fixtures. [`RpcChainClient`] is the production
//! implementation over any Alloy provider.

mod filter;
mod rpc;

pub use filter::{TransferLogFilter, TRANSFER_EVENT_SIGNATURE};
pub use rpc::{connect_http, RpcChainClient};

use alloy_primitives::{Address, BlockNumber};
use alloy_rpc_types::Log;
use async_trait::async_trait;

use crate::errors::ProviderError;

/// Capability set the indexer needs from a blockchain provider.
///
/// Three calls, all blocking suspension points of the scan loop:
/// chain-head lookup, block-timestamp lookup (the estimator's oracle), and
/// the filtered log fetch itself.
///
/// # Errors
///
/// `transfer_logs` fails with [`ProviderError::ResultTooLarge`] when the
/// requested window exceeds the provider's page ceiling; the scanner treats
/// that as recoverable. All other failures abort the current operation.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current chain head height.
    async fn chain_head(&self) -> Result<BlockNumber, ProviderError>;

    /// Timestamp (Unix seconds) of the block at `height`.
    ///
    /// Monotonic in `height`; the estimator relies on this.
    async fn block_timestamp(&self, height: BlockNumber) -> Result<u64, ProviderError>;

    /// Transfer-event logs emitted by `contract` in `[from_block, to_block]`
    /// (both inclusive), filtered by the transfer topic signature.
    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Log>, ProviderError>;
}

// Forwarding impls so components can borrow or share a client without
// caring how the caller owns it, mirroring Alloy's Provider convention.

#[async_trait]
impl<C: ChainClient + ?Sized> ChainClient for &C {
    async fn chain_head(&self) -> Result<BlockNumber, ProviderError> {
        (**self).chain_head().await
    }

    async fn block_timestamp(&self, height: BlockNumber) -> Result<u64, ProviderError> {
        (**self).block_timestamp(height).await
    }

    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Log>, ProviderError> {
        (**self).transfer_logs(contract, from_block, to_block).await
    }
}

#[async_trait]
impl<C: ChainClient + ?Sized> ChainClient for std::sync::Arc<C> {
    async fn chain_head(&self) -> Result<BlockNumber, ProviderError> {
        (**self).chain_head().await
    }

    async fn block_timestamp(&self, height: BlockNumber) -> Result<u64, ProviderError> {
        (**self).block_timestamp(height).await
    }

    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Log>, ProviderError> {
        (**self).transfer_logs(contract, from_block, to_block).await
    }
}
