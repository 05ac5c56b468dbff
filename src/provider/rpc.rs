// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Alloy-backed [`ChainClient`] implementation
//!
//! Wraps any Alloy provider and maps transport failures onto
//! [`ProviderError`]. Providers do not agree on how they report a log query
//! that overflows their page ceiling — Infura answers `-32005 "query
//! returned more than 10000 results"`, Alchemy `-32602 "Log response size
//! exceeded"` — so classification goes by the error payload message rather
//! than the code.

use alloy_primitives::{Address, BlockNumber};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::Log;
use alloy_transport::TransportError;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{ChainClient, TransferLogFilter};
use crate::errors::ProviderError;

/// Production [`ChainClient`] over an Alloy provider.
///
/// # Examples
///
/// ```rust,ignore
/// use transferscan::provider::{connect_http, RpcChainClient};
///
/// let client = connect_http("https://mainnet.example.org/v3/key".parse()?);
/// let head = client.chain_head().await?;
/// ```
pub struct RpcChainClient<P> {
    provider: P,
}

impl<P: Provider> RpcChainClient<P> {
    /// Wrap an already-constructed Alloy provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

/// Connect a [`RpcChainClient`] to an HTTP JSON-RPC endpoint.
pub fn connect_http(url: Url) -> RpcChainClient<impl Provider> {
    RpcChainClient::new(ProviderBuilder::new().connect_http(url))
}

#[async_trait]
impl<P: Provider> ChainClient for RpcChainClient<P> {
    async fn chain_head(&self) -> Result<BlockNumber, ProviderError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| classify("chain head lookup", e))
    }

    async fn block_timestamp(&self, height: BlockNumber) -> Result<u64, ProviderError> {
        let block = self
            .provider
            .get_block_by_number(height.into())
            .await
            .map_err(|e| classify(format!("block {height} lookup"), e))?
            .ok_or(ProviderError::BlockNotFound {
                block_number: height,
            })?;

        Ok(block.header.timestamp)
    }

    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Log>, ProviderError> {
        let filter = TransferLogFilter::for_contract(contract)
            .in_block_range(from_block, to_block)
            .build();

        debug!(
            contract = %contract,
            from_block,
            to_block,
            "Fetching transfer logs"
        );

        self.provider
            .get_logs(&filter)
            .await
            .map_err(|e| classify(format!("logs {from_block}-{to_block}"), e))
    }
}

/// Map a transport failure onto the provider error taxonomy.
fn classify(operation: impl Into<String>, err: TransportError) -> ProviderError {
    let operation = operation.into();

    if let TransportError::ErrorResp(payload) = &err {
        let message = payload.message.to_ascii_lowercase();
        if indicates_result_too_large(&message) {
            debug!(code = payload.code, %operation, "Provider page ceiling hit");
            return ProviderError::ResultTooLarge { operation };
        }
        if indicates_rate_limit(payload.code, &message) {
            return ProviderError::RateLimited { operation };
        }
    }

    ProviderError::network(operation, err)
}

fn indicates_result_too_large(message: &str) -> bool {
    (message.contains("more than") && message.contains("results"))
        || message.contains("response size exceeded")
        || message.contains("too large")
        || message.contains("too many results")
}

fn indicates_rate_limit(code: i64, message: &str) -> bool {
    code == 429
        || message.contains("rate limit")
        || message.contains("too many requests")
        || (message.contains("request rate") && message.contains("exceeded"))
}
