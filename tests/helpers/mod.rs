// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for transferscan integration tests
//!
//! Provides mock implementations of the collaborator traits so scans and
//! statistics passes run against scripted fixtures instead of a real
//! blockchain connection.

// Each integration test binary compiles this module but uses its own
// subset of the helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, BlockNumber, LogData, B256, U256};
use alloy_rpc_types::Log;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use transferscan::errors::{MetadataError, ProviderError};
use transferscan::{ChainClient, CollectionDetails, CollectionMetadata, TRANSFER_EVENT_SIGNATURE};

/// Mock ChainClient backed by a fixed log set and a linear block clock.
///
/// Timestamps grow linearly from a genesis timestamp, which is enough for
/// the estimator's interpolation to converge exactly. `transfer_logs`
/// returns the subset of the scripted logs matching the contract and block
/// range, and optionally simulates a provider page ceiling.
///
/// # Example
///
/// ```rust,ignore
/// let client = MockChainClient::new(50_000)
///     .with_block_time(1_600_000_000, 13)
///     .with_logs(vec![transfer_log(contract, 120, 0, alice, bob, 7)])
///     .with_page_limit(40);
/// ```
pub struct MockChainClient {
    head: BlockNumber,
    genesis_timestamp: u64,
    block_time: u64,
    logs: Vec<Log>,
    page_limit: Option<usize>,
    fail_logs: bool,
    fetched: Mutex<Vec<(BlockNumber, BlockNumber)>>,
}

impl MockChainClient {
    /// Create a client whose chain head is `head`, with a 12-second block
    /// clock starting at timestamp 0 and no logs.
    pub fn new(head: BlockNumber) -> Self {
        Self {
            head,
            genesis_timestamp: 0,
            block_time: 12,
            logs: Vec::new(),
            page_limit: None,
            fail_logs: false,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Set the linear block clock: block `h` carries timestamp
    /// `genesis + h * seconds_per_block`.
    pub fn with_block_time(mut self, genesis_timestamp: u64, seconds_per_block: u64) -> Self {
        self.genesis_timestamp = genesis_timestamp;
        self.block_time = seconds_per_block;
        self
    }

    /// Set the logs the client will serve.
    pub fn with_logs(mut self, logs: Vec<Log>) -> Self {
        self.logs = logs;
        self
    }

    /// Simulate a provider page ceiling: any range matching more than
    /// `limit` logs fails with `ResultTooLarge` instead of returning them.
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Make every log fetch fail with a network error.
    pub fn with_failing_logs(mut self) -> Self {
        self.fail_logs = true;
        self
    }

    /// The `(from_block, to_block)` ranges of every log fetch attempted so
    /// far, in call order — including ones that hit the page ceiling.
    pub fn fetched_ranges(&self) -> Vec<(BlockNumber, BlockNumber)> {
        self.fetched.lock().unwrap().clone()
    }

    /// Timestamp the linear clock assigns to `height`.
    pub fn timestamp_of(&self, height: BlockNumber) -> u64 {
        self.genesis_timestamp + height * self.block_time
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn chain_head(&self) -> Result<BlockNumber, ProviderError> {
        Ok(self.head)
    }

    async fn block_timestamp(&self, height: BlockNumber) -> Result<u64, ProviderError> {
        if height == 0 || height > self.head {
            return Err(ProviderError::BlockNotFound {
                block_number: height,
            });
        }
        Ok(self.timestamp_of(height))
    }

    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<Log>, ProviderError> {
        self.fetched.lock().unwrap().push((from_block, to_block));

        if self.fail_logs {
            return Err(ProviderError::network(
                format!("logs {from_block}-{to_block}"),
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "scripted failure"),
            ));
        }

        let matched: Vec<Log> = self
            .logs
            .iter()
            .filter(|log| {
                log.address() == contract
                    && log
                        .block_number
                        .is_some_and(|b| b >= from_block && b <= to_block)
            })
            .cloned()
            .collect();

        if self.page_limit.is_some_and(|limit| matched.len() > limit) {
            return Err(ProviderError::result_too_large(format!(
                "logs {from_block}-{to_block}"
            )));
        }
        Ok(matched)
    }
}

/// Mock CollectionMetadata over a fixed address table.
#[derive(Default)]
pub struct MockMetadata {
    details: HashMap<Address, CollectionDetails>,
}

impl MockMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection with a name and creation timestamp.
    pub fn with_collection(
        mut self,
        contract: Address,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.details.insert(
            contract,
            CollectionDetails {
                name: name.to_string(),
                slug: name.to_lowercase().replace(' ', "-"),
                created_at,
            },
        );
        self
    }
}

#[async_trait]
impl CollectionMetadata for MockMetadata {
    async fn collection_details(
        &self,
        contract: Address,
    ) -> Result<CollectionDetails, MetadataError> {
        self.details
            .get(&contract)
            .cloned()
            .ok_or(MetadataError::UnknownContract {
                contract_address: contract,
            })
    }
}

/// Build a well-formed ERC-721 Transfer log.
pub fn transfer_log(
    contract: Address,
    block: BlockNumber,
    log_index: u64,
    from: Address,
    to: Address,
    token_id: u64,
) -> Log {
    let topics = vec![
        TRANSFER_EVENT_SIGNATURE,
        from.into_word(),
        to.into_word(),
        B256::from(U256::from(token_id)),
    ];
    let mut tx_hash = [0u8; 32];
    tx_hash[..8].copy_from_slice(&block.to_be_bytes());
    tx_hash[8..16].copy_from_slice(&log_index.to_be_bytes());

    Log {
        inner: alloy_primitives::Log {
            address: contract,
            data: LogData::new(topics, Default::default()).unwrap(),
        },
        block_hash: Some(B256::ZERO),
        block_number: Some(block),
        block_timestamp: None,
        transaction_hash: Some(B256::from(tx_hash)),
        transaction_index: Some(0),
        log_index: Some(log_index),
        removed: false,
    }
}

/// Build a Transfer-like log with a malformed topic list (ERC-20 shape).
pub fn malformed_log(contract: Address, block: BlockNumber, log_index: u64) -> Log {
    let topics = vec![
        TRANSFER_EVENT_SIGNATURE,
        Address::ZERO.into_word(),
        Address::ZERO.into_word(),
    ];
    Log {
        inner: alloy_primitives::Log {
            address: contract,
            data: LogData::new(topics, Default::default()).unwrap(),
        },
        block_hash: Some(B256::ZERO),
        block_number: Some(block),
        block_timestamp: None,
        transaction_hash: Some(B256::repeat_byte(0xfe)),
        transaction_index: Some(0),
        log_index: Some(log_index),
        removed: false,
    }
}
