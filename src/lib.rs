// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! NFT ownership-transfer indexer: scans ERC-721 `Transfer` logs into a
//! store, estimates collection start blocks from timestamps, and derives
//! trading-velocity and trading-cycle statistics.

pub mod config;
pub mod errors;
pub mod estimate;
pub mod graph;
pub mod metadata;
pub mod model;
pub mod provider;
pub mod scanner;
pub mod stats;
pub mod store;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use errors::IndexerError;
pub use estimate::BlockHeightEstimator;
pub use metadata::{CollectionDetails, CollectionMetadata};
pub use model::{Collection, ScanReport, Transfer, UnixTimestamp};
pub use provider::{ChainClient, RpcChainClient, TransferLogFilter, TRANSFER_EVENT_SIGNATURE};
pub use scanner::TransferScanner;
pub use stats::{StatisticsEngine, StatisticsReport};
pub use store::{MemoryStore, TransferStore};
