// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

/// Example demonstrating a full index-and-analyze pass for one collection
///
/// This example shows how to:
/// 1. Connect a chain client to an RPC endpoint
/// 2. Scan a collection's transfer history into an in-memory store
/// 3. Run the statistics engine over the scanned transfers
///
/// Run with:
/// ```bash
/// RPC_URL=https://eth.llamarpc.com \
/// CONTRACT=0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d \
/// START_BLOCK=12287507 \
/// cargo run --package transferscan --example scan_collection
/// ```
use std::env;

use alloy_primitives::Address;
use async_trait::async_trait;
use chrono::Utc;
use transferscan::errors::MetadataError;
use transferscan::store::MemoryStore;
use transferscan::{
    CollectionDetails, CollectionMetadata, ScanConfig, StatisticsEngine, TransferScanner,
};
use url::Url;

/// Metadata source for the demo: names the collection after its address and
/// stamps it "created now", which is fine because the start block is passed
/// explicitly below.
struct StaticMetadata;

#[async_trait]
impl CollectionMetadata for StaticMetadata {
    async fn collection_details(
        &self,
        contract: Address,
    ) -> Result<CollectionDetails, MetadataError> {
        Ok(CollectionDetails {
            name: contract.to_string(),
            slug: contract.to_string(),
            created_at: Utc::now(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let rpc_url: Url = env::var("RPC_URL")?.parse()?;
    let contract: Address = env::var("CONTRACT")?.parse()?;
    let start_block: u64 = env::var("START_BLOCK")?.parse()?;

    let client = transferscan::provider::connect_http(rpc_url);
    let store = MemoryStore::new();
    let config = ScanConfig::default();

    let scanner = TransferScanner::new(&client, &store, StaticMetadata, config.clone());
    let report = scanner.scan_from(contract, start_block).await?;
    println!(
        "scanned {} blocks in {} provider calls, {} events found",
        report.blocks_scanned, report.provider_calls, report.events_found
    );

    let engine = StatisticsEngine::new(&store, config);
    match engine.compute_and_store(contract).await? {
        Some(stats) => {
            println!(
                "collection gap avg {:.1} blocks (std {:.1}), cycle avg {:.3} (std {:.3})",
                stats.collection.block.avg,
                stats.collection.block.std_deviation,
                stats.collection.cycles.avg,
                stats.collection.cycles.std_deviation,
            );
            println!("{} assets qualified for per-asset statistics", stats.tokens.len());
        }
        None => println!("no transfers found, nothing to analyze"),
    }

    Ok(())
}
