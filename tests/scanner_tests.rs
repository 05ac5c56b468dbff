// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the transfer scanner: window adaptation, backoff,
//! checkpoint resume, and deduplication against scripted providers.

mod helpers;

use alloy_primitives::{address, Address, U256};
use chrono::DateTime;
use helpers::{malformed_log, transfer_log, MockChainClient, MockMetadata};
use transferscan::errors::ScanError;
use transferscan::{
    Collection, MemoryStore, ScanConfig, ScanConfigBuilder, TransferScanner, TransferStore,
};

const CONTRACT: Address = address!("1111111111111111111111111111111111111111");
const ALICE: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const BOB: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

fn small_chunk_config() -> ScanConfig {
    ScanConfigBuilder::with_defaults()
        .min_chunk_size(5)
        .max_chunk_size(40)
        .build()
}

fn metadata() -> MockMetadata {
    MockMetadata::new().with_collection(
        CONTRACT,
        "Test Apes",
        DateTime::from_timestamp(0, 0).unwrap(),
    )
}

#[tokio::test]
async fn test_quiet_chain_doubles_window_to_cap() {
    let client = MockChainClient::new(100);
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    let report = scanner.scan_from(CONTRACT, 0).await.unwrap();

    // No events anywhere: every window doubles until the cap, and the
    // final partial window past the head is left for the next invocation.
    assert_eq!(
        client.fetched_ranges(),
        vec![(0, 5), (6, 16), (17, 37), (38, 78)]
    );
    assert_eq!(report.events_found, 0);
    assert_eq!(report.blocks_scanned, 75);
    assert_eq!(report.provider_calls, 4);
    assert_eq!(store.checkpoint(CONTRACT).await, None);
}

#[tokio::test]
async fn test_page_ceiling_triggers_backoff_and_dedup_absorbs_refetch() {
    // Two events; any window holding both trips the simulated page ceiling.
    let client = MockChainClient::new(30)
        .with_logs(vec![
            transfer_log(CONTRACT, 8, 0, ALICE, BOB, 1),
            transfer_log(CONTRACT, 14, 0, BOB, ALICE, 1),
        ])
        .with_page_limit(1);
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    let report = scanner.scan_from(CONTRACT, 0).await.unwrap();

    // Every ceiling hit narrows the retry to the minimum window at the
    // same start block; the cursor then creeps forward one block per
    // round until each event lands in a window of its own.
    assert_eq!(
        client.fetched_ranges(),
        vec![
            (0, 5),
            (6, 16), // ceiling
            (6, 11),
            (7, 17), // ceiling
            (7, 12),
            (8, 18), // ceiling
            (8, 13),
            (9, 19), // ceiling
            (9, 14),
            (10, 20),
        ]
    );

    // Re-fetched windows re-yield stored events; the unique key absorbs
    // them, so each transfer lands exactly once.
    assert_eq!(store.transfer_count(CONTRACT).await, 2);
    assert_eq!(report.events_found, 5);
    assert_eq!(report.blocks_scanned, 35);
    assert_eq!(report.provider_calls, 10);

    // The checkpoint certifies the last window that inserted new rows,
    // not the duplicate-only windows after it.
    assert_eq!(store.checkpoint(CONTRACT).await, Some(14));
}

#[tokio::test]
async fn test_rescan_resumes_from_checkpoint_without_moving_it() {
    let client = MockChainClient::new(30).with_logs(vec![transfer_log(
        CONTRACT, 8, 0, ALICE, BOB, 1,
    )]);
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    scanner.scan_from(CONTRACT, 0).await.unwrap();
    assert_eq!(store.transfer_count(CONTRACT).await, 1);
    assert_eq!(store.checkpoint(CONTRACT).await, Some(16));

    // Second invocation resumes at the checkpoint and finds nothing new.
    let report = scanner.scan(CONTRACT).await.unwrap();
    let ranges = client.fetched_ranges();
    assert_eq!(ranges.last().copied(), Some((16, 21)));
    assert_eq!(report.events_found, 0);
    assert_eq!(store.transfer_count(CONTRACT).await, 1);
    assert_eq!(store.checkpoint(CONTRACT).await, Some(16));
}

#[tokio::test]
async fn test_unknown_collection_seeded_from_estimated_start() {
    // 13-second blocks; the collection was created at block 4000's
    // timestamp, so the estimate lands the margin before it.
    let client = MockChainClient::new(50_000).with_block_time(1_600_000_000, 13);
    let created_at = DateTime::from_timestamp(client.timestamp_of(4_000) as i64, 0).unwrap();
    let metadata = MockMetadata::new().with_collection(CONTRACT, "Test Apes", created_at);
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(
        &client,
        &store,
        metadata,
        ScanConfigBuilder::with_defaults().max_chunk_size(40).build(),
    );

    scanner.scan(CONTRACT).await.unwrap();

    let collection = store.find_collection(CONTRACT).await.unwrap().unwrap();
    assert_eq!(collection.name, "Test Apes");
    assert_eq!(collection.start_block, 3_900);

    // The first log fetch starts at the estimated block.
    let first_fetch = client
        .fetched_ranges()
        .first()
        .copied()
        .expect("scan fetched no windows");
    assert_eq!(first_fetch.0, 3_900);
}

#[tokio::test]
async fn test_start_beyond_head_is_rejected() {
    let client = MockChainClient::new(100);
    let store = MemoryStore::new();
    store
        .insert_collection(Collection {
            latest_block: Some(200),
            ..Collection::new(CONTRACT, "Test Apes", 50)
        })
        .await
        .unwrap();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    let err = scanner.scan(CONTRACT).await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::StartBeyondHead {
            start_block: 200,
            head: 100
        }
    ));
}

#[tokio::test]
async fn test_malformed_topic_shapes_are_skipped_not_fatal() {
    // An ERC-20-style Transfer (3 topics) mixed in with a proper one.
    let client = MockChainClient::new(30).with_logs(vec![
        transfer_log(CONTRACT, 8, 0, ALICE, BOB, 1),
        malformed_log(CONTRACT, 8, 1),
    ]);
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    let report = scanner.scan_from(CONTRACT, 0).await.unwrap();

    assert_eq!(report.events_found, 2);
    assert_eq!(store.transfer_count(CONTRACT).await, 1);
}

#[tokio::test]
async fn test_network_failure_aborts_with_counters() {
    let client = MockChainClient::new(100).with_failing_logs();
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    let err = scanner.scan_from(CONTRACT, 0).await.unwrap_err();
    let report = err.report().expect("loop failures carry counters");
    assert_eq!(report.provider_calls, 0);
    assert!(matches!(err, ScanError::Provider { .. }));

    // The collection row was created before the loop started; no
    // checkpoint was ever committed.
    assert!(store.find_collection(CONTRACT).await.unwrap().is_some());
    assert_eq!(store.checkpoint(CONTRACT).await, None);
}

#[tokio::test]
async fn test_decoded_transfer_fields_round_trip() {
    let client = MockChainClient::new(30).with_logs(vec![transfer_log(
        CONTRACT, 8, 3, ALICE, BOB, 42,
    )]);
    let store = MemoryStore::new();
    let scanner = TransferScanner::new(&client, &store, metadata(), small_chunk_config());

    scanner.scan_from(CONTRACT, 0).await.unwrap();

    let rows = store.list_transfers_ordered(CONTRACT).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.contract_address, CONTRACT);
    assert_eq!(row.from_address, ALICE);
    assert_eq!(row.to_address, BOB);
    assert_eq!(row.token_id, U256::from(42u64));
    assert_eq!(row.block, 8);
    assert_eq!(row.log_index, 3);
}
