// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory store implementation
//!
//! Keeps everything in keyed maps behind one async mutex. Backs the
//! integration tests and is handy for one-off analysis runs where a real
//! database would be overkill.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, BlockNumber, B256, U256};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{CollectionStatsUpdate, TransferStore};
use crate::errors::StoreError;
use crate::model::{Collection, TokenRecord, Transfer};

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<Address, Collection>,
    /// Insertion-ordered transfer rows per collection
    transfers: HashMap<Address, Vec<Transfer>>,
    /// Unique index over `(tx_hash, log_index)`
    transfer_keys: HashSet<(B256, u64)>,
    tokens: HashMap<(Address, U256), TokenRecord>,
}

/// Thread-safe in-memory [`TransferStore`].
///
/// # Examples
///
/// ```rust,ignore
/// use transferscan::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let scanner = TransferScanner::new(client, store, metadata, config);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transfers for a collection (test/diagnostic helper).
    pub async fn transfer_count(&self, contract: Address) -> usize {
        let state = self.state.lock().await;
        state.transfers.get(&contract).map_or(0, Vec::len)
    }

    /// Current checkpoint of a collection (test/diagnostic helper).
    pub async fn checkpoint(&self, contract: Address) -> Option<BlockNumber> {
        let state = self.state.lock().await;
        state.collections.get(&contract).and_then(|c| c.latest_block)
    }

    /// Stored per-asset row, if the statistics engine created one
    /// (test/diagnostic helper).
    pub async fn token(&self, contract: Address, token_id: U256) -> Option<TokenRecord> {
        let state = self.state.lock().await;
        state.tokens.get(&(contract, token_id)).cloned()
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn find_collection(&self, contract: Address) -> Result<Option<Collection>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.collections.get(&contract).cloned())
    }

    async fn insert_collection(&self, collection: Collection) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state
            .collections
            .insert(collection.contract_address, collection);
        Ok(())
    }

    async fn set_checkpoint(
        &self,
        contract: Address,
        block: BlockNumber,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let collection = state
            .collections
            .get_mut(&contract)
            .ok_or(StoreError::UnknownCollection {
                contract_address: contract,
            })?;

        // Checkpoints never move backwards.
        let advanced = collection.latest_block.map_or(block, |old| old.max(block));
        collection.latest_block = Some(advanced);
        Ok(())
    }

    async fn list_transfers_ordered(&self, contract: Address) -> Result<Vec<Transfer>, StoreError> {
        let state = self.state.lock().await;
        let mut rows = state.transfers.get(&contract).cloned().unwrap_or_default();
        rows.sort_by(|a, b| {
            (a.token_id, a.block, a.log_index).cmp(&(b.token_id, b.block, b.log_index))
        });
        Ok(rows)
    }

    async fn bulk_insert_transfers(
        &self,
        transfers: &[Transfer],
        check_existing: bool,
    ) -> Result<usize, StoreError> {
        let mut state = self.state.lock().await;
        let mut inserted = 0usize;

        for transfer in transfers {
            if check_existing && state.transfer_keys.contains(&transfer.key()) {
                continue;
            }
            // The key set enforces uniqueness even when the caller skipped
            // the existence check (brand-new collection fast path).
            if !state.transfer_keys.insert(transfer.key()) {
                continue;
            }
            state
                .transfers
                .entry(transfer.contract_address)
                .or_default()
                .push(transfer.clone());
            inserted += 1;
        }

        debug!(
            batch = transfers.len(),
            inserted, check_existing, "Bulk-inserted transfers"
        );
        Ok(inserted)
    }

    async fn set_collection_stats(
        &self,
        contract: Address,
        stats: CollectionStatsUpdate,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let collection = state
            .collections
            .get_mut(&contract)
            .ok_or(StoreError::UnknownCollection {
                contract_address: contract,
            })?;

        collection.block_diff_average = stats.block_diff_average;
        collection.block_diff_std = stats.block_diff_std;
        collection.cycle_average = stats.cycle_average;
        collection.cycle_std = stats.cycle_std;
        Ok(())
    }

    async fn upsert_token_stats(&self, token: TokenRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state
            .tokens
            .insert((token.contract_address, token.token_id), token);
        Ok(())
    }
}
