// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Persistence collaborator
//!
//! The relational schema and ORM layer live outside this crate; the scanner
//! and statistics engine only see the [`TransferStore`] capability set.
//! [`MemoryStore`] is the in-process reference implementation used by tests
//! and demos.

mod memory;

pub use memory::MemoryStore;

use alloy_primitives::{Address, BlockNumber};
use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::{Collection, TokenRecord, Transfer};

/// Aggregate fields a statistics pass writes back onto a collection row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionStatsUpdate {
    pub block_diff_average: f64,
    pub block_diff_std: f64,
    pub cycle_average: f64,
    pub cycle_std: f64,
}

/// Capability set the indexer needs from its persistence backend.
///
/// # Contract
///
/// - Stored transfers are unique on `(tx_hash, log_index)`.
/// - `set_checkpoint` is ordered strictly after the bulk insert it
///   certifies; implementations must not reorder the two.
/// - `list_transfers_ordered` returns transfers sorted by
///   `(token_id, block)` — the order the statistics engine consumes.
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Look up a collection by contract address.
    async fn find_collection(&self, contract: Address) -> Result<Option<Collection>, StoreError>;

    /// Insert a freshly discovered collection.
    async fn insert_collection(&self, collection: Collection) -> Result<(), StoreError>;

    /// Advance the collection's checkpoint. Checkpoints never move
    /// backwards; an implementation receiving an older block keeps the
    /// newer one.
    async fn set_checkpoint(&self, contract: Address, block: BlockNumber)
        -> Result<(), StoreError>;

    /// All stored transfers for a collection, ordered by `(token_id, block)`.
    async fn list_transfers_ordered(&self, contract: Address) -> Result<Vec<Transfer>, StoreError>;

    /// Insert a batch of transfers, returning how many were newly stored.
    ///
    /// With `check_existing` set, each row is preceded by an existence check
    /// on its `(tx_hash, log_index)` key and duplicates are skipped. The
    /// scanner passes `false` for brand-new collections where the store is
    /// known to be empty.
    async fn bulk_insert_transfers(
        &self,
        transfers: &[Transfer],
        check_existing: bool,
    ) -> Result<usize, StoreError>;

    /// Write collection-level aggregates computed by a statistics pass.
    async fn set_collection_stats(
        &self,
        contract: Address,
        stats: CollectionStatsUpdate,
    ) -> Result<(), StoreError>;

    /// Create or replace the per-asset statistics row.
    async fn upsert_token_stats(&self, token: TokenRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: TransferStore + ?Sized> TransferStore for &S {
    async fn find_collection(&self, contract: Address) -> Result<Option<Collection>, StoreError> {
        (**self).find_collection(contract).await
    }

    async fn insert_collection(&self, collection: Collection) -> Result<(), StoreError> {
        (**self).insert_collection(collection).await
    }

    async fn set_checkpoint(
        &self,
        contract: Address,
        block: BlockNumber,
    ) -> Result<(), StoreError> {
        (**self).set_checkpoint(contract, block).await
    }

    async fn list_transfers_ordered(&self, contract: Address) -> Result<Vec<Transfer>, StoreError> {
        (**self).list_transfers_ordered(contract).await
    }

    async fn bulk_insert_transfers(
        &self,
        transfers: &[Transfer],
        check_existing: bool,
    ) -> Result<usize, StoreError> {
        (**self).bulk_insert_transfers(transfers, check_existing).await
    }

    async fn set_collection_stats(
        &self,
        contract: Address,
        stats: CollectionStatsUpdate,
    ) -> Result<(), StoreError> {
        (**self).set_collection_stats(contract, stats).await
    }

    async fn upsert_token_stats(&self, token: TokenRecord) -> Result<(), StoreError> {
        (**self).upsert_token_stats(token).await
    }
}

#[async_trait]
impl<S: TransferStore + ?Sized> TransferStore for std::sync::Arc<S> {
    async fn find_collection(&self, contract: Address) -> Result<Option<Collection>, StoreError> {
        (**self).find_collection(contract).await
    }

    async fn insert_collection(&self, collection: Collection) -> Result<(), StoreError> {
        (**self).insert_collection(collection).await
    }

    async fn set_checkpoint(
        &self,
        contract: Address,
        block: BlockNumber,
    ) -> Result<(), StoreError> {
        (**self).set_checkpoint(contract, block).await
    }

    async fn list_transfers_ordered(&self, contract: Address) -> Result<Vec<Transfer>, StoreError> {
        (**self).list_transfers_ordered(contract).await
    }

    async fn bulk_insert_transfers(
        &self,
        transfers: &[Transfer],
        check_existing: bool,
    ) -> Result<usize, StoreError> {
        (**self).bulk_insert_transfers(transfers, check_existing).await
    }

    async fn set_collection_stats(
        &self,
        contract: Address,
        stats: CollectionStatsUpdate,
    ) -> Result<(), StoreError> {
        (**self).set_collection_stats(contract, stats).await
    }

    async fn upsert_token_stats(&self, token: TokenRecord) -> Result<(), StoreError> {
        (**self).upsert_token_stats(token).await
    }
}
