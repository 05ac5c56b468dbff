// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Collection-metadata collaborator
//!
//! When a contract is scanned for the first time there is no checkpoint to
//! resume from, so the scanner needs the collection's creation timestamp to
//! seed the block-height estimator. That timestamp lives off-chain (a
//! marketplace API, a curated registry, a manual table) — this trait is the
//! seam to whatever source the deployment uses.

use alloy_primitives::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MetadataError;

/// Off-chain facts about a collection, keyed by contract address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDetails {
    /// Human-readable collection name
    pub name: String,
    /// Marketplace slug, when the source has one
    pub slug: String,
    /// When the collection was created; seeds the start-block estimate
    pub created_at: DateTime<Utc>,
}

/// Source of off-chain collection metadata.
#[async_trait]
pub trait CollectionMetadata: Send + Sync {
    /// Look up the details for `contract`.
    async fn collection_details(&self, contract: Address)
        -> Result<CollectionDetails, MetadataError>;
}

#[async_trait]
impl<M: CollectionMetadata + ?Sized> CollectionMetadata for &M {
    async fn collection_details(
        &self,
        contract: Address,
    ) -> Result<CollectionDetails, MetadataError> {
        (**self).collection_details(contract).await
    }
}

#[async_trait]
impl<M: CollectionMetadata + ?Sized> CollectionMetadata for std::sync::Arc<M> {
    async fn collection_details(
        &self,
        contract: Address,
    ) -> Result<CollectionDetails, MetadataError> {
        (**self).collection_details(contract).await
    }
}
