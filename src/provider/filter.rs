// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Semantic filter builder for NFT transfer events
//!
//! Replaces cryptic topic/address plumbing with a self-documenting builder.
//! ERC-721 `Transfer` logs carry four topic slots:
//!
//! - topic0: event signature hash
//! - topic1: `from` address (32-byte padded)
//! - topic2: `to` address (32-byte padded)
//! - topic3: `tokenId`
//!
//! The builder pins topic0 to the transfer signature and the log address to
//! the collection contract; block ranges are supplied per window by the
//! scanner.

use alloy_primitives::{b256, Address, BlockNumber, B256};
use alloy_rpc_types::Filter;

/// `keccak256("Transfer(address,address,uint256)")`.
///
/// Shared by ERC-20 and ERC-721; the two are told apart by topic count
/// (ERC-721 indexes the token id, giving 4 topic slots).
pub const TRANSFER_EVENT_SIGNATURE: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// Builder for per-collection transfer-event filters
///
/// # Examples
///
/// ```rust,ignore
/// use transferscan::TransferLogFilter;
///
/// let filter = TransferLogFilter::for_contract(collection)
///     .in_block_range(window.start_block, window.end_block)
///     .build();
///
/// let logs = provider.get_logs(&filter).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TransferLogFilter {
    contract: Address,
    from_block: Option<BlockNumber>,
    to_block: Option<BlockNumber>,
}

impl TransferLogFilter {
    /// Filter for transfer events emitted by one collection contract.
    pub fn for_contract(contract: Address) -> Self {
        Self {
            contract,
            from_block: None,
            to_block: None,
        }
    }

    /// Restrict the filter to one scan window (both bounds inclusive).
    pub fn in_block_range(mut self, from_block: BlockNumber, to_block: BlockNumber) -> Self {
        self.from_block = Some(from_block);
        self.to_block = Some(to_block);
        self
    }

    /// Build the final Alloy `Filter`.
    pub fn build(self) -> Filter {
        let mut filter = Filter::new()
            .address(self.contract)
            .event_signature(TRANSFER_EVENT_SIGNATURE);

        if let Some(from) = self.from_block {
            filter = filter.from_block(from);
        }
        if let Some(to) = self.to_block {
            filter = filter.to_block(to);
        }

        filter
    }
}
