// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Raw-log decoding
//!
//! Turns provider log records into [`Transfer`] facts. A record is rejected
//! (skipped, never fatal) when it does not carry exactly 4 topic slots:
//! ERC-20 transfers and other event shapes share the same topic0 signature
//! but index fewer parameters, and they are not ownership transfers of a
//! distinct asset.

use alloy_primitives::{Address, U256};
use alloy_rpc_types::Log;
use tracing::trace;

use crate::model::Transfer;

/// Decode a batch of raw logs, returning the parsed transfers and how many
/// records were skipped as unsupported.
pub(crate) fn transfers_from_logs(logs: &[Log]) -> (Vec<Transfer>, usize) {
    let mut transfers = Vec::with_capacity(logs.len());
    let mut skipped = 0usize;

    for log in logs {
        match transfer_from_log(log) {
            Some(transfer) => transfers.push(transfer),
            None => skipped += 1,
        }
    }

    (transfers, skipped)
}

/// Decode one raw log record into a [`Transfer`].
///
/// Returns `None` for unsupported topic shapes and for pending logs that
/// lack a block number or transaction position.
pub(crate) fn transfer_from_log(log: &Log) -> Option<Transfer> {
    let topics = log.inner.data.topics();
    if topics.len() != 4 {
        trace!(
            address = %log.inner.address,
            topic_count = topics.len(),
            "Skipping log with unsupported topic shape"
        );
        return None;
    }

    let tx_hash = log.transaction_hash?;
    let log_index = log.log_index?;
    let block = log.block_number?;

    // Topics 1 and 2 are 32-byte padded addresses; `from_word` strips the
    // leading zeroes the provider pads them with.
    Some(Transfer {
        contract_address: log.inner.address,
        tx_hash,
        log_index,
        from_address: Address::from_word(topics[1]),
        to_address: Address::from_word(topics[2]),
        token_id: U256::from_be_bytes(topics[3].0),
        block,
    })
}
