//! Domain records shared across the scanner, graph builder, and statistics
//! engine.
//!
//! `Transfer` is the immutable fact everything else is derived from. The
//! remaining records mirror what the persistence collaborator stores; the
//! transient types (`ScanWindow`, `ScanReport`) never leave the process.

use alloy_primitives::{Address, BlockNumber, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds (always UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnixTimestamp(pub i64);

impl UnixTimestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DateTime<Utc>> for UnixTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

/// A single ownership-transfer event decoded from a provider log record.
///
/// Transfers are immutable facts: once persisted they are never mutated or
/// deleted. The unique key is `(tx_hash, log_index)` — a transaction can emit
/// several transfers, but never two at the same log index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Contract (collection) that emitted the event
    pub contract_address: Address,
    /// Transaction the event was emitted in
    pub tx_hash: B256,
    /// Position of the log within the transaction
    pub log_index: u64,
    /// Sender; the mint/origin address for freshly minted assets
    pub from_address: Address,
    /// Recipient
    pub to_address: Address,
    /// Asset identifier within the collection
    pub token_id: U256,
    /// Block the transfer was mined in
    pub block: BlockNumber,
}

impl Transfer {
    /// The `(tx_hash, log_index)` pair that uniquely identifies a transfer.
    pub fn key(&self) -> (B256, u64) {
        (self.tx_hash, self.log_index)
    }
}

/// One tracked contract/collection, including its scan checkpoint and the
/// aggregate statistics last written by the statistics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub contract_address: Address,
    pub name: String,
    /// Block the first scan of this collection started from
    pub start_block: BlockNumber,
    /// Checkpoint: last block through which transfers are confirmed
    /// persisted. Monotonically non-decreasing; `None` until the first
    /// window yields a newly persisted transfer.
    pub latest_block: Option<BlockNumber>,
    pub block_diff_average: f64,
    pub block_diff_std: f64,
    pub cycle_average: f64,
    pub cycle_std: f64,
}

impl Collection {
    /// Creates a freshly discovered collection with no checkpoint and zeroed
    /// statistics.
    pub fn new(contract_address: Address, name: impl Into<String>, start_block: BlockNumber) -> Self {
        Self {
            contract_address,
            name: name.into(),
            start_block,
            latest_block: None,
            block_diff_average: 0.0,
            block_diff_std: 0.0,
            cycle_average: 0.0,
            cycle_std: 0.0,
        }
    }

    /// Block a resumed scan should start from: the checkpoint when one
    /// exists, otherwise the recorded start block.
    pub fn resume_block(&self) -> BlockNumber {
        self.latest_block.unwrap_or(self.start_block)
    }
}

/// Per-asset statistics row as persisted by the statistics engine.
///
/// Rows are only ever created for assets whose `block_diff_average` is
/// positive; assets with too few transfers never get one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub contract_address: Address,
    pub token_id: U256,
    pub block_diff_average: f64,
    pub block_diff_std: f64,
    pub transfer_count: u64,
    pub cycle_count: u64,
}

/// The unit of one provider fetch: a contiguous block range and the chunk
/// size that produced it. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
    pub chunk_size: u64,
}

impl ScanWindow {
    pub fn new(start_block: BlockNumber, chunk_size: u64) -> Self {
        Self {
            start_block,
            end_block: start_block.saturating_add(chunk_size),
            chunk_size,
        }
    }
}

/// Observability counters accumulated over one scan invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Total raw events returned by the provider
    pub events_found: u64,
    /// Total blocks covered by requested windows
    pub blocks_scanned: u64,
    /// Number of log-fetch calls made against the provider
    pub provider_calls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_resume_block_prefers_checkpoint() {
        let mut coll = Collection::new(
            address!("1111111111111111111111111111111111111111"),
            "Test",
            500,
        );
        assert_eq!(coll.resume_block(), 500);

        coll.latest_block = Some(840);
        assert_eq!(coll.resume_block(), 840);
    }

    #[test]
    fn test_scan_window_end() {
        let window = ScanWindow::new(1_000, 20);
        assert_eq!(window.end_block, 1_020);
        assert_eq!(window.chunk_size, 20);
    }
}
