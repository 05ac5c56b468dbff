// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Trading-velocity and trading-cycle statistics
//!
//! Consumes one collection's ordered transfer history and produces per-asset
//! and collection-level aggregates:
//!
//! - **Block-gap statistics** measure trading velocity: the mean and
//!   population standard deviation of the block gaps between consecutive
//!   transfers of the same asset. Mint-originated transfers are excluded —
//!   the gap between mint and first sale says nothing about trading.
//! - **Cycle statistics** measure circular trading: the number of distinct
//!   simple cycles in each asset's ownership graph.
//!
//! The computation layer is pure — functions take transfer slices and
//! return immutable snapshots, so there are no hidden mutation-order
//! dependencies. [`StatisticsEngine`] composes them over a
//! [`TransferStore`] and writes selected aggregates back.
//!
//! The collection-level pooled standard deviation reproduces the formula
//! the original analytics pipeline shipped with,
//! `sqrt(Σ(std_i² · n_i − 1) / (Σn_i − asset_count))`, subtracting 1 once
//! per group term. Downstream consumers calibrate against these exact
//! values, so the formula is preserved as-is rather than corrected.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::errors::StatsError;
use crate::graph::TransferGraph;
use crate::model::{TokenRecord, Transfer};
use crate::store::{CollectionStatsUpdate, TransferStore};

/// Block-gap statistics for one asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBlockStats {
    /// Mean of the consecutive block gaps
    pub avg: f64,
    /// Population standard deviation of the gaps
    pub std_deviation: f64,
    /// Transfers backing these statistics (mint transfers excluded)
    pub total_count: usize,
    /// The gaps themselves, in chronological order
    pub diffs: Vec<u64>,
    /// Smallest observed gap
    pub fastest: Option<u64>,
    /// Largest observed non-zero gap
    pub slowest: Option<u64>,
}

/// Block-gap aggregate over a whole collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionBlockStats {
    /// Grand mean: sum of all valid gaps divided by their total count
    /// (not a mean of per-asset means)
    pub avg: f64,
    /// Pooled standard deviation across qualifying assets
    pub std_deviation: f64,
    /// All assets seen in the transfer list, qualifying or not
    pub total_count: usize,
    /// Transfers belonging to qualifying assets
    pub valid_transfer_count: usize,
    /// Largest gap observed anywhere, with its asset
    pub high: Option<(U256, u64)>,
    /// Smallest non-zero gap observed anywhere, with its asset
    pub low: Option<(U256, u64)>,
}

/// Cycle-count aggregate over a whole collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleStats {
    pub avg: f64,
    pub std_deviation: f64,
    /// Assets the aggregate covers
    pub total_count: usize,
}

/// Everything a statistics pass produced for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSnapshot {
    pub block: TokenBlockStats,
    pub cycle_count: usize,
}

/// Collection-level aggregate snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionAggregate {
    pub block: CollectionBlockStats,
    pub cycles: CycleStats,
}

/// Output of one statistics pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    pub collection: CollectionAggregate,
    /// Qualifying assets only; assets with too few transfers never appear
    pub tokens: BTreeMap<U256, TokenSnapshot>,
}

/// Group each asset's transfer blocks in chronological order.
///
/// Every asset appearing in the list gets an entry; mint-originated
/// transfers contribute no block (but still register the asset).
pub fn group_blocks_by_token(
    transfers: &[Transfer],
    mint_address: Address,
) -> BTreeMap<U256, Vec<u64>> {
    let mut grouped: BTreeMap<U256, Vec<u64>> = BTreeMap::new();
    for transfer in transfers {
        let blocks = grouped.entry(transfer.token_id).or_default();
        if transfer.from_address != mint_address {
            blocks.push(transfer.block);
        }
    }
    grouped
}

/// Block-gap statistics for one asset's chronological block list.
///
/// Returns `None` when the asset does not qualify: the rule is exclusive,
/// `blocks.len() > min_transfers`, so an asset with exactly `min_transfers`
/// recorded transfers is excluded.
pub fn token_block_stats(blocks: &[u64], min_transfers: usize) -> Option<TokenBlockStats> {
    if blocks.len() <= min_transfers {
        return None;
    }

    let diffs: Vec<u64> = blocks.windows(2).map(|w| w[1] - w[0]).collect();
    let avg = diffs.iter().sum::<u64>() as f64 / diffs.len() as f64;
    let fastest = diffs.iter().copied().min();
    let slowest = diffs.iter().copied().filter(|&d| d != 0).max();

    Some(TokenBlockStats {
        avg,
        std_deviation: population_std(&diffs, avg),
        total_count: blocks.len(),
        diffs,
        fastest,
        slowest,
    })
}

fn population_std(diffs: &[u64], avg: f64) -> f64 {
    if diffs.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = diffs.iter().map(|&d| (d as f64 - avg).powi(2)).sum();
    if sum_sq == 0.0 {
        return 0.0;
    }
    (sum_sq / diffs.len() as f64).sqrt()
}

/// Combined deviation across sample groups given as `(std, n)` pairs,
/// using the reproduced term `std² · n − 1` per group.
///
/// Returns 0 when the denominator `Σn − group_count` or the summed
/// numerator is not positive.
pub fn pooled_std_deviation(groups: impl IntoIterator<Item = (f64, usize)>) -> f64 {
    let mut diff_sum = 0.0f64;
    let mut n_sum = 0usize;
    let mut group_count = 0usize;

    for (std, n) in groups {
        diff_sum += std * std * n as f64 - 1.0;
        n_sum += n;
        group_count += 1;
    }

    let denominator = n_sum as f64 - group_count as f64;
    if diff_sum > 0.0 && denominator > 0.0 {
        (diff_sum / denominator).sqrt()
    } else {
        0.0
    }
}

/// Block-gap statistics for a whole collection.
///
/// Returns the collection aggregate and the per-asset statistics of every
/// qualifying asset. `transfers` must be ordered by `(token_id, block)` —
/// the order [`TransferStore::list_transfers_ordered`] guarantees.
pub fn compute_block_statistics(
    transfers: &[Transfer],
    mint_address: Address,
    min_transfers: usize,
) -> (CollectionBlockStats, BTreeMap<U256, TokenBlockStats>) {
    let grouped = group_blocks_by_token(transfers, mint_address);

    let mut collection = CollectionBlockStats::default();
    let mut qualifying: BTreeMap<U256, TokenBlockStats> = BTreeMap::new();
    let mut diff_total = 0u64;
    let mut diff_count = 0usize;

    for (token_id, blocks) in grouped {
        collection.total_count += 1;

        let Some(stats) = token_block_stats(&blocks, min_transfers) else {
            continue;
        };

        collection.valid_transfer_count += stats.total_count;
        for &diff in &stats.diffs {
            diff_total += diff;
            diff_count += 1;

            if collection.high.is_none_or(|(_, high)| diff > high) {
                collection.high = Some((token_id, diff));
            }
            // Zero gaps are same-block shuffles; they would pin `low`
            // to a meaningless floor.
            if diff != 0 && collection.low.is_none_or(|(_, low)| diff < low) {
                collection.low = Some((token_id, diff));
            }
        }

        qualifying.insert(token_id, stats);
    }

    if diff_count != 0 {
        collection.avg = diff_total as f64 / diff_count as f64;
    }
    collection.std_deviation = pooled_std_deviation(
        qualifying
            .values()
            .map(|s| (s.std_deviation, s.total_count)),
    );

    (collection, qualifying)
}

/// Cycle statistics for a whole collection.
///
/// Builds one ownership graph per asset and counts its simple cycles.
/// The aggregate is a plain mean and population-style deviation over
/// assets — cycle counts are whole-graph properties, not per-sample
/// measurements, so the pooled combination used for block gaps does not
/// apply. Only assets with at least one cycle contribute a squared term;
/// the divisor stays the full asset count.
pub fn compute_cycle_statistics(
    transfers: &[Transfer],
    mint_address: Address,
) -> (CycleStats, BTreeMap<U256, usize>) {
    let mut graphs: BTreeMap<U256, TransferGraph> = BTreeMap::new();
    for transfer in transfers {
        graphs
            .entry(transfer.token_id)
            .or_default()
            .add_transfer(transfer, mint_address);
    }

    let cycle_counts: BTreeMap<U256, usize> = graphs
        .iter()
        .map(|(token_id, graph)| (*token_id, graph.simple_cycle_count()))
        .collect();

    let token_count = cycle_counts.len();
    let total_cycles: usize = cycle_counts.values().sum();

    let mut stats = CycleStats::default();
    if total_cycles != 0 && token_count != 0 {
        stats.avg = total_cycles as f64 / token_count as f64;
        let diff_sum: f64 = cycle_counts
            .values()
            .filter(|&&count| count > 0)
            .map(|&count| (count as f64 - stats.avg).powi(2))
            .sum();
        stats.std_deviation = (diff_sum / token_count as f64).sqrt();
        stats.total_count = token_count;
    }

    (stats, cycle_counts)
}

/// Runs statistics passes over stored transfers and persists the results.
///
/// # Examples
///
/// ```rust,ignore
/// use transferscan::{ScanConfig, StatisticsEngine};
///
/// let engine = StatisticsEngine::new(&store, ScanConfig::default());
/// if let Some(report) = engine.compute_and_store(contract).await? {
///     println!("collection gap avg: {}", report.collection.block.avg);
/// }
/// ```
pub struct StatisticsEngine<S> {
    store: S,
    config: ScanConfig,
}

impl<S: TransferStore> StatisticsEngine<S> {
    pub fn new(store: S, config: ScanConfig) -> Self {
        Self { store, config }
    }

    /// Compute the statistics report for one collection without persisting
    /// anything. Returns `Ok(None)` when the collection has no transfers.
    pub async fn compute(&self, contract: Address) -> Result<Option<StatisticsReport>, StatsError> {
        let transfers = self.store.list_transfers_ordered(contract).await?;
        if transfers.is_empty() {
            debug!(contract = %contract, "No transfers, skipping statistics pass");
            return Ok(None);
        }

        let (block, token_block) = compute_block_statistics(
            &transfers,
            self.config.mint_address,
            self.config.min_transfers,
        );
        let (cycles, cycle_counts) =
            compute_cycle_statistics(&transfers, self.config.mint_address);

        let tokens = token_block
            .into_iter()
            .map(|(token_id, block)| {
                let cycle_count = cycle_counts.get(&token_id).copied().unwrap_or(0);
                (token_id, TokenSnapshot { block, cycle_count })
            })
            .collect();

        Ok(Some(StatisticsReport {
            collection: CollectionAggregate { block, cycles },
            tokens,
        }))
    }

    /// Compute and persist: collection aggregates are written only when
    /// both the gap and cycle averages are non-zero, and a per-asset row is
    /// created only when its gap average is positive.
    pub async fn compute_and_store(
        &self,
        contract: Address,
    ) -> Result<Option<StatisticsReport>, StatsError> {
        let Some(report) = self.compute(contract).await? else {
            return Ok(None);
        };

        let aggregate = &report.collection;
        if aggregate.block.avg != 0.0 && aggregate.cycles.avg != 0.0 {
            self.store
                .set_collection_stats(
                    contract,
                    CollectionStatsUpdate {
                        block_diff_average: aggregate.block.avg,
                        block_diff_std: aggregate.block.std_deviation,
                        cycle_average: aggregate.cycles.avg,
                        cycle_std: aggregate.cycles.std_deviation,
                    },
                )
                .await?;
        }

        let mut tokens_written = 0usize;
        for (token_id, snapshot) in &report.tokens {
            if snapshot.block.avg > 0.0 {
                self.store
                    .upsert_token_stats(TokenRecord {
                        contract_address: contract,
                        token_id: *token_id,
                        block_diff_average: snapshot.block.avg,
                        block_diff_std: snapshot.block.std_deviation,
                        transfer_count: snapshot.block.total_count as u64,
                        cycle_count: snapshot.cycle_count as u64,
                    })
                    .await?;
                tokens_written += 1;
            }
        }

        info!(
            contract = %contract,
            tokens_written,
            gap_avg = aggregate.block.avg,
            cycle_avg = aggregate.cycles.avg,
            "Persisted statistics pass"
        );

        Ok(Some(report))
    }
}
