// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Resumable, rate-adaptive transfer-log scanner
//!
//! Pages through a collection's transfer events under an unknown and
//! variable provider-side page ceiling. The window (chunk) size adapts
//! multiplicatively to observed event volume, an oversized-result error
//! triggers a backoff that shrinks the window and retries the same start
//! block, and a checkpoint is committed after every window that persists at
//! least one new transfer — so an interrupted scan resumes without
//! re-fetching anything it already stored.
//!
//! Window processing is strictly sequential: each window's chunk-size
//! decision and start position depend on the previous window's outcome, and
//! the checkpoint write must be ordered after the data write it certifies.
//! Callers must not run two scans of the same contract concurrently; scans
//! of different contracts are independent.

mod parse;

use alloy_primitives::Address;
use alloy_rpc_types::Log;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::estimate::BlockHeightEstimator;
use crate::metadata::CollectionMetadata;
use crate::model::{Collection, ScanReport, ScanWindow};
use crate::provider::ChainClient;
use crate::store::TransferStore;

/// Scan-loop state machine.
///
/// `Scanning` fetches one window, `Persisting` decodes and stores its
/// results and advances the cursor, `Backoff` reacts to an oversized result
/// by shrinking the window and retrying the same start block.
enum ScanState {
    Idle,
    Scanning,
    Persisting { window: ScanWindow, raw: Vec<Log> },
    Backoff,
    Done,
}

/// Checkpointed scanner for one collection's transfer events.
///
/// Holds references to its three collaborators (chain provider, persistence,
/// metadata source) without owning their lifetimes — pass `&C`/`Arc<C>` to
/// share them across scanners.
///
/// # Examples
///
/// ```rust,ignore
/// use transferscan::{ScanConfig, TransferScanner};
///
/// let scanner = TransferScanner::new(&client, &store, &metadata, ScanConfig::default());
/// let report = scanner.scan(contract).await?;
/// println!(
///     "{} events over {} blocks in {} calls",
///     report.events_found, report.blocks_scanned, report.provider_calls
/// );
/// ```
pub struct TransferScanner<C, S, M> {
    client: C,
    store: S,
    metadata: M,
    config: ScanConfig,
}

impl<C, S, M> TransferScanner<C, S, M>
where
    C: ChainClient,
    S: TransferStore,
    M: CollectionMetadata,
{
    /// Create a scanner over the given collaborators.
    pub fn new(client: C, store: S, metadata: M, config: ScanConfig) -> Self {
        Self {
            client,
            store,
            metadata,
            config,
        }
    }

    /// Scan a collection, resolving the start block automatically.
    ///
    /// A known collection resumes from its checkpoint (falling back to its
    /// recorded start block). An unknown one is seeded from its creation
    /// timestamp via the block-height estimator and recorded in the store
    /// before the first window is fetched.
    pub async fn scan(&self, contract: Address) -> Result<ScanReport, ScanError> {
        let head = self
            .client
            .chain_head()
            .await
            .map_err(|e| ScanError::provider(e, ScanReport::default()))?;

        let (start_block, collection_existed) = self.resolve_start_block(contract, head).await?;
        self.run(contract, start_block, head, collection_existed)
            .await
    }

    /// Scan a collection from an explicit start block, bypassing checkpoint
    /// resolution. An unknown collection is recorded at that block first.
    pub async fn scan_from(
        &self,
        contract: Address,
        start_block: u64,
    ) -> Result<ScanReport, ScanError> {
        let head = self
            .client
            .chain_head()
            .await
            .map_err(|e| ScanError::provider(e, ScanReport::default()))?;

        let existing = self
            .store
            .find_collection(contract)
            .await
            .map_err(|e| ScanError::store(e, ScanReport::default()))?;

        let collection_existed = existing.is_some();
        if !collection_existed {
            let details = self.metadata.collection_details(contract).await?;
            self.store
                .insert_collection(Collection::new(contract, details.name, start_block))
                .await
                .map_err(|e| ScanError::store(e, ScanReport::default()))?;
        }

        self.run(contract, start_block, head, collection_existed)
            .await
    }

    /// Resolve where a scan should start and whether the collection already
    /// has rows in the store (which decides whether inserts need existence
    /// checks).
    async fn resolve_start_block(
        &self,
        contract: Address,
        head: u64,
    ) -> Result<(u64, bool), ScanError> {
        if let Some(collection) = self
            .store
            .find_collection(contract)
            .await
            .map_err(|e| ScanError::store(e, ScanReport::default()))?
        {
            let resume = collection.resume_block();
            debug!(contract = %contract, resume, "Resuming from checkpoint");
            return Ok((resume, true));
        }

        let details = self.metadata.collection_details(contract).await?;
        let estimator = BlockHeightEstimator::new(&self.client, &self.config);
        let start_block = estimator.estimate(details.created_at.into(), head).await?;

        info!(
            contract = %contract,
            name = %details.name,
            start_block,
            "Discovered new collection"
        );

        self.store
            .insert_collection(Collection::new(contract, details.name, start_block))
            .await
            .map_err(|e| ScanError::store(e, ScanReport::default()))?;

        Ok((start_block, false))
    }

    /// The scan loop proper.
    ///
    /// `dedup_check` is decided once per invocation: a brand-new collection
    /// skips per-row existence checks because the store is known empty.
    async fn run(
        &self,
        contract: Address,
        start_block: u64,
        head: u64,
        dedup_check: bool,
    ) -> Result<ScanReport, ScanError> {
        if start_block > head {
            return Err(ScanError::StartBeyondHead { start_block, head });
        }

        info!(
            contract = %contract,
            start_block,
            head,
            "Starting transfer scan"
        );

        let mut chunk_size = self.config.min_chunk_size;
        let mut scan_start = start_block;
        let mut scan_end = start_block.saturating_add(chunk_size);
        let mut report = ScanReport::default();
        let mut state = ScanState::Idle;

        loop {
            state = match state {
                ScanState::Idle => ScanState::Scanning,

                ScanState::Scanning => {
                    if scan_end > head {
                        ScanState::Done
                    } else {
                        // The window end is clamped so a request never
                        // reaches past the head observed at scan start.
                        let window = ScanWindow {
                            start_block: scan_start,
                            end_block: scan_start.saturating_add(chunk_size).min(head),
                            chunk_size,
                        };

                        match self
                            .client
                            .transfer_logs(contract, window.start_block, window.end_block)
                            .await
                        {
                            Ok(raw) => {
                                report.provider_calls += 1;
                                ScanState::Persisting { window, raw }
                            }
                            Err(e) if e.is_result_too_large() => {
                                report.provider_calls += 1;
                                warn!(
                                    from_block = window.start_block,
                                    to_block = window.end_block,
                                    "Provider page ceiling hit, backing off"
                                );
                                ScanState::Backoff
                            }
                            Err(e) => return Err(ScanError::provider(e, report)),
                        }
                    }
                }

                ScanState::Persisting { window, raw } => {
                    let events_found = raw.len();
                    let (transfers, skipped) = parse::transfers_from_logs(&raw);
                    if skipped > 0 {
                        warn!(skipped, "Skipped raw records with unsupported topic shape");
                    }

                    let inserted = if transfers.is_empty() {
                        0
                    } else {
                        self.store
                            .bulk_insert_transfers(&transfers, dedup_check)
                            .await
                            .map_err(|e| ScanError::store(e, report))?
                    };

                    report.events_found += events_found as u64;
                    report.blocks_scanned += window.chunk_size;

                    debug!(
                        from_block = window.start_block,
                        to_block = window.end_block,
                        events_found,
                        inserted,
                        "Processed scan window"
                    );

                    chunk_size = adjusted_chunk_size(&self.config, events_found, chunk_size);
                    scan_start = scan_end.saturating_add(1);
                    scan_end = scan_start.saturating_add(chunk_size);

                    // Only certify progress when this window actually added
                    // data; duplicate-only windows must not move the
                    // checkpoint.
                    if inserted > 0 {
                        self.store
                            .set_checkpoint(contract, window.end_block)
                            .await
                            .map_err(|e| ScanError::store(e, report))?;
                    }

                    if let Some(delay) = self.config.rate_limit_delay {
                        sleep(delay).await;
                    }

                    ScanState::Scanning
                }

                ScanState::Backoff => {
                    scan_end = scan_end.saturating_sub(chunk_size);
                    chunk_size = self.config.min_chunk_size;
                    debug!(scan_start, scan_end, chunk_size, "Reset window after backoff");
                    ScanState::Scanning
                }

                ScanState::Done => break,
            };
        }

        info!(
            contract = %contract,
            events_found = report.events_found,
            blocks_scanned = report.blocks_scanned,
            provider_calls = report.provider_calls,
            "Finished transfer scan"
        );

        Ok(report)
    }
}

/// Multiplicative chunk-size adaptation, applied after every successful
/// window: halve (floored at the minimum) after a high-volume window, double
/// (capped at the maximum) otherwise. The result is always floored to an
/// integer block count.
fn adjusted_chunk_size(config: &ScanConfig, events_found: usize, chunk_size: u64) -> u64 {
    if events_found > config.high_volume_threshold {
        ((chunk_size as f64 * config.chunk_shrink) as u64).max(config.min_chunk_size)
    } else {
        ((chunk_size as f64 * config.chunk_growth) as u64).min(config.max_chunk_size)
    }
}
