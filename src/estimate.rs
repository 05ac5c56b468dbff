//! Timestamp-to-block-height estimation
//!
//! Maps a wall-clock timestamp to an approximate block height using a
//! linear-interpolation search rather than plain bisection: block production
//! is roughly uniform, so interpolating between the bound timestamps
//! converges in a handful of oracle calls where bisection would need dozens.
//!
//! The result is deliberately biased early by a fixed margin so that a scan
//! seeded from it can never miss the first transfers of a collection, even
//! when block times drift around the target.

use alloy_primitives::BlockNumber;
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::errors::EstimationError;
use crate::model::UnixTimestamp;
use crate::provider::ChainClient;

/// Linear-interpolation search for the block height at (or just before) a
/// target timestamp.
///
/// Each step samples timestamps at both bounds, derives the average block
/// time over the interval, extrapolates a candidate from the target's
/// fractional position, then re-centers the bounds around the candidate
/// plus/minus the signed block-count error. Terminates when the bounds
/// collapse or after a fixed iteration cap.
///
/// Oracle failures propagate unchanged; there is no internal retry.
///
/// # Examples
///
/// ```rust,ignore
/// use transferscan::{BlockHeightEstimator, ScanConfig};
///
/// let estimator = BlockHeightEstimator::new(&client, &ScanConfig::default());
/// let head = client.chain_head().await?;
/// let start_block = estimator.estimate(created_at.into(), head).await?;
/// ```
pub struct BlockHeightEstimator<C> {
    client: C,
    margin: u64,
    max_iterations: u32,
}

impl<C: ChainClient> BlockHeightEstimator<C> {
    /// Creates an estimator taking its margin and iteration cap from config.
    pub fn new(client: C, config: &ScanConfig) -> Self {
        Self {
            client,
            margin: config.estimate_margin,
            max_iterations: config.estimate_max_iterations,
        }
    }

    /// Estimate the height of the block nearest `target`, biased early by
    /// the configured margin (never below block 1).
    ///
    /// Search bounds are `[1, head]` and are re-clamped to that range every
    /// iteration; the zero-width interval is guarded before any division.
    pub async fn estimate(
        &self,
        target: UnixTimestamp,
        head: BlockNumber,
    ) -> Result<BlockNumber, EstimationError> {
        if head == 0 {
            return Err(EstimationError::invalid_bounds("chain head is zero"));
        }

        let target_ts = target.0 as f64;
        let mut low: u64 = 1;
        let mut high: u64 = head;

        for iteration in 0..self.max_iterations {
            if low >= high {
                break;
            }

            let ts_low = self.client.block_timestamp(low).await? as f64;
            let ts_high = self.client.block_timestamp(high).await? as f64;
            if ts_high <= ts_low {
                // Degenerate interval; interpolating would divide by zero.
                break;
            }

            let span_blocks = (high - low) as f64;
            let avg_block_time = (ts_high - ts_low) / span_blocks;

            // Fractional position of the target between the bound
            // timestamps, assuming evenly spaced blocks.
            let k = (target_ts - ts_low) / (ts_high - ts_low);
            let candidate = clamp_block(low as f64 + k * span_blocks, head);

            let ts_candidate = self.client.block_timestamp(candidate).await? as f64;

            // Signed distance from the candidate to the target, in blocks.
            let error_blocks = ((target_ts - ts_candidate) / avg_block_time) as i128;
            let adjusted = candidate as i128 + error_blocks;
            let radius = error_blocks.unsigned_abs() as i128;

            low = clamp_block((adjusted - radius) as f64, head);
            high = clamp_block((adjusted + radius) as f64, head);

            trace!(
                iteration,
                low,
                high,
                candidate,
                error_blocks = error_blocks as i64,
                "Narrowed estimate bounds"
            );
        }

        let result = low.saturating_sub(self.margin).max(1);
        debug!(target = %target, result, "Estimated block height");
        Ok(result)
    }
}

fn clamp_block(value: f64, head: BlockNumber) -> BlockNumber {
    if value <= 1.0 {
        return 1;
    }
    if value >= head as f64 {
        return head;
    }
    value as BlockNumber
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use alloy_primitives::Address;
    use alloy_rpc_types::Log;
    use async_trait::async_trait;

    /// Chain with a perfectly uniform 13-second block time.
    struct UniformChain {
        genesis_ts: u64,
        block_time: u64,
        head: u64,
    }

    impl UniformChain {
        fn timestamp_at(&self, height: u64) -> u64 {
            self.genesis_ts + height * self.block_time
        }
    }

    #[async_trait]
    impl ChainClient for UniformChain {
        async fn chain_head(&self) -> Result<BlockNumber, ProviderError> {
            Ok(self.head)
        }

        async fn block_timestamp(&self, height: BlockNumber) -> Result<u64, ProviderError> {
            if height > self.head {
                return Err(ProviderError::BlockNotFound {
                    block_number: height,
                });
            }
            Ok(self.timestamp_at(height))
        }

        async fn transfer_logs(
            &self,
            _contract: Address,
            _from_block: BlockNumber,
            _to_block: BlockNumber,
        ) -> Result<Vec<Log>, ProviderError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_uniform_chain_converges_to_margin_biased_height() {
        let chain = UniformChain {
            genesis_ts: 1_600_000_000,
            block_time: 13,
            head: 1_000_000,
        };
        let config = ScanConfig::default();
        let estimator = BlockHeightEstimator::new(&chain, &config);

        let true_height = 730_450u64;
        let target = UnixTimestamp(chain.timestamp_at(true_height) as i64);

        let estimate = estimator.estimate(target, chain.head).await.unwrap();
        assert_eq!(estimate, true_height - config.estimate_margin);
    }

    #[tokio::test]
    async fn test_result_is_floored_at_block_one() {
        let chain = UniformChain {
            genesis_ts: 1_600_000_000,
            block_time: 13,
            head: 10_000,
        };
        let estimator = BlockHeightEstimator::new(&chain, &ScanConfig::default());

        // Target near genesis: the margin would push below block 1.
        let target = UnixTimestamp(chain.timestamp_at(5) as i64);
        let estimate = estimator.estimate(target, chain.head).await.unwrap();
        assert_eq!(estimate, 1);
    }

    #[tokio::test]
    async fn test_zero_head_is_rejected() {
        let chain = UniformChain {
            genesis_ts: 0,
            block_time: 13,
            head: 0,
        };
        let estimator = BlockHeightEstimator::new(&chain, &ScanConfig::default());
        let err = estimator
            .estimate(UnixTimestamp(1_600_000_000), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, EstimationError::InvalidBounds { .. }));
    }
}
