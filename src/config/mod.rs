//! Configuration for scanning and statistics passes
//!
//! This module provides a flexible configuration system for the chunk-size
//! adaptation heuristics, the block-height estimator, and the statistics
//! thresholds.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use transferscan::ScanConfig;
//!
//! // Chunk window [20, 10_000], mint address = zero address
//! let config = ScanConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use transferscan::ScanConfigBuilder;
//! use std::time::Duration;
//!
//! let config = ScanConfigBuilder::with_defaults()
//!     .max_chunk_size(2_000)
//!     .rate_limit_delay(Duration::from_millis(250))
//!     .build();
//! ```

use std::time::Duration;

use alloy_primitives::Address;

/// Configuration for scan and statistics behavior
///
/// Controls the chunk-size adaptation window, backoff behavior, the
/// block-height estimator, and which transfers count toward statistics.
/// Use [`ScanConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Smallest window the scanner will request, and the size it resets to
    /// on backoff. Default: 20 blocks.
    pub min_chunk_size: u64,

    /// Largest window the scanner will request. Default: 10_000 blocks.
    pub max_chunk_size: u64,

    /// Multiplier applied after a low-volume window. Default: 2.0.
    pub chunk_growth: f64,

    /// Multiplier applied after a high-volume window. Default: 0.5.
    pub chunk_shrink: f64,

    /// Event count above which a window counts as high-volume.
    /// Default: 1000.
    pub high_volume_threshold: usize,

    /// The designated mint/origin address. Transfers sent from it represent
    /// asset creation, not wallet-to-wallet trades, and are excluded from
    /// gap statistics and graph edges. Default: the zero address.
    pub mint_address: Address,

    /// Assets with no more than this many recorded transfers are excluded
    /// from block-gap statistics (exclusive rule: `count > min_transfers`
    /// qualifies). Default: 3.
    pub min_transfers: usize,

    /// Blocks subtracted from the estimator result to bias it safely before
    /// the target timestamp. Default: 100.
    pub estimate_margin: u64,

    /// Iteration cap for the interpolation search. Default: 100.
    pub estimate_max_iterations: u32,

    /// Delay between successful windows to avoid provider throttling.
    /// Default: None (no delay).
    pub rate_limit_delay: Option<Duration>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 20,
            max_chunk_size: 10_000,
            chunk_growth: 2.0,
            chunk_shrink: 0.5,
            high_volume_threshold: 1000,
            mint_address: Address::ZERO,
            min_transfers: 3,
            estimate_margin: 100,
            estimate_max_iterations: 100,
            rate_limit_delay: None,
        }
    }
}

/// Builder for [`ScanConfig`] with a fluent API
///
/// # Examples
///
/// ```rust
/// use transferscan::ScanConfigBuilder;
/// use alloy_primitives::address;
///
/// let config = ScanConfigBuilder::with_defaults()
///     .min_chunk_size(50)
///     .mint_address(address!("000000000000000000000000000000000000dead"))
///     .build();
///
/// assert_eq!(config.min_chunk_size, 50);
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Start from the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Set the minimum (and backoff-reset) chunk size.
    pub fn min_chunk_size(mut self, blocks: u64) -> Self {
        self.config.min_chunk_size = blocks;
        self
    }

    /// Set the maximum chunk size.
    pub fn max_chunk_size(mut self, blocks: u64) -> Self {
        self.config.max_chunk_size = blocks;
        self
    }

    /// Set the event count above which a window is considered high-volume.
    pub fn high_volume_threshold(mut self, events: usize) -> Self {
        self.config.high_volume_threshold = events;
        self
    }

    /// Set the designated mint/origin address.
    pub fn mint_address(mut self, address: Address) -> Self {
        self.config.mint_address = address;
        self
    }

    /// Set the per-asset transfer-count threshold for gap statistics.
    pub fn min_transfers(mut self, count: usize) -> Self {
        self.config.min_transfers = count;
        self
    }

    /// Set the early-bias margin of the block-height estimator.
    pub fn estimate_margin(mut self, blocks: u64) -> Self {
        self.config.estimate_margin = blocks;
        self
    }

    /// Set the delay applied between successful scan windows.
    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.config.rate_limit_delay = Some(delay);
        self
    }

    /// Finalize the configuration.
    pub fn build(self) -> ScanConfig {
        self.config
    }
}
