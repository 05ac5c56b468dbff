//! Error types for the transferscan library.
//!
//! This module provides strongly-typed errors for all public APIs. It follows
//! a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`ProviderError`],
//!   [`ScanError`], ...)
//! - **Unified error type** ([`IndexerError`]) for callers that don't need to
//!   distinguish between error sources
//!
//! # Architecture
//!
//! Each major module has its own error type:
//! - [`ProviderError`] - Blockchain provider failures, including the
//!   recoverable `ResultTooLarge` page-ceiling overflow
//! - [`EstimationError`] - Failures during timestamp-to-block estimation
//! - [`ScanError`] - Terminal scan failures, carrying the counters
//!   accumulated before the abort
//! - [`StoreError`] - Persistence collaborator failures
//! - [`MetadataError`] - Collection-metadata lookup failures
//! - [`StatsError`] - Statistics pass failures
//!
//! # Examples
//!
//! ```rust,ignore
//! use transferscan::errors::ScanError;
//! use transferscan::TransferScanner;
//!
//! match scanner.scan(contract).await {
//!     Ok(report) => println!("found {} events", report.events_found),
//!     Err(ScanError::StartBeyondHead { start_block, head }) => {
//!         eprintln!("checkpoint {start_block} is past head {head}");
//!     }
//!     Err(e) => eprintln!("scan aborted: {e}"),
//! }
//! ```

mod estimate;
mod metadata;
mod provider;
mod scan;
mod stats;
mod store;

pub use estimate::EstimationError;
pub use metadata::MetadataError;
pub use provider::ProviderError;
pub use scan::ScanError;
pub use stats::StatsError;
pub use store::StoreError;

/// Unified error type for all transferscan operations.
///
/// Wraps every module-specific error type. All of them convert into
/// `IndexerError` via `From`, so `?` propagates naturally across module
/// boundaries.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// Error from the blockchain provider collaborator.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from block-height estimation.
    #[error("estimation error: {0}")]
    Estimation(#[from] EstimationError),

    /// Error from a scan invocation.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Error from the persistence collaborator.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the metadata collaborator.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Error from a statistics pass.
    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),
}
