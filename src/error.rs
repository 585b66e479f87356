//! Error types for the browse and queue pipeline
//!
//! Fetch-level failures carry a transient/fatal distinction: transient errors
//! leave all cached state intact and the same request may simply be retried,
//! while a rejected continuation kills the pagination session and only
//! re-seeding from a fresh endpoint recovers.

use thiserror::Error;

/// Errors surfaced by the remote catalog fetch path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Transport-level failure; retryable, cached state is preserved
    #[error("network error: {0}")]
    Network(String),

    /// The service rejected the continuation token; the pagination session
    /// is dead and must be re-seeded from its endpoint
    #[error("continuation token expired or malformed")]
    InvalidContinuation,

    /// The service answered with a payload we could not decode
    #[error("malformed page response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Whether the same request may be retried without re-seeding
    pub fn is_transient(&self) -> bool {
        !matches!(self, CatalogError::InvalidContinuation)
    }
}

/// Errors from queue construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// No queue is created from zero items
    #[error("cannot build a queue from an empty collection")]
    EmptyCollection,

    /// The requested start position does not address any item
    #[error("start index {index} out of range for {len} items")]
    StartIndexOutOfRange { index: usize, len: usize },
}
