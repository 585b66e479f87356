//! Playback queues - the ordered, navigable sequences behind active playback
//!
//! Two variants share one navigation capability: `ListQueue` holds a fully
//! known collection, `ContinuationQueue` grows on demand from a remote
//! "continue playback" listing. Only the playback controller drives these at
//! runtime.

mod continuation_queue;
mod list_queue;

pub use continuation_queue::ContinuationQueue;
pub use list_queue::ListQueue;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::model::QueueItem;

/// Whether a queue is fully materialized or grows on demand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueMode {
    Eager,
    Lazy,
}

/// Navigation capability shared by every queue variant
///
/// The cursor stays within the presented order; a non-empty queue always has
/// a current item. Methods take `&self`: position is interior state owned by
/// the queue, mutated only through these operations.
#[async_trait]
pub trait Queue: Send + Sync {
    /// Item under the cursor
    async fn current(&self) -> Option<QueueItem>;

    /// Move the cursor one step forward and return the item there.
    ///
    /// Returns `Ok(None)` at the end of the sequence, leaving the cursor on
    /// the last item. A lazy queue that outruns its prefetch suspends here
    /// until the pending fetch resolves or fails.
    async fn advance(&self) -> Result<Option<QueueItem>, CatalogError>;

    /// Whether a further item exists or may still arrive
    async fn has_next(&self) -> bool;

    /// The presented sequence so far, in order
    async fn items(&self) -> Vec<QueueItem>;

    /// Move the cursor to `index` in the presented order and return the item
    /// there; out-of-range indices leave the cursor untouched
    async fn jump_to(&self, index: usize) -> Result<Option<QueueItem>, CatalogError>;

    /// Cursor position in the presented order
    async fn position(&self) -> Option<usize>;

    /// Number of items currently materialized
    async fn len(&self) -> usize;

    fn mode(&self) -> QueueMode;
}
