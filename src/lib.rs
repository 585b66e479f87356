//! tunedeck - browse and playback-queue core for a streaming music client
//!
//! Turns a remote, server-paginated music catalog into lazily-fetched
//! browse sequences and hands any browsed collection to a playback engine
//! as an ordered, navigable queue. The display layer, audio engine, and
//! library-sync are external collaborators behind traits.
//!
//! - `model`: catalog data types, the remote fetch seam, the library cache
//! - `browse`: the paginated browse pipeline (page buffer + pager)
//! - `queue`: eager and lazy playback queues
//! - `controller`: the process-wide playback binding
//! - `logging`: file-based tracing setup for host applications
//! - `error`: the fetch and queue error taxonomy

pub mod browse;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod queue;

#[cfg(test)]
pub(crate) mod test_support;

pub use browse::{AnnotatedItem, BrowsePager, BrowseSnapshot};
pub use controller::{AudioEngine, NullEngine, PlaybackController, QueueSnapshot};
pub use error::{CatalogError, QueueError};
pub use model::{
    BrowseEndpoint, CatalogItem, CatalogSource, ClientConfig, ContinuationToken,
    HttpCatalogClient, ItemKind, LibraryCache, Page, PageRequest, PlaybackEndpoint, QueueItem,
};
pub use queue::{ContinuationQueue, ListQueue, Queue, QueueMode};
