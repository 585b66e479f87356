//! Model module - catalog data types, the remote fetch seam, and caches
//!
//! - `types`: catalog and queue data types
//! - `catalog`: the `CatalogSource` trait and its HTTP implementation
//! - `cache`: library membership cache

mod cache;
mod catalog;
mod types;

pub use types::{
    BrowseEndpoint, CatalogItem, ContinuationToken, ItemKind, Page, PageRequest,
    PlaybackEndpoint, QueueItem,
};

pub use catalog::{CatalogSource, ClientConfig, HttpCatalogClient};

pub use cache::LibraryCache;
