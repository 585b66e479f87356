//! Browse pager: one endpoint's paginated results as a single lazy sequence
//!
//! The pager hides page boundaries from the display layer. Consumption past
//! the cached prefix suspends the consumer for exactly one page fetch;
//! replaying the sequence serves the cached prefix without touching the
//! network. One pager per browse session; a dead (broken-chain) pager is
//! discarded and a new one opened from the same endpoint.

use std::sync::Arc;

use futures::stream::Stream;

use crate::browse::page_buffer::PageBuffer;
use crate::error::CatalogError;
use crate::model::{BrowseEndpoint, CatalogItem, CatalogSource, LibraryCache, PageRequest};

/// What the display layer needs to render a browse session
#[derive(Clone, Debug)]
pub struct BrowseSnapshot {
    pub items: Vec<CatalogItem>,
    /// More pages may still arrive
    pub has_more: bool,
    /// The session is dead; reopen from the endpoint
    pub terminal: bool,
    /// Last transient failure, for a retry affordance
    pub last_error: Option<String>,
}

/// A catalog item plus whether it is already in the user's library
#[derive(Clone, Debug)]
pub struct AnnotatedItem {
    pub item: CatalogItem,
    pub in_library: bool,
}

/// Lazily-growing, in-order view over one browse endpoint
pub struct BrowsePager {
    endpoint: BrowseEndpoint,
    buffer: PageBuffer,
}

impl BrowsePager {
    /// Open a browse session; the first page is fetched by the first
    /// consumption step, suspending only that requester
    pub fn open(source: Arc<dyn CatalogSource>, endpoint: BrowseEndpoint) -> Self {
        tracing::debug!(endpoint = %endpoint, "opening browse pager");
        let buffer = PageBuffer::new(source, PageRequest::Browse(endpoint.clone()));
        Self { endpoint, buffer }
    }

    pub fn endpoint(&self) -> &BrowseEndpoint {
        &self.endpoint
    }

    /// Item at `index`, fetching pages as needed; `None` once the sequence
    /// is exhausted before `index`
    pub async fn get(&self, index: usize) -> Result<Option<CatalogItem>, CatalogError> {
        self.buffer.ensure(index).await?;
        Ok(self.buffer.get_cached(index).await)
    }

    /// Grow the cache by one page if the chain is still open.
    ///
    /// Returns whether more items may still arrive afterwards. This doubles
    /// as the retry affordance after a transient failure.
    pub async fn load_more(&self) -> Result<bool, CatalogError> {
        let target = self.buffer.loaded().await;
        self.buffer.ensure(target).await?;
        Ok(self.buffer.chain_open().await)
    }

    /// The full sequence, in order. Restartable: every call replays the
    /// cached prefix without re-fetching, then continues fetching where the
    /// cache ends. The stream terminates after yielding an error.
    pub fn stream(&self) -> impl Stream<Item = Result<CatalogItem, CatalogError>> + '_ {
        futures::stream::try_unfold(0usize, move |index| async move {
            let item = self.get(index).await?;
            Ok(item.map(|item| (item, index + 1)))
        })
    }

    /// Drive the chain to its end and return everything it yielded
    pub async fn collect_all(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        while self.buffer.chain_open().await {
            let target = self.buffer.loaded().await;
            self.buffer.ensure(target).await?;
        }
        Ok(self.buffer.items().await)
    }

    pub async fn loaded(&self) -> usize {
        self.buffer.loaded().await
    }

    pub async fn snapshot(&self) -> BrowseSnapshot {
        BrowseSnapshot {
            items: self.buffer.items().await,
            has_more: self.buffer.chain_open().await,
            terminal: self.buffer.is_broken().await,
            last_error: self
                .buffer
                .last_error()
                .await
                .filter(|e| e.is_transient())
                .map(|e| e.to_string()),
        }
    }

    /// Cached items tagged with library membership, for list rendering
    pub async fn annotated_items(&self, library: &LibraryCache) -> Vec<AnnotatedItem> {
        let membership = library.snapshot().await;
        self.buffer
            .items()
            .await
            .into_iter()
            .map(|item| AnnotatedItem {
                in_library: membership.contains(&item.id),
                item,
            })
            .collect()
    }
}
