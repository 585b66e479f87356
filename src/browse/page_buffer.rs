//! Shared page-fetch-and-cache discipline behind the browse pager and the
//! lazy queue
//!
//! One buffer owns one continuation chain: an append-only, deduplicated item
//! cache plus the token that continues it. Fetches run in the requester's
//! own task (dropping the requester drops the request), are issued strictly
//! sequentially, and concurrent requesters coalesce onto a single in-flight
//! fetch through the fetch gate.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::CatalogError;
use crate::model::{CatalogItem, CatalogSource, ContinuationToken, Page, PageRequest};

/// How far the continuation chain has progressed
#[derive(Clone, Debug, PartialEq, Eq)]
enum ChainState {
    /// The seed request has not been issued yet
    Unstarted,
    /// More pages may follow from this token
    Open(ContinuationToken),
    /// The chain ended normally; no further fetch will be issued
    Exhausted,
    /// The service rejected the chain; only re-seeding recovers
    Broken,
}

struct BufferState {
    items: Vec<CatalogItem>,
    seen: HashSet<String>,
    chain: ChainState,
    last_error: Option<CatalogError>,
}

/// Append-only, deduplicated item cache over one continuation chain
pub struct PageBuffer {
    source: Arc<dyn CatalogSource>,
    seed: PageRequest,
    state: Mutex<BufferState>,
    // Serializes fetch issuance; a waiter re-checks the cache once it holds
    // the gate, so it consumes the finished fetch instead of issuing its own.
    fetch_gate: Mutex<()>,
}

impl PageBuffer {
    pub fn new(source: Arc<dyn CatalogSource>, seed: PageRequest) -> Self {
        Self::preseeded(source, seed, [])
    }

    /// Buffer that already knows some identifiers (e.g. a lazy queue's seed
    /// song), so the service repeating them does not surface duplicates
    pub fn preseeded(
        source: Arc<dyn CatalogSource>,
        seed: PageRequest,
        known_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            source,
            seed,
            state: Mutex::new(BufferState {
                items: Vec::new(),
                seen: known_ids.into_iter().collect(),
                chain: ChainState::Unstarted,
                last_error: None,
            }),
            fetch_gate: Mutex::new(()),
        }
    }

    pub async fn loaded(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn items(&self) -> Vec<CatalogItem> {
        self.state.lock().await.items.clone()
    }

    pub async fn get_cached(&self, index: usize) -> Option<CatalogItem> {
        self.state.lock().await.items.get(index).cloned()
    }

    /// Whether the chain ended normally: every item there will ever be is cached
    pub async fn is_exhausted(&self) -> bool {
        self.state.lock().await.chain == ChainState::Exhausted
    }

    /// Whether the chain died on a rejected continuation
    pub async fn is_broken(&self) -> bool {
        self.state.lock().await.chain == ChainState::Broken
    }

    /// Whether a further fetch could still yield items
    pub async fn chain_open(&self) -> bool {
        matches!(
            self.state.lock().await.chain,
            ChainState::Unstarted | ChainState::Open(_)
        )
    }

    pub async fn last_error(&self) -> Option<CatalogError> {
        self.state.lock().await.last_error.clone()
    }

    /// Grow the cache until `index` is covered or the chain ends.
    ///
    /// Returns `Ok` once `index` is cached or provably absent (chain
    /// exhausted). A transient fetch failure propagates with all cached
    /// state intact; calling again retries the same request. A broken chain
    /// keeps failing with [`CatalogError::InvalidContinuation`] until the
    /// owner re-seeds.
    pub async fn ensure(&self, index: usize) -> Result<(), CatalogError> {
        loop {
            {
                let state = self.state.lock().await;
                if index < state.items.len() {
                    return Ok(());
                }
                match state.chain {
                    ChainState::Exhausted => return Ok(()),
                    ChainState::Broken => return Err(CatalogError::InvalidContinuation),
                    _ => {}
                }
            }

            let _gate = self.fetch_gate.lock().await;

            // Re-check: a coalesced waiter finds the work already done.
            let request = {
                let state = self.state.lock().await;
                if index < state.items.len() {
                    return Ok(());
                }
                match &state.chain {
                    ChainState::Unstarted => self.seed.clone(),
                    ChainState::Open(token) => PageRequest::Continuation(token.clone()),
                    ChainState::Exhausted => return Ok(()),
                    ChainState::Broken => return Err(CatalogError::InvalidContinuation),
                }
            };

            self.fetch_once(request).await?;
        }
    }

    /// Issue exactly one page fetch and fold the result into the cache.
    /// Caller holds the fetch gate.
    async fn fetch_once(&self, request: PageRequest) -> Result<(), CatalogError> {
        match self.source.fetch_page(&request).await {
            Ok(page) => {
                let mut state = self.state.lock().await;
                state.last_error = None;
                Self::append_page(&mut state, page);
                Ok(())
            }
            Err(CatalogError::InvalidContinuation) => {
                let mut state = self.state.lock().await;
                state.chain = ChainState::Broken;
                state.last_error = Some(CatalogError::InvalidContinuation);
                tracing::warn!("continuation chain broken, cached items retained");
                Err(CatalogError::InvalidContinuation)
            }
            Err(err) => {
                // Chain position untouched: the next attempt re-issues the
                // same request.
                let mut state = self.state.lock().await;
                state.last_error = Some(err.clone());
                tracing::debug!(error = %err, "page fetch failed, retryable");
                Err(err)
            }
        }
    }

    fn append_page(state: &mut BufferState, page: Page) {
        for item in page.items {
            if state.seen.insert(item.id.clone()) {
                state.items.push(item);
            } else {
                tracing::debug!(id = %item.id, "dropping duplicate catalog item");
            }
        }
        state.chain = match page.continuation {
            Some(token) => ChainState::Open(token),
            None => ChainState::Exhausted,
        };
    }
}
