//! Lazy queue over a remote "continue playback" listing
//!
//! Grows from a single seed song by walking the same page-fetch-and-cache
//! discipline as the browse pager (its own buffer instance, preseeded with
//! the seed id so the service repeating it never surfaces a duplicate).
//! Upcoming items are prefetched in the background as the cursor nears the
//! cached end; playback that outruns the prefetch suspends in `advance()`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::browse::PageBuffer;
use crate::error::CatalogError;
use crate::model::{CatalogItem, CatalogSource, PageRequest, PlaybackEndpoint, QueueItem};
use crate::queue::{Queue, QueueMode};

pub struct ContinuationQueue {
    seed: CatalogItem,
    buffer: Arc<PageBuffer>,
    cursor: Mutex<usize>,
    prefetch: Mutex<Option<JoinHandle<()>>>,
}

impl ContinuationQueue {
    /// Queue seeded from one song; the continuation listing starts loading
    /// immediately so playback of the seed overlaps the first fetch.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(source: Arc<dyn CatalogSource>, seed: CatalogItem) -> Self {
        let endpoint = PlaybackEndpoint {
            seed_id: seed.id.clone(),
        };
        tracing::debug!(seed = %seed.id, "building continuation queue");
        let buffer = Arc::new(PageBuffer::preseeded(
            source,
            PageRequest::Playback(endpoint),
            [seed.id.clone()],
        ));
        let initial_prefetch = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                if let Err(e) = buffer.ensure(0).await {
                    tracing::warn!(error = %e, "initial queue prefetch failed");
                }
            })
        };
        Self {
            seed,
            buffer,
            cursor: Mutex::new(0),
            prefetch: Mutex::new(Some(initial_prefetch)),
        }
    }

    /// Presented index 0 is the seed; everything after maps into the buffer
    async fn item_at(&self, index: usize) -> Option<QueueItem> {
        if index == 0 {
            return Some(QueueItem::resolve(self.seed.clone(), 0));
        }
        self.buffer
            .get_cached(index - 1)
            .await
            .map(|item| QueueItem::resolve(item, index))
    }

    /// Background-fetch the next page once the cursor is within two items of
    /// the cached end. The prefetch and any foreground fetch share the
    /// buffer's fetch gate, so at most one request is ever in flight.
    async fn arm_prefetch(&self) {
        let cursor = *self.cursor.lock().await;
        let len = 1 + self.buffer.loaded().await;
        if cursor + 2 < len {
            return;
        }
        if !self.buffer.chain_open().await {
            return;
        }

        let mut slot = self.prefetch.lock().await;
        if let Some(handle) = slot.as_ref() {
            if !handle.is_finished() {
                return;
            }
        }

        let buffer = self.buffer.clone();
        let target = buffer.loaded().await;
        tracing::debug!(cursor, cached = len, "arming queue prefetch");
        *slot = Some(tokio::spawn(async move {
            if let Err(e) = buffer.ensure(target).await {
                tracing::warn!(error = %e, "queue prefetch failed");
            }
        }));
    }
}

#[async_trait]
impl Queue for ContinuationQueue {
    async fn current(&self) -> Option<QueueItem> {
        let cursor = *self.cursor.lock().await;
        self.item_at(cursor).await
    }

    async fn advance(&self) -> Result<Option<QueueItem>, CatalogError> {
        let mut cursor = self.cursor.lock().await;
        let target = *cursor + 1;

        // Suspends when playback outran the prefetch; coalesces with it
        // through the fetch gate otherwise.
        self.buffer.ensure(target - 1).await?;

        match self.item_at(target).await {
            Some(item) => {
                *cursor = target;
                drop(cursor);
                self.arm_prefetch().await;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    async fn has_next(&self) -> bool {
        let cursor = *self.cursor.lock().await;
        cursor + 1 < 1 + self.buffer.loaded().await || self.buffer.chain_open().await
    }

    async fn items(&self) -> Vec<QueueItem> {
        let mut items = vec![QueueItem::resolve(self.seed.clone(), 0)];
        items.extend(
            self.buffer
                .items()
                .await
                .into_iter()
                .enumerate()
                .map(|(i, item)| QueueItem::resolve(item, i + 1)),
        );
        items
    }

    async fn jump_to(&self, index: usize) -> Result<Option<QueueItem>, CatalogError> {
        if index > 0 {
            self.buffer.ensure(index - 1).await?;
        }
        match self.item_at(index).await {
            Some(item) => {
                *self.cursor.lock().await = index;
                self.arm_prefetch().await;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    async fn position(&self) -> Option<usize> {
        Some(*self.cursor.lock().await)
    }

    async fn len(&self) -> usize {
        1 + self.buffer.loaded().await
    }

    fn mode(&self) -> QueueMode {
        QueueMode::Lazy
    }
}

impl Drop for ContinuationQueue {
    fn drop(&mut self) {
        // A discarded queue takes its in-flight prefetch with it; the abort
        // lands before the task can touch the buffer again.
        if let Some(handle) = self.prefetch.get_mut().take() {
            handle.abort();
        }
    }
}
