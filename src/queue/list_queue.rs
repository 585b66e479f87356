//! Eager queue over a fully known collection

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::error::{CatalogError, QueueError};
use crate::model::{CatalogItem, QueueItem};
use crate::queue::{Queue, QueueMode};

/// Playback queue over a pre-resolved, finite collection; never touches the
/// network
#[derive(Debug)]
pub struct ListQueue {
    items: Vec<QueueItem>,
    cursor: Mutex<usize>,
}

impl ListQueue {
    /// Queue over `items` in the given order, starting at the first item
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, QueueError> {
        Self::with_start(items, 0)
    }

    /// Queue starting at `start_index` (e.g. the item the user tapped)
    pub fn with_start(items: Vec<CatalogItem>, start_index: usize) -> Result<Self, QueueError> {
        if items.is_empty() {
            return Err(QueueError::EmptyCollection);
        }
        if start_index >= items.len() {
            return Err(QueueError::StartIndexOutOfRange {
                index: start_index,
                len: items.len(),
            });
        }
        let items = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| QueueItem::resolve(item, position))
            .collect();
        Ok(Self {
            items,
            cursor: Mutex::new(start_index),
        })
    }

    /// Queue over a permutation of `items`, fixed at construction; replaying
    /// the queue keeps the same order, and positions address the shuffled
    /// order
    pub fn shuffled(mut items: Vec<CatalogItem>) -> Result<Self, QueueError> {
        items.shuffle(&mut rand::thread_rng());
        Self::with_start(items, 0)
    }
}

#[async_trait]
impl Queue for ListQueue {
    async fn current(&self) -> Option<QueueItem> {
        let cursor = self.cursor.lock().await;
        self.items.get(*cursor).cloned()
    }

    async fn advance(&self) -> Result<Option<QueueItem>, CatalogError> {
        let mut cursor = self.cursor.lock().await;
        if *cursor + 1 < self.items.len() {
            *cursor += 1;
            Ok(self.items.get(*cursor).cloned())
        } else {
            Ok(None)
        }
    }

    async fn has_next(&self) -> bool {
        let cursor = self.cursor.lock().await;
        *cursor + 1 < self.items.len()
    }

    async fn items(&self) -> Vec<QueueItem> {
        self.items.clone()
    }

    async fn jump_to(&self, index: usize) -> Result<Option<QueueItem>, CatalogError> {
        if index >= self.items.len() {
            return Ok(None);
        }
        let mut cursor = self.cursor.lock().await;
        *cursor = index;
        Ok(self.items.get(index).cloned())
    }

    async fn position(&self) -> Option<usize> {
        Some(*self.cursor.lock().await)
    }

    async fn len(&self) -> usize {
        self.items.len()
    }

    fn mode(&self) -> QueueMode {
        QueueMode::Eager
    }
}
