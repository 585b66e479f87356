//! Shared test doubles for the fetch and engine seams

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::controller::AudioEngine;
use crate::error::CatalogError;
use crate::model::{CatalogItem, CatalogSource, ContinuationToken, ItemKind, Page, PageRequest, QueueItem};

/// A song item with placeholder display metadata
pub fn song(id: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        kind: ItemKind::Song,
        title: format!("Title {}", id),
        subtitle: Some("Artist".to_string()),
        artwork_url: None,
        explicit: false,
    }
}

pub fn songs(ids: &[&str]) -> Vec<CatalogItem> {
    ids.iter().map(|id| song(id)).collect()
}

pub fn page(ids: &[&str], continuation: Option<&str>) -> Page {
    Page {
        items: songs(ids),
        continuation: continuation.map(|t| ContinuationToken(t.to_string())),
    }
}

/// Catalog source answering from a script of pages and errors, in order
pub struct MockCatalogSource {
    script: Mutex<VecDeque<Result<Page, CatalogError>>>,
    requests: Mutex<Vec<PageRequest>>,
    fetch_count: AtomicUsize,
    latency: std::sync::Mutex<Option<Duration>>,
}

impl MockCatalogSource {
    pub fn new(script: Vec<Result<Page, CatalogError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            fetch_count: AtomicUsize::new(0),
            latency: std::sync::Mutex::new(None),
        })
    }

    /// Delay every response, to exercise coalescing and suspension
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Every request seen, in issue order
    pub async fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, CatalogError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.script
            .lock()
            .await
            .pop_front()
            // a script that runs dry ends the chain cleanly
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

/// Engine that records what it was told to do
pub struct MockEngine {
    loaded: Mutex<Vec<String>>,
    seeks: Mutex<Vec<u32>>,
    pauses: AtomicUsize,
    resumes: AtomicUsize,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            loaded: Mutex::new(Vec::new()),
            seeks: Mutex::new(Vec::new()),
            pauses: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
        })
    }

    /// Media URIs handed to the engine, in order
    pub async fn loaded(&self) -> Vec<String> {
        self.loaded.lock().await.clone()
    }

    pub async fn seeks(&self) -> Vec<u32> {
        self.seeks.lock().await.clone()
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn resumes(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioEngine for MockEngine {
    async fn load(&self, item: &QueueItem, _autoplay: bool) -> anyhow::Result<()> {
        self.loaded.lock().await.push(item.media_uri.clone());
        Ok(())
    }

    async fn pause(&self) -> anyhow::Result<()> {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> anyhow::Result<()> {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn seek_to(&self, position_ms: u32) -> anyhow::Result<()> {
        self.seeks.lock().await.push(position_ms);
        Ok(())
    }
}
