//! Cache of catalog ids already in the user's library, for fast lookup
//! without API calls
//!
//! Readers get an immutable snapshot; the library-sync collaborator replaces
//! the whole set in one swap, so a reader never observes a partially-updated
//! membership set.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

const LIBRARY_CACHE_FILE: &str = ".cache/library_ids.json";

/// Membership cache over the user's library
#[derive(Clone)]
pub struct LibraryCache {
    ids: Arc<RwLock<Arc<HashSet<String>>>>,
    refreshed_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    path: PathBuf,
}

impl LibraryCache {
    pub fn new() -> Self {
        Self::at_path(LIBRARY_CACHE_FILE)
    }

    /// Cache persisted at a caller-chosen location
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            ids: Arc::new(RwLock::new(Arc::new(HashSet::new()))),
            refreshed_at: Arc::new(RwLock::new(None)),
            path: path.into(),
        }
    }

    pub async fn load_from_disk(&self) -> Result<()> {
        use std::fs;

        if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            let ids: Vec<String> = serde_json::from_str(&content)?;
            let mut snapshot = self.ids.write().await;
            *snapshot = Arc::new(ids.into_iter().collect());
        }
        Ok(())
    }

    pub async fn save_to_disk(&self) -> Result<()> {
        use std::fs;

        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let snapshot = self.snapshot().await;
        let ids: Vec<&String> = snapshot.iter().collect();
        let content = serde_json::to_string(&ids)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Replace the whole membership set in one swap
    pub async fn replace(&self, ids: Vec<String>) {
        let next: Arc<HashSet<String>> = Arc::new(ids.into_iter().collect());
        tracing::debug!(count = next.len(), "library membership snapshot replaced");
        *self.ids.write().await = next;
        *self.refreshed_at.write().await = Some(Utc::now());
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.ids.read().await.contains(id)
    }

    /// Immutable view of the current set; stays valid across later replacements
    pub async fn snapshot(&self) -> Arc<HashSet<String>> {
        self.ids.read().await.clone()
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self.refreshed_at.read().await
    }
}

impl Default for LibraryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn membership_follows_latest_replacement() {
        let cache = LibraryCache::at_path("unused");
        assert!(!cache.contains("s1").await);

        cache.replace(vec!["s1".into(), "s2".into()]).await;
        assert!(cache.contains("s1").await);
        assert!(cache.contains("s2").await);
        assert!(cache.refreshed_at().await.is_some());

        cache.replace(vec!["s3".into()]).await;
        assert!(!cache.contains("s1").await);
        assert!(cache.contains("s3").await);
    }

    #[tokio::test]
    async fn snapshot_is_immune_to_later_replacements() {
        let cache = LibraryCache::at_path("unused");
        cache.replace(vec!["s1".into()]).await;

        let held = cache.snapshot().await;
        cache.replace(vec!["s2".into()]).await;

        // the reader's view is frozen; fresh reads see the new set
        assert!(held.contains("s1"));
        assert!(!held.contains("s2"));
        assert!(cache.contains("s2").await);
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library_ids.json");

        let cache = LibraryCache::at_path(&path);
        cache.replace(vec!["s1".into(), "s2".into()]).await;
        cache.save_to_disk().await.unwrap();

        let restored = LibraryCache::at_path(&path);
        restored.load_from_disk().await.unwrap();
        assert!(restored.contains("s1").await);
        assert!(restored.contains("s2").await);
        assert!(!restored.contains("s3").await);
    }

    #[tokio::test]
    async fn missing_cache_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LibraryCache::at_path(dir.path().join("absent.json"));
        cache.load_from_disk().await.unwrap();
        assert!(cache.snapshot().await.is_empty());
    }
}
