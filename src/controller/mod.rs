//! Playback queue controller - the single binding between queues and the
//! audio engine
//!
//! Holds at most one active queue for the whole process. Submitting a queue
//! replaces the previous one wholesale; transport operations delegate to the
//! active queue and are silent no-ops without one, so UI callers can invoke
//! transport controls unconditionally. Organized as:
//!
//! - `mod`: the controller type, the engine seam, observable state
//! - `transport`: submit and the navigation operations

mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use crate::model::QueueItem;
use crate::queue::{Queue, QueueMode};

/// Audio engine collaborator: receives resolved media references and
/// playback commands, never decoded audio
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Hand the engine a new item; `autoplay` starts it immediately
    async fn load(&self, item: &QueueItem, autoplay: bool) -> anyhow::Result<()>;
    async fn pause(&self) -> anyhow::Result<()>;
    async fn resume(&self) -> anyhow::Result<()>;
    async fn seek_to(&self, position_ms: u32) -> anyhow::Result<()>;
}

/// Engine that plays nothing, for embedding without audio wired up
pub struct NullEngine;

#[async_trait]
impl AudioEngine for NullEngine {
    async fn load(&self, _item: &QueueItem, _autoplay: bool) -> anyhow::Result<()> {
        Ok(())
    }
    async fn pause(&self) -> anyhow::Result<()> {
        Ok(())
    }
    async fn resume(&self) -> anyhow::Result<()> {
        Ok(())
    }
    async fn seek_to(&self, _position_ms: u32) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Read-only view of the active queue for display layers ("now playing"
/// highlighting, queue listing)
#[derive(Clone, Debug, Default)]
pub struct QueueSnapshot {
    pub items: Vec<QueueItem>,
    pub position: Option<usize>,
    pub mode: Option<QueueMode>,
    pub is_playing: bool,
    pub last_error: Option<String>,
}

/// Process-wide playback binding; create one at session start, tear it down
/// with [`PlaybackController::shutdown`] at session end
pub struct PlaybackController {
    pub(crate) active: Mutex<Option<Box<dyn Queue>>>,
    pub(crate) engine: Arc<dyn AudioEngine>,
    pub(crate) is_playing: Mutex<bool>,
    pub(crate) last_error: Mutex<Option<String>>,
    snapshot_tx: watch::Sender<QueueSnapshot>,
}

impl PlaybackController {
    pub fn new(engine: Arc<dyn AudioEngine>) -> Self {
        let (snapshot_tx, _) = watch::channel(QueueSnapshot::default());
        Self {
            active: Mutex::new(None),
            engine,
            is_playing: Mutex::new(false),
            last_error: Mutex::new(None),
            snapshot_tx,
        }
    }

    /// Observe queue and cursor changes without polling
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current view of the active queue
    pub async fn queue_snapshot(&self) -> QueueSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub async fn is_playing(&self) -> bool {
        *self.is_playing.lock().await
    }

    /// Whether any queue is currently bound
    pub async fn has_active_queue(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Rebuild the observable snapshot from the active queue and publish it
    pub(crate) async fn publish(&self) {
        let snapshot = {
            let active = self.active.lock().await;
            match active.as_ref() {
                Some(queue) => QueueSnapshot {
                    items: queue.items().await,
                    position: queue.position().await,
                    mode: Some(queue.mode()),
                    is_playing: *self.is_playing.lock().await,
                    last_error: self.last_error.lock().await.clone(),
                },
                None => QueueSnapshot {
                    last_error: self.last_error.lock().await.clone(),
                    ..QueueSnapshot::default()
                },
            }
        };
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Engine and fetch failures surface as display text, never as a panic
    /// or an unhandled fault across the display boundary
    pub(crate) async fn report_error(&self, context: &str, message: String) {
        tracing::error!(context, error = %message, "playback operation failed");
        *self.last_error.lock().await = Some(message);
    }

    pub(crate) async fn clear_error(&self) {
        *self.last_error.lock().await = None;
    }
}
