//! Transport operations: queue submission and navigation

use super::PlaybackController;
use crate::queue::Queue;

impl PlaybackController {
    /// Replace the active queue and start the engine on its current item.
    ///
    /// The previous queue is discarded entirely; its background work dies
    /// with it. Queues cannot be empty by construction, so the new binding
    /// always has a current item.
    pub async fn submit(&self, queue: Box<dyn Queue>) {
        let len = queue.len().await;
        tracing::info!(mode = ?queue.mode(), len, "submitting new queue");

        let current = queue.current().await;
        {
            let mut active = self.active.lock().await;
            *active = Some(queue);
        }
        self.clear_error().await;

        if let Some(item) = current {
            if let Err(e) = self.engine.load(&item, true).await {
                self.report_error("submit", e.to_string()).await;
            } else {
                *self.is_playing.lock().await = true;
            }
        }
        self.publish().await;
    }

    /// Step to the next item; no-op without an active queue or at the end
    pub async fn next(&self) {
        let advanced = {
            let active = self.active.lock().await;
            let Some(queue) = active.as_ref() else {
                tracing::debug!("next ignored, no active queue");
                return;
            };
            queue.advance().await
        };

        match advanced {
            Ok(Some(item)) => {
                tracing::debug!(position = item.position, id = %item.id(), "advanced to next item");
                if let Err(e) = self.engine.load(&item, true).await {
                    self.report_error("next", e.to_string()).await;
                }
            }
            Ok(None) => {
                tracing::debug!("end of queue reached");
            }
            Err(e) => {
                self.report_error("next", e.to_string()).await;
            }
        }
        self.publish().await;
    }

    /// Step back one item; at the head, restart the current item instead
    pub async fn previous(&self) {
        let jumped = {
            let active = self.active.lock().await;
            let Some(queue) = active.as_ref() else {
                tracing::debug!("previous ignored, no active queue");
                return;
            };
            match queue.position().await {
                Some(position) if position > 0 => Some(queue.jump_to(position - 1).await),
                _ => None,
            }
        };

        match jumped {
            Some(Ok(Some(item))) => {
                if let Err(e) = self.engine.load(&item, true).await {
                    self.report_error("previous", e.to_string()).await;
                }
            }
            Some(Ok(None)) => {}
            Some(Err(e)) => {
                self.report_error("previous", e.to_string()).await;
            }
            // already at the head: restart the current item
            None => {
                if let Err(e) = self.engine.seek_to(0).await {
                    self.report_error("previous", e.to_string()).await;
                }
            }
        }
        self.publish().await;
    }

    /// Move the cursor to `index` in the presented order; out-of-range
    /// indices and a missing queue are no-ops
    pub async fn jump_to(&self, index: usize) {
        let jumped = {
            let active = self.active.lock().await;
            let Some(queue) = active.as_ref() else {
                tracing::debug!(index, "jump ignored, no active queue");
                return;
            };
            queue.jump_to(index).await
        };

        match jumped {
            Ok(Some(item)) => {
                tracing::debug!(position = item.position, "jumped to item");
                if let Err(e) = self.engine.load(&item, true).await {
                    self.report_error("jump", e.to_string()).await;
                }
            }
            Ok(None) => {
                tracing::debug!(index, "jump target out of range");
            }
            Err(e) => {
                self.report_error("jump", e.to_string()).await;
            }
        }
        self.publish().await;
    }

    /// Flip between playing and paused; no-op without an active queue
    pub async fn toggle_playback(&self) {
        if !self.has_active_queue().await {
            return;
        }
        let was_playing = *self.is_playing.lock().await;
        let result = if was_playing {
            self.engine.pause().await
        } else {
            self.engine.resume().await
        };
        match result {
            Ok(()) => {
                *self.is_playing.lock().await = !was_playing;
            }
            Err(e) => {
                self.report_error("toggle", e.to_string()).await;
            }
        }
        self.publish().await;
    }

    /// Session teardown: drop the active queue (cancelling its background
    /// work) and silence the engine
    pub async fn shutdown(&self) {
        tracing::info!("playback controller shutting down");
        {
            let mut active = self.active.lock().await;
            *active = None;
        }
        *self.is_playing.lock().await = false;
        if let Err(e) = self.engine.pause().await {
            tracing::debug!(error = %e, "engine pause on shutdown failed");
        }
        self.publish().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::BrowsePager;
    use crate::controller::PlaybackController;
    use crate::model::BrowseEndpoint;
    use crate::queue::{ContinuationQueue, ListQueue, QueueMode};
    use crate::test_support::{page, song, songs, MockCatalogSource, MockEngine};
    use std::sync::Arc;

    fn controller() -> (PlaybackController, Arc<MockEngine>) {
        let engine = MockEngine::new();
        (PlaybackController::new(engine.clone()), engine)
    }

    #[tokio::test]
    async fn transport_without_a_queue_is_a_silent_noop() {
        let (controller, engine) = controller();

        controller.next().await;
        controller.previous().await;
        controller.jump_to(3).await;
        controller.toggle_playback().await;

        assert!(engine.loaded().await.is_empty());
        assert!(controller.queue_snapshot().await.items.is_empty());
    }

    #[tokio::test]
    async fn submit_starts_the_engine_on_the_current_item() {
        let (controller, engine) = controller();
        let queue = ListQueue::with_start(songs(&["a", "b", "c"]), 1).unwrap();

        controller.submit(Box::new(queue)).await;

        assert_eq!(engine.loaded().await, ["tune:song:b"]);
        assert!(controller.is_playing().await);
        let snapshot = controller.queue_snapshot().await;
        assert_eq!(snapshot.position, Some(1));
        assert_eq!(snapshot.mode, Some(QueueMode::Eager));
        assert_eq!(snapshot.items.len(), 3);
    }

    #[tokio::test]
    async fn submitting_a_new_queue_discards_the_old_one() {
        let (controller, engine) = controller();

        controller
            .submit(Box::new(ListQueue::new(songs(&["a", "b"])).unwrap()))
            .await;
        controller
            .submit(Box::new(ListQueue::new(songs(&["x", "y"])).unwrap()))
            .await;

        // navigation operates on the new queue only
        controller.next().await;
        assert_eq!(
            engine.loaded().await,
            ["tune:song:a", "tune:song:x", "tune:song:y"]
        );
        let snapshot = controller.queue_snapshot().await;
        let ids: Vec<&str> = snapshot.items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, ["x", "y"]);
        assert_eq!(snapshot.position, Some(1));
    }

    #[tokio::test]
    async fn next_at_the_end_keeps_the_last_item_current() {
        let (controller, engine) = controller();
        controller
            .submit(Box::new(ListQueue::new(songs(&["a", "b"])).unwrap()))
            .await;

        controller.next().await;
        controller.next().await;
        controller.next().await;

        assert_eq!(engine.loaded().await, ["tune:song:a", "tune:song:b"]);
        assert_eq!(controller.queue_snapshot().await.position, Some(1));
    }

    #[tokio::test]
    async fn previous_steps_back_and_restarts_at_the_head() {
        let (controller, engine) = controller();
        controller
            .submit(Box::new(ListQueue::new(songs(&["a", "b"])).unwrap()))
            .await;

        controller.next().await;
        controller.previous().await;
        assert_eq!(
            engine.loaded().await,
            ["tune:song:a", "tune:song:b", "tune:song:a"]
        );

        // at the head: seek to the start instead of moving
        controller.previous().await;
        assert_eq!(engine.seeks().await, [0]);
        assert_eq!(controller.queue_snapshot().await.position, Some(0));
    }

    #[tokio::test]
    async fn toggle_flips_between_pause_and_resume() {
        let (controller, engine) = controller();
        controller
            .submit(Box::new(ListQueue::new(songs(&["a"])).unwrap()))
            .await;

        controller.toggle_playback().await;
        assert!(!controller.is_playing().await);
        controller.toggle_playback().await;
        assert!(controller.is_playing().await);
        assert_eq!(engine.pauses(), 1);
        assert_eq!(engine.resumes(), 1);
    }

    #[tokio::test]
    async fn shutdown_clears_the_binding() {
        let (controller, _engine) = controller();
        controller
            .submit(Box::new(ListQueue::new(songs(&["a"])).unwrap()))
            .await;

        controller.shutdown().await;

        assert!(!controller.has_active_queue().await);
        assert!(!controller.is_playing().await);
        assert!(controller.queue_snapshot().await.items.is_empty());
        controller.next().await; // still a no-op, not a panic
    }

    #[tokio::test]
    async fn lazy_queue_grows_under_the_controller() {
        let (controller, engine) = controller();
        let source = MockCatalogSource::new(vec![
            Ok(page(&["a"], Some("t1"))),
            Ok(page(&["b"], None)),
        ]);
        let queue = ContinuationQueue::new(source.clone(), song("seed"));

        controller.submit(Box::new(queue)).await;
        controller.next().await;
        controller.next().await;
        controller.next().await;

        assert_eq!(
            engine.loaded().await,
            ["tune:song:seed", "tune:song:a", "tune:song:b"]
        );
        let snapshot = controller.queue_snapshot().await;
        assert_eq!(snapshot.mode, Some(QueueMode::Lazy));
        assert_eq!(snapshot.items.len(), 3);
        assert_eq!(snapshot.position, Some(2));
    }

    #[tokio::test]
    async fn watch_subscribers_see_cursor_movement() {
        let (controller, _engine) = controller();
        let mut rx = controller.subscribe();

        controller
            .submit(Box::new(ListQueue::new(songs(&["a", "b"])).unwrap()))
            .await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().position, Some(0));

        controller.next().await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().position, Some(1));
    }

    #[tokio::test]
    async fn browse_to_playback_roundtrip_for_a_single_page_album() {
        // the full pipeline: browse an album of 12 songs, play all, shuffle
        let ids: Vec<String> = (1..=12).map(|n| format!("s{}", n)).collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let source = MockCatalogSource::new(vec![Ok(page(&id_refs, None))]);
        let pager = BrowsePager::open(source.clone(), BrowseEndpoint::Album("alb1".into()));

        let collection = pager.collect_all().await.unwrap();
        assert_eq!(collection.len(), 12);

        let (controller, _engine) = controller();
        controller
            .submit(Box::new(ListQueue::new(collection.clone()).unwrap()))
            .await;
        let snapshot = controller.queue_snapshot().await;
        assert_eq!(snapshot.items.len(), 12);
        assert_eq!(snapshot.position, Some(0));

        controller
            .submit(Box::new(ListQueue::shuffled(collection.clone()).unwrap()))
            .await;
        let shuffled = controller.queue_snapshot().await;
        assert_eq!(shuffled.items.len(), 12);
        assert_eq!(shuffled.position, Some(0));

        let original: std::collections::HashSet<&str> =
            collection.iter().map(|i| i.id.as_str()).collect();
        let permuted: std::collections::HashSet<&str> =
            shuffled.items.iter().map(|i| i.id()).collect();
        assert_eq!(original, permuted);
    }
}
