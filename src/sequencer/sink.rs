use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::execution::{ExecutionEvent, SharedTracker};

/// Receiver of the execution events a sequencer run emits.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Epoch token captured when a run starts. Sinks without reset
    /// semantics use a constant.
    async fn epoch(&self) -> u64 {
        0
    }

    /// Deliver `event`. Returns false when the sink rejects it as stale,
    /// which ends the run.
    async fn deliver(&self, epoch: u64, event: ExecutionEvent) -> bool;
}

#[async_trait]
impl EventSink for SharedTracker {
    async fn epoch(&self) -> u64 {
        SharedTracker::epoch(self).await
    }

    async fn deliver(&self, epoch: u64, event: ExecutionEvent) -> bool {
        self.apply_in_epoch(epoch, &event).await
    }
}

#[async_trait]
impl EventSink for mpsc::UnboundedSender<ExecutionEvent> {
    async fn deliver(&self, _epoch: u64, event: ExecutionEvent) -> bool {
        self.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(tx.deliver(0, ExecutionEvent::started("a")).await);
        assert_eq!(rx.recv().await, Some(ExecutionEvent::started("a")));
    }

    #[tokio::test]
    async fn test_channel_sink_closed_rejects() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(!tx.deliver(0, ExecutionEvent::started("a")).await);
    }

    #[tokio::test]
    async fn test_tracker_sink_uses_epoch() {
        let tracker = SharedTracker::new();
        let epoch = EventSink::epoch(&tracker).await;
        tracker.reset().await;
        assert!(!tracker.deliver(epoch, ExecutionEvent::started("a")).await);
    }
}
