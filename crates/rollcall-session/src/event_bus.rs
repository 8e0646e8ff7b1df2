//! Session event bus.
//!
//! `tokio::broadcast` fan-out of `SessionEvent`s.

use rollcall_core::models::event::SessionEvent;
use tokio::sync::broadcast;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct SessionEventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to current subscribers. Dropped when nobody listens.
    pub fn publish(&self, event: SessionEvent) {
        trace!("session event: {:?}", event);
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new(128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = SessionEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::CameraStarted);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, SessionEvent::CameraStarted);
    }

    #[tokio::test]
    async fn clones_share_subscribers() {
        let bus = SessionEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.clone().publish(SessionEvent::TickSkipped);

        assert_eq!(rx1.recv().await.unwrap(), SessionEvent::TickSkipped);
        assert_eq!(rx2.recv().await.unwrap(), SessionEvent::TickSkipped);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = SessionEventBus::default();
        bus.publish(SessionEvent::CameraStopped);
    }
}
