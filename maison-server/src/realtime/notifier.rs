//! Notifier
//!
//! Publish seam between domain logic and the socket layer. Ledgers hold an
//! `Arc<dyn Notifier>` and never know whether anyone is listening.

use async_trait::async_trait;
use serde_json::Value;
use socketioxide::SocketIo;
use std::sync::Mutex;

use shared::Topic;

/// Best-effort publish of a payload to a topic's room
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: Topic, payload: Value);
}

/// Discards everything. Used when the socket layer is disabled.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn publish(&self, _topic: Topic, _payload: Value) {}
}

/// Records every publish in memory, for assertions in tests
#[derive(Default)]
pub struct MemoryNotifier {
    published: Mutex<Vec<(Topic, Value)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(Topic, Value)> {
        self.published.lock().unwrap().clone()
    }

    pub fn count_for(&self, topic: &Topic) -> usize {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .count()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(&self, topic: Topic, payload: Value) {
        self.published.lock().unwrap().push((topic, payload));
    }
}

/// Emits into the topic's socket.io room
pub struct SocketNotifier {
    io: SocketIo,
}

impl SocketNotifier {
    pub fn new(io: SocketIo) -> Self {
        Self { io }
    }
}

#[async_trait]
impl Notifier for SocketNotifier {
    async fn publish(&self, topic: Topic, payload: Value) {
        let room = topic.room();
        let event = topic.event();
        if let Err(e) = self.io.to(room.clone()).emit(event, &payload).await {
            tracing::warn!("Socket emit to {} failed: {}", room, e);
        } else {
            tracing::debug!("Published {} to {}", event, room);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier
            .publish(Topic::Order("o1".to_string()), json!({"status": "paid"}))
            .await;
        notifier.publish(Topic::Analytics, json!({"total": 1})).await;

        let published = notifier.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, Topic::Order("o1".to_string()));
        assert_eq!(notifier.count_for(&Topic::Analytics), 1);
    }
}
