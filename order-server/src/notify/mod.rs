//! Notification fan-out
//!
//! A broadcast hub that carries post-commit events to every connected
//! subscriber. Publishing is best effort: mutations must never fail or roll
//! back because nobody is listening.

use shared::message::{
    ClientOrdersPayload, EVENT_CLIENT_ORDERS_UPDATE, EVENT_QUEUE_UPDATE, QueueSnapshot,
};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub enum Notification {
    /// Full queue snapshot, for every connected display.
    QueueUpdate(QueueSnapshot),
    /// One client's refreshed order list.
    ClientOrdersUpdate {
        client_uid: String,
        payload: ClientOrdersPayload,
    },
}

impl Notification {
    pub fn event_name(&self) -> &'static str {
        match self {
            Notification::QueueUpdate(_) => EVENT_QUEUE_UPDATE,
            Notification::ClientOrdersUpdate { .. } => EVENT_CLIENT_ORDERS_UPDATE,
        }
    }
}

/// Cloneable handle over a single broadcast channel.
///
/// Receivers that fall behind lose the oldest messages; every payload is a
/// full snapshot, so a dropped message is recovered by the next one.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<Notification>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Fan a notification out to current subscribers.
    ///
    /// Returns how many receivers saw it. Zero subscribers is not an error.
    pub fn publish(&self, notification: Notification) -> usize {
        match self.tx.send(notification) {
            Ok(count) => count,
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> QueueSnapshot {
        QueueSnapshot {
            current_serving: 3,
            queue: Vec::new(),
        }
    }

    #[tokio::test]
    async fn delivers_to_all_subscribers() {
        let hub = NotificationHub::new(8);
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        assert_eq!(hub.publish(Notification::QueueUpdate(snapshot())), 2);

        for rx in [&mut a, &mut b] {
            match rx.recv().await.unwrap() {
                Notification::QueueUpdate(snap) => assert_eq!(snap.current_serving, 3),
                other => panic!("unexpected notification: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = NotificationHub::new(8);
        assert_eq!(hub.publish(Notification::QueueUpdate(snapshot())), 0);
    }

    #[test]
    fn event_names_match_the_wire_protocol() {
        assert_eq!(
            Notification::QueueUpdate(snapshot()).event_name(),
            "queue_update"
        );
        assert_eq!(
            Notification::ClientOrdersUpdate {
                client_uid: "c-1".into(),
                payload: ClientOrdersPayload { orders: Vec::new() },
            }
            .event_name(),
            "client_orders_update"
        );
    }
}
