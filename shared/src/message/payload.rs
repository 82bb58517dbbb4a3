use serde::{Deserialize, Serialize};

use crate::models::OrderStatus;

/// One entry of the visible queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub ticket_number: Option<i64>,
    pub status: OrderStatus,
    /// Queue-relative running-sum estimate, recomputed on every read.
    /// Supersedes the stored per-order estimate for live display.
    pub estimated_wait_seconds: i64,
    pub order_number: i64,
    pub customer_name: Option<String>,
}

/// Snapshot of the visible queue, broadcast as `queue_update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Highest ticket number already served, 0 if none.
    pub current_serving: i64,
    pub queue: Vec<QueueEntry>,
}

/// One order in a client's personal order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClientOrder {
    pub id: i64,
    pub ticket_number: Option<i64>,
    pub status: OrderStatus,
    pub order_number: i64,
    pub customer_name: Option<String>,
    /// Stored estimate captured at creation/validation time.
    pub estimated_wait_seconds: i64,
    pub created_at: i64,
}

/// Payload sent to one client's channel as `client_orders_update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientOrdersPayload {
    pub orders: Vec<ClientOrder>,
}
