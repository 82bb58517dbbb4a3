//! Shared types for the ordering server and its clients
//!
//! Wire-level data models and notification payloads. Everything here is
//! plain serde; database derives are gated behind the `db` feature so
//! client builds stay light.

pub mod message;
pub mod models;

pub use message::{ClientOrdersPayload, QueueEntry, QueueSnapshot};
pub use models::{MenuItem, Order, OrderItem, OrderStatus};
