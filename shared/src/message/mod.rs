//! Notification payloads
//!
//! The event contract carried by the server's fan-out channel. Transport is
//! deliberately unspecified: any push layer (websocket, SSE, TCP bus) that
//! delivers these payloads verbatim satisfies the contract, and a missed
//! event is always recoverable by pulling a fresh snapshot.

mod payload;

pub use payload::{ClientOrder, ClientOrdersPayload, QueueEntry, QueueSnapshot};

/// Event name for queue broadcasts.
pub const EVENT_QUEUE_UPDATE: &str = "queue_update";
/// Event name for per-client order list pushes.
pub const EVENT_CLIENT_ORDERS_UPDATE: &str = "client_orders_update";
