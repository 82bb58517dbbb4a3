//! Order and order-item models
//!
//! An order moves through a strict status pipeline. The ticket number is
//! attached only when an admin validates the order; before that the order
//! is visible in the queue purely by insertion order.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// `Preparing` is a cosmetic sub-state of `Validated` used by some kitchen
/// displays; the server accepts it wherever `Validated` is accepted but
/// never produces it on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(
    feature = "db",
    derive(sqlx::Type),
    sqlx(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum OrderStatus {
    Pending,
    Validated,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Validated => "VALIDATED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Served => "SERVED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal statuses admit no further transition, not even cancellation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Served | OrderStatus::Cancelled)
    }

    /// Statuses counted as committed to the kitchen pipeline (ticketed and
    /// not yet served). Drives both queue membership and the backlog factor
    /// of the wait estimator.
    pub fn in_pipeline(&self) -> bool {
        matches!(
            self,
            OrderStatus::Validated | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    /// Whether the state machine allows `self -> to`.
    ///
    /// Statuses never regress; cancellation is reachable from any
    /// non-terminal status.
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, to) {
            (_, Cancelled) => !self.is_terminal(),
            (Pending, Validated) => true,
            (Validated, Preparing) => true,
            (Validated, Ready) | (Preparing, Ready) => true,
            (Ready, Served) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Opaque device/session identifier; absent for anonymous orders.
    pub client_uid: Option<String>,
    /// Monotonic per-client counter, unique only within one `client_uid`.
    pub order_number: i64,
    /// Globally unique kitchen ticket, assigned once at validation.
    pub ticket_number: Option<i64>,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    /// Point-in-time estimate captured at creation and again at validation.
    pub estimated_wait_seconds: i64,
    pub created_at: i64,
    pub validated_at: Option<i64>,
    pub ready_at: Option<i64>,
    pub served_at: Option<i64>,
}

/// One line of an order.
///
/// `name` and `unit_price_cents` are snapshotted from the menu item at
/// creation time so later menu edits cannot rewrite order history;
/// `menu_item_id` stays as a weak lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub name: String,
    pub unit_price_cents: i64,
}

/// One line item in an order-creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Order-creation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub client_uid: Option<String>,
    pub items: Vec<OrderItemInput>,
}

/// Order-creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub id: i64,
    pub order_number: i64,
    /// Always null at creation; tickets are assigned at validation.
    pub ticket_number: Option<i64>,
    pub estimated_wait_seconds: i64,
}

/// Validation response: the freshly assigned ticket and the recomputed wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub ticket_number: i64,
    pub estimated_wait_seconds: i64,
}

/// Receipt line for order detail display.
///
/// Quantity, name and unit price come from the creation-time snapshot;
/// only the description is joined live from the menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReceiptLine {
    pub quantity: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(Pending.can_transition(Validated));
        assert!(Validated.can_transition(Preparing));
        assert!(Validated.can_transition(Ready));
        assert!(Preparing.can_transition(Ready));
        assert!(Ready.can_transition(Served));
    }

    #[test]
    fn status_never_regresses() {
        assert!(!Validated.can_transition(Pending));
        assert!(!Ready.can_transition(Validated));
        assert!(!Served.can_transition(Ready));
        assert!(!Served.can_transition(Validated));
        assert!(!Ready.can_transition(Pending));
    }

    #[test]
    fn cancel_from_any_non_terminal_status() {
        assert!(Pending.can_transition(Cancelled));
        assert!(Validated.can_transition(Cancelled));
        assert!(Preparing.can_transition(Cancelled));
        assert!(Ready.can_transition(Cancelled));
    }

    #[test]
    fn terminal_statuses_admit_nothing() {
        for to in [Pending, Validated, Preparing, Ready, Served, Cancelled] {
            assert!(!Served.can_transition(to), "SERVED -> {to}");
            assert!(!Cancelled.can_transition(to), "CANCELLED -> {to}");
        }
    }

    #[test]
    fn pipeline_membership() {
        assert!(Validated.in_pipeline());
        assert!(Preparing.in_pipeline());
        assert!(Ready.in_pipeline());
        assert!(!Pending.in_pipeline());
        assert!(!Served.in_pipeline());
        assert!(!Cancelled.in_pipeline());
    }
}
