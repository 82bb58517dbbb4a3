//! Order repository
//!
//! Owns the two sequences of the system: `order_number` (per client) and
//! `ticket_number` (global). Both are derived inside the storage layer with
//! atomic read-then-write statements so concurrent server instances agree
//! without any in-process counter.

use shared::message::ClientOrder;
use shared::models::{Order, OrderStatus, ReceiptLine};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, unix_now};

const ORDER_COLUMNS: &str = "id, client_uid, order_number, ticket_number, status, customer_name, \
     estimated_wait_seconds, created_at, validated_at, ready_at, served_at";

/// One line of an order-creation request. Menu lookup happens inside the
/// creation transaction.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// Order-creation input.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: Option<String>,
    pub client_uid: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// Row shape backing the queue view: order fields plus the order's total
/// preparation time, used for the running-sum display estimate.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QueueRow {
    pub id: i64,
    pub ticket_number: Option<i64>,
    pub status: OrderStatus,
    pub order_number: i64,
    pub customer_name: Option<String>,
    pub prep_seconds: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an order and its line items in one transaction.
    ///
    /// `order_number` is `max(existing for this client) + 1` (1 for
    /// anonymous orders). Each line snapshots the menu item's name and
    /// price; a missing menu item rolls the whole order back.
    pub async fn create(&self, new: NewOrder) -> RepoResult<Order> {
        if new.items.is_empty() {
            return Err(RepoError::Validation("items must not be empty".into()));
        }
        if let Some(bad) = new.items.iter().find(|it| it.quantity <= 0) {
            return Err(RepoError::Validation(format!(
                "quantity must be positive (menu item {})",
                bad.menu_item_id
            )));
        }

        let mut tx = self.pool.begin().await?;

        let order_number: i64 = match &new.client_uid {
            Some(uid) => {
                sqlx::query_scalar(
                    "SELECT COALESCE(MAX(order_number), 0) + 1 FROM orders WHERE client_uid = ?",
                )
                .bind(uid)
                .fetch_one(&mut *tx)
                .await?
            }
            None => 1,
        };

        let created_at = unix_now();
        let result = sqlx::query(
            "INSERT INTO orders (client_uid, order_number, status, customer_name, created_at)
             VALUES (?, ?, 'PENDING', ?, ?)",
        )
        .bind(&new.client_uid)
        .bind(order_number)
        .bind(&new.customer_name)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;
        let order_id = result.last_insert_rowid();

        for item in &new.items {
            let snapshot: Option<(String, i64)> =
                sqlx::query_as("SELECT name, price_cents FROM menu_items WHERE id = ?")
                    .bind(item.menu_item_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let (name, unit_price_cents) = snapshot.ok_or_else(|| {
                RepoError::NotFound(format!("Menu item {} not found", item.menu_item_id))
            })?;

            sqlx::query(
                "INSERT INTO order_items (order_id, menu_item_id, quantity, name, unit_price_cents)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.menu_item_id)
            .bind(item.quantity)
            .bind(&name)
            .bind(unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::Database("order vanished after creation".into()))
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    /// Line items for receipt display: quantity, snapshotted name and unit
    /// price, plus the live menu description.
    pub async fn items_for_order(&self, id: i64) -> RepoResult<Vec<ReceiptLine>> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Order {id} not found")));
        }
        let lines = sqlx::query_as::<_, ReceiptLine>(
            "SELECT oi.quantity, oi.name, oi.unit_price_cents,
                    COALESCE(mi.description, '') AS description
             FROM order_items oi
             LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id
             WHERE oi.order_id = ?
             ORDER BY oi.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    /// Allocate the next global ticket number and move the order to
    /// VALIDATED.
    ///
    /// A single UPDATE performs the read-then-write: SQLite serializes the
    /// statement, so two orders can never receive the same ticket, and the
    /// `WHERE` guard makes the call safe against double submission:
    /// exactly one ticket per order, ever.
    pub async fn assign_ticket(&self, id: i64) -> RepoResult<Order> {
        let result = sqlx::query(
            "UPDATE orders
             SET ticket_number = (SELECT COALESCE(MAX(ticket_number), 0) + 1 FROM orders),
                 status = 'VALIDATED',
                 validated_at = ?
             WHERE id = ? AND status = 'PENDING' AND ticket_number IS NULL",
        )
        .bind(unix_now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.guard_failure(id, OrderStatus::Validated).await?);
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("order vanished after validation".into()))
    }

    /// VALIDATED/PREPARING -> READY, setting `ready_at` once.
    pub async fn mark_ready(&self, id: i64) -> RepoResult<Order> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'READY', ready_at = ?
             WHERE id = ? AND status IN ('VALIDATED', 'PREPARING')",
        )
        .bind(unix_now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.guard_failure(id, OrderStatus::Ready).await?);
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("order vanished after transition".into()))
    }

    /// READY -> SERVED, terminal.
    pub async fn mark_served(&self, id: i64) -> RepoResult<Order> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'SERVED', served_at = ?
             WHERE id = ? AND status = 'READY'",
        )
        .bind(unix_now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.guard_failure(id, OrderStatus::Served).await?);
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("order vanished after transition".into()))
    }

    /// Any non-terminal status -> CANCELLED. Line items are kept for audit.
    pub async fn cancel(&self, id: i64) -> RepoResult<Order> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'CANCELLED'
             WHERE id = ? AND status IN ('PENDING', 'VALIDATED', 'PREPARING', 'READY')",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.guard_failure(id, OrderStatus::Cancelled).await?);
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("order vanished after cancellation".into()))
    }

    /// Persist a freshly computed wait estimate.
    pub async fn set_estimate(&self, id: i64, estimate_seconds: i64) -> RepoResult<()> {
        sqlx::query("UPDATE orders SET estimated_wait_seconds = ? WHERE id = ?")
            .bind(estimate_seconds)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Highest ticket number among served orders, 0 if none.
    pub async fn current_serving(&self) -> RepoResult<i64> {
        let current: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(ticket_number), 0) FROM orders WHERE status = 'SERVED'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(current)
    }

    /// The visible queue, ordered by the merged key
    /// `COALESCE(ticket_number, id)` and capped.
    ///
    /// Membership: ticketed pipeline orders not yet reached by
    /// `current_serving`, interleaved with all unticketed pending orders.
    pub async fn queue_rows(
        &self,
        current_serving: i64,
        default_prep_seconds: i64,
        limit: i64,
    ) -> RepoResult<Vec<QueueRow>> {
        let rows = sqlx::query_as::<_, QueueRow>(
            "SELECT o.id, o.ticket_number, o.status, o.order_number, o.customer_name,
                    COALESCE((SELECT SUM(oi.quantity * COALESCE(mi.avg_prep_seconds, ?1))
                              FROM order_items oi
                              LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id
                              WHERE oi.order_id = o.id), ?1) AS prep_seconds
             FROM orders o
             WHERE (o.ticket_number IS NOT NULL
                    AND o.status IN ('VALIDATED', 'PREPARING', 'READY')
                    AND o.ticket_number > ?2)
                OR (o.status = 'PENDING' AND o.ticket_number IS NULL)
             ORDER BY COALESCE(o.ticket_number, o.id) ASC
             LIMIT ?3",
        )
        .bind(default_prep_seconds)
        .bind(current_serving)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A client's non-cancelled orders, newest first, capped.
    pub async fn orders_for_client(
        &self,
        client_uid: &str,
        limit: i64,
    ) -> RepoResult<Vec<ClientOrder>> {
        let orders = sqlx::query_as::<_, ClientOrder>(
            "SELECT id, ticket_number, status, order_number, customer_name,
                    estimated_wait_seconds, created_at
             FROM orders
             WHERE client_uid = ? AND status != 'CANCELLED'
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(client_uid)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    /// Orders ahead of `id` that are committed to the kitchen pipeline.
    pub async fn count_pipeline_ahead(&self, id: i64) -> RepoResult<i64> {
        let ahead: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders
             WHERE id < ? AND status IN ('VALIDATED', 'PREPARING', 'READY')",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(ahead)
    }

    /// Total preparation seconds for one order, falling back to the default
    /// per item when prep data is unavailable.
    pub async fn prep_seconds(&self, id: i64, default_prep_seconds: i64) -> RepoResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(oi.quantity * COALESCE(mi.avg_prep_seconds, ?1)), ?1)
             FROM order_items oi
             LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id
             WHERE oi.order_id = ?2",
        )
        .bind(default_prep_seconds)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Build the error for a rejected guarded update: distinguishes a
    /// missing order from a real state-machine violation.
    async fn guard_failure(&self, id: i64, attempted: OrderStatus) -> RepoResult<RepoError> {
        let current: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(match current {
            None => RepoError::NotFound(format!("Order {id} not found")),
            Some(current) => RepoError::InvalidTransition { current, attempted },
        })
    }
}
