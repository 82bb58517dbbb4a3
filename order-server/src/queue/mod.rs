//! Queue service
//!
//! Exposes the visible queue and drives the order status state machine.
//! All writes go through [`OrderRepository`]; the service adds the
//! estimator pass on top and never bypasses the store.

pub mod estimator;

pub use estimator::{EstimatorConfig, estimate_wait_seconds};

use chrono::Timelike;
use shared::message::{ClientOrdersPayload, QueueEntry, QueueSnapshot};
use shared::models::{CreateOrderRequest, CreateOrderResponse, Order, ReceiptLine, ValidateResponse};
use sqlx::SqlitePool;

use crate::db::repository::{NewOrder, NewOrderItem, OrderRepository, RepoResult};

#[derive(Clone)]
pub struct QueueService {
    store: OrderRepository,
    estimator: EstimatorConfig,
    queue_limit: i64,
    client_orders_limit: i64,
}

impl QueueService {
    pub fn new(
        pool: SqlitePool,
        estimator: EstimatorConfig,
        queue_limit: i64,
        client_orders_limit: i64,
    ) -> Self {
        Self {
            store: OrderRepository::new(pool),
            estimator,
            queue_limit,
            client_orders_limit,
        }
    }

    /// Submit a new order: atomic create, then the initial wait estimate.
    ///
    /// The stored estimate is a point-in-time value: captured here and
    /// refreshed once more at validation, never on queue reads.
    pub async fn place_order(&self, req: CreateOrderRequest) -> RepoResult<CreateOrderResponse> {
        let order = self
            .store
            .create(NewOrder {
                customer_name: req.customer_name,
                client_uid: req.client_uid,
                items: req
                    .items
                    .into_iter()
                    .map(|it| NewOrderItem {
                        menu_item_id: it.menu_item_id,
                        quantity: it.quantity,
                    })
                    .collect(),
            })
            .await?;

        let estimate = self.refresh_estimate(order.id).await?;

        tracing::info!(
            order_id = order.id,
            order_number = order.order_number,
            estimate_seconds = estimate,
            "Order placed"
        );

        Ok(CreateOrderResponse {
            id: order.id,
            order_number: order.order_number,
            ticket_number: None,
            estimated_wait_seconds: estimate,
        })
    }

    /// Admin validation: assigns the ticket and refreshes the estimate,
    /// since this is when the order's pipeline position becomes
    /// authoritative.
    pub async fn validate_order(&self, id: i64) -> RepoResult<ValidateResponse> {
        let order = self.store.assign_ticket(id).await?;
        let estimate = self.refresh_estimate(order.id).await?;

        // assign_ticket only returns orders it just ticketed
        let ticket_number = order.ticket_number.unwrap_or_default();
        tracing::info!(
            order_id = id,
            ticket_number,
            estimate_seconds = estimate,
            "Order validated"
        );

        Ok(ValidateResponse {
            ticket_number,
            estimated_wait_seconds: estimate,
        })
    }

    pub async fn mark_ready(&self, id: i64) -> RepoResult<Order> {
        self.store.mark_ready(id).await
    }

    pub async fn mark_served(&self, id: i64) -> RepoResult<Order> {
        self.store.mark_served(id).await
    }

    pub async fn cancel_order(&self, id: i64) -> RepoResult<Order> {
        self.store.cancel(id).await
    }

    pub async fn get_order(&self, id: i64) -> RepoResult<Option<Order>> {
        self.store.find_by_id(id).await
    }

    pub async fn order_items(&self, id: i64) -> RepoResult<Vec<ReceiptLine>> {
        self.store.items_for_order(id).await
    }

    /// The visible queue with queue-relative wait estimates.
    ///
    /// Each entry's wait is the running sum of the preparation time of
    /// everything ahead of it plus its own, capped at the ceiling. This
    /// supersedes the stored per-order estimate for live display.
    pub async fn queue_snapshot(&self) -> RepoResult<QueueSnapshot> {
        let current_serving = self.store.current_serving().await?;
        let rows = self
            .store
            .queue_rows(
                current_serving,
                self.estimator.default_prep_seconds,
                self.queue_limit,
            )
            .await?;

        let mut wait_before: i64 = 0;
        let queue = rows
            .into_iter()
            .map(|row| {
                let estimate = (wait_before + row.prep_seconds).min(self.estimator.ceiling_seconds);
                wait_before += row.prep_seconds;
                QueueEntry {
                    id: row.id,
                    ticket_number: row.ticket_number,
                    status: row.status,
                    estimated_wait_seconds: estimate,
                    order_number: row.order_number,
                    customer_name: row.customer_name,
                }
            })
            .collect();

        Ok(QueueSnapshot {
            current_serving,
            queue,
        })
    }

    /// A client's own orders, newest first, cancelled ones excluded.
    pub async fn orders_for_client(&self, client_uid: &str) -> RepoResult<ClientOrdersPayload> {
        let orders = self
            .store
            .orders_for_client(client_uid, self.client_orders_limit)
            .await?;
        Ok(ClientOrdersPayload { orders })
    }

    /// Recompute and persist the stored estimate for one order.
    async fn refresh_estimate(&self, id: i64) -> RepoResult<i64> {
        let base_prep = self
            .store
            .prep_seconds(id, self.estimator.default_prep_seconds)
            .await?;
        let ahead = self.store.count_pipeline_ahead(id).await?;
        let hour = chrono::Local::now().hour();

        let estimate = estimate_wait_seconds(base_prep, ahead, hour, &self.estimator);
        self.store.set_estimate(id, estimate).await?;
        Ok(estimate)
    }
}
