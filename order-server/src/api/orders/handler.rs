//! Orders API handlers
//!
//! Customer-facing creation and reads plus the staff status transitions.
//! Every mutation ends with the post-commit broadcasts; those are fired
//! after the response payload is already decided and cannot fail the call.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::message::{ClientOrdersPayload, QueueSnapshot};
use shared::models::{
    CreateOrderRequest, CreateOrderResponse, Order, ReceiptLine, ValidateResponse,
};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// POST /api/orders - place a new order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<CreateOrderResponse>)> {
    let client_uid = payload.client_uid.clone();
    let response = state.queue.place_order(payload).await?;

    state.notify_queue_changed().await;
    state.notify_client_orders(client_uid.as_deref()).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/orders/queue - the public queue board
pub async fn queue(State(state): State<ServerState>) -> AppResult<Json<QueueSnapshot>> {
    let snapshot = state.queue.queue_snapshot().await?;
    Ok(Json(snapshot))
}

/// GET /api/orders/client/:client_uid - one client's own orders
pub async fn client_orders(
    State(state): State<ServerState>,
    Path(client_uid): Path<String>,
) -> AppResult<Json<ClientOrdersPayload>> {
    let payload = state.queue.orders_for_client(&client_uid).await?;
    Ok(Json(payload))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state
        .queue
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// GET /api/orders/:id/items - receipt lines with snapshotted prices
pub async fn items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ReceiptLine>>> {
    let lines = state.queue.order_items(id).await?;
    Ok(Json(lines))
}

/// POST /api/orders/:id/validate - staff accepts the order into the kitchen
pub async fn validate(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ValidateResponse>> {
    let response = state.queue.validate_order(id).await?;
    broadcast_for(&state, id).await;
    Ok(Json(response))
}

/// POST /api/orders/:id/ready - kitchen finished preparing
pub async fn ready(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.queue.mark_ready(id).await?;
    state.notify_queue_changed().await;
    state.notify_client_orders(order.client_uid.as_deref()).await;
    Ok(Json(order))
}

/// POST /api/orders/:id/served - handed over, leaves the queue
pub async fn served(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.queue.mark_served(id).await?;
    state.notify_queue_changed().await;
    state.notify_client_orders(order.client_uid.as_deref()).await;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel
///
/// Open to the customer side, so no auth guard here.
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.queue.cancel_order(id).await?;
    tracing::info!(order_id = id, "Order cancelled");
    state.notify_queue_changed().await;
    state.notify_client_orders(order.client_uid.as_deref()).await;
    Ok(Json(order))
}

/// Broadcasts for a mutation that only knows the order id.
async fn broadcast_for(state: &ServerState, id: i64) {
    let client_uid = match state.queue.get_order(id).await {
        Ok(Some(order)) => order.client_uid,
        _ => None,
    };
    state.notify_queue_changed().await;
    state.notify_client_orders(client_uid.as_deref()).await;
}
