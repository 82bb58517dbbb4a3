//! Orders API module

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/queue", get(handler::queue))
        .route("/client/{client_uid}", get(handler::client_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", get(handler::items))
        .route("/{id}/validate", post(handler::validate))
        .route("/{id}/ready", post(handler::ready))
        .route("/{id}/served", post(handler::served))
        .route("/{id}/cancel", post(handler::cancel))
}
