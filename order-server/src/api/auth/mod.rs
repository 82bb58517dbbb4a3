//! Admin auth API module

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/info", get(handler::info))
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
}
