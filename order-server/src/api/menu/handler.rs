//! Menu API handlers
//!
//! Reads are public so the ordering page works without auth; writes are
//! staff-only.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::MenuItemRepository;
use crate::utils::AppResult;

/// GET /api/menu - active items for the ordering page
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_active().await?;
    Ok(Json(items))
}

/// POST /api/menu - create a menu item
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    tracing::info!(item_id = item.id, name = %item.name, "Menu item created");
    Ok(Json(item))
}

/// PUT /api/menu/:id - full replace of a menu item
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.update(id, payload).await?;
    tracing::info!(item_id = item.id, "Menu item updated");
    Ok(Json(item))
}
