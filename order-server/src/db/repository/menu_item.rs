//! Menu item repository

use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const MENU_COLUMNS: &str = "id, name, description, price_cents, avg_prep_seconds, image_url, active";
const DEFAULT_PREP_SECONDS: i64 = 300;

#[derive(Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Active items only, newest first. This is what ordering clients see.
    pub async fn find_active(&self) -> RepoResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE active = 1 ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name must not be empty".into()));
        }
        if data.price_cents < 0 {
            return Err(RepoError::Validation("price_cents must not be negative".into()));
        }

        let result = sqlx::query(
            "INSERT INTO menu_items (name, description, price_cents, avg_prep_seconds, image_url, active)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(data.avg_prep_seconds.unwrap_or(DEFAULT_PREP_SECONDS))
        .bind(&data.image_url)
        .bind(data.active.unwrap_or(true))
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("menu item vanished after creation".into()))
    }

    /// Full replace, matching the admin edit form.
    pub async fn update(&self, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name must not be empty".into()));
        }
        if data.price_cents < 0 {
            return Err(RepoError::Validation("price_cents must not be negative".into()));
        }

        let result = sqlx::query(
            "UPDATE menu_items
             SET name = ?, description = ?, price_cents = ?, avg_prep_seconds = ?,
                 image_url = ?, active = ?
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(data.avg_prep_seconds.unwrap_or(DEFAULT_PREP_SECONDS))
        .bind(&data.image_url)
        .bind(data.active.unwrap_or(true))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Menu item {id} not found")));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("menu item vanished after update".into()))
    }
}
