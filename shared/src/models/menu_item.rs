//! Menu item model

use serde::{Deserialize, Serialize};

/// A dish on the menu. Inactive items are hidden from ordering clients but
/// remain valid targets for historical order lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Integer cents, the canonical currency unit.
    pub price_cents: i64,
    /// Expected preparation time for one unit; feeds the wait estimator.
    pub avg_prep_seconds: i64,
    pub image_url: Option<String>,
    pub active: bool,
}

/// Create payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub avg_prep_seconds: Option<i64>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

/// Update payload (full replace, matching the admin form).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub avg_prep_seconds: Option<i64>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}
