//! First-boot menu seed
//!
//! Gives a fresh install something to order. Admin accounts are not seeded;
//! the first registration through `/api/auth/register` bootstraps one.

use sqlx::SqlitePool;

use crate::db::repository::RepoResult;

const DEMO_MENU: &[(&str, &str, i64, i64)] = &[
    ("Sushi Mix 10p", "Assorted sushi platter", 1200, 420),
    ("Ramen Shoyu", "Soy broth, pork, noodles", 1100, 540),
    ("Chicken Donburi", "Rice bowl, teriyaki chicken", 1000, 420),
    ("Miso Soup", "Classic miso soup", 300, 180),
];

/// Insert the demo menu when the table is empty.
pub async fn seed_menu_if_empty(pool: &SqlitePool) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    for (name, description, price_cents, avg_prep_seconds) in DEMO_MENU {
        sqlx::query(
            "INSERT INTO menu_items (name, description, price_cents, avg_prep_seconds, active)
             VALUES (?, ?, ?, ?, 1)",
        )
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(avg_prep_seconds)
        .execute(pool)
        .await?;
    }

    tracing::info!("Seeded demo menu ({} items)", DEMO_MENU.len());
    Ok(())
}
