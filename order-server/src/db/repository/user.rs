//! Admin user repository

use shared::models::User;
use sqlx::SqlitePool;

use super::{RepoResult, unix_now};

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn create(&self, email: &str, password_hash: &str, role: &str) -> RepoResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(unix_now())
        .execute(&self.pool)
        .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
