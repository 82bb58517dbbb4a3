//! Repository module
//!
//! CRUD and sequence operations over the SQLite tables. The repositories
//! are the sole mutators of their rows; the queue layer reads and writes
//! orders exclusively through [`OrderRepository`].

pub mod menu_item;
pub mod order;
pub mod user;

pub use menu_item::MenuItemRepository;
pub use order::{NewOrder, NewOrderItem, OrderRepository, QueueRow};
pub use user::UserRepository;

use shared::models::OrderStatus;
use thiserror::Error;

/// Repository error types.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A status-transition guard rejected the operation. Carries the
    /// order's actual status so callers can resynchronize.
    #[error("order is {current}, cannot move to {attempted}")]
    InvalidTransition {
        current: OrderStatus,
        attempted: OrderStatus,
    },

    /// Unique-constraint race. The single-statement sequence updates make
    /// this unreachable in practice; it only fires if a caller bypasses
    /// them.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying storage failure. Safe to retry: creation is
    /// all-or-nothing and every transition is idempotent-guarded.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Conflict(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Current unix timestamp in seconds.
pub(crate) fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
