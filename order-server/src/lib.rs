//! Restaurant ordering and kitchen-queue server
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/      # Config, state, HTTP server bring-up
//! ├── api/       # HTTP routes and handlers
//! ├── auth/      # JWT issuance, password hashing, extractors
//! ├── db/        # SQLite pool, migrations, repositories
//! ├── queue/     # Queue service, status transitions, wait estimator
//! ├── notify/    # Best-effort notification fan-out
//! └── utils/     # Errors, logging
//! ```
//!
//! The interesting part lives in `queue/` and `db/repository/order.rs`:
//! per-client order numbering, serialized ticket assignment, the status
//! state machine and the wait estimator. Everything else is plumbing.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod queue;
pub mod utils;

// Re-export common types
pub use auth::{AdminUser, CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use notify::{Notification, NotificationHub};
pub use queue::{EstimatorConfig, QueueService};
pub use utils::{AppError, AppResult};

pub fn print_banner() {
    println!(
        r#"
   ____           __
  / __ \_________/ /__  _____
 / / / / ___/ __  / _ \/ ___/
/ /_/ / /  / /_/ /  __/ /
\____/_/   \__,_/\___/_/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
