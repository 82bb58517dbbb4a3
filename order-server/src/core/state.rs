use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{self, DbService};
use crate::notify::{Notification, NotificationHub};
use crate::queue::QueueService;

/// Shared server state, cheaply cloneable into every handler.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable configuration |
/// | db | SQLite connection pool |
/// | queue | queue service (state machine + estimator) |
/// | hub | notification fan-out |
/// | jwt | token issuance and validation |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: SqlitePool,
    pub queue: QueueService,
    pub hub: NotificationHub,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    /// Initialize all services.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be set up; the
    /// server is useless without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("orders.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        if let Err(e) = db::seed::seed_menu_if_empty(&pool).await {
            tracing::warn!("Menu seeding failed: {}", e);
        }

        let queue = QueueService::new(
            pool.clone(),
            config.estimator.clone(),
            config.queue_limit,
            config.client_orders_limit,
        );
        let hub = NotificationHub::new(256);
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config: config.clone(),
            db: pool,
            queue,
            hub,
            jwt,
        }
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt.clone()
    }

    /// Broadcast a fresh queue snapshot to every subscriber.
    ///
    /// Best effort: the mutation has already committed, so a failure here
    /// is logged and dropped, never surfaced to the caller.
    pub async fn notify_queue_changed(&self) {
        match self.queue.queue_snapshot().await {
            Ok(snapshot) => {
                self.hub.publish(Notification::QueueUpdate(snapshot));
            }
            Err(e) => tracing::warn!("Skipping queue_update broadcast: {}", e),
        }
    }

    /// Push the owning client's order list to its channel, if the order
    /// belongs to an identified client.
    pub async fn notify_client_orders(&self, client_uid: Option<&str>) {
        let Some(uid) = client_uid else { return };
        match self.queue.orders_for_client(uid).await {
            Ok(payload) => {
                self.hub.publish(Notification::ClientOrdersUpdate {
                    client_uid: uid.to_string(),
                    payload,
                });
            }
            Err(e) => tracing::warn!(client_uid = %uid, "Skipping client_orders_update: {}", e),
        }
    }
}
