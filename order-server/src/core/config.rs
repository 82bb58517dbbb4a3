use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::queue::EstimatorConfig;

/// Server configuration.
///
/// Every field can be overridden from the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, uploads, logs) |
/// | HTTP_PORT | 4000 | HTTP listen port |
/// | CORS_ORIGIN | * | allowed CORS origin |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | QUEUE_LIMIT | 50 | display cap on the visible queue |
/// | CLIENT_ORDERS_LIMIT | 20 | display cap on a client's order list |
/// | KITCHEN_CONCURRENCY | 2 | parallel kitchen stations |
/// | WAIT_FLOOR_SECONDS | 120 | minimum published wait estimate |
/// | WAIT_CEILING_SECONDS | 7200 | maximum published wait estimate |
/// | DEFAULT_PREP_SECONDS | 300 | fallback per-item preparation time |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database, uploads and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// CORS origin ("*" for any)
    pub cors_origin: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// JWT settings
    pub jwt: JwtConfig,
    /// Wait-estimator tuning
    pub estimator: EstimatorConfig,
    /// Display cap on the visible queue
    pub queue_limit: i64,
    /// Display cap on a single client's order list
    pub client_orders_limit: i64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            cors_origin: std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::default(),
            estimator: EstimatorConfig::from_env(),
            queue_limit: std::env::var("QUEUE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            client_orders_limit: std::env::var("CLIENT_ORDERS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
        }
    }

    /// Override the work dir and port, keeping everything else env-driven.
    /// Mostly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Directory layout under the work dir.
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Ensure the work directory structure exists.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
