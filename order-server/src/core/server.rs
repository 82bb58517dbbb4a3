//! HTTP server bring-up

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};

/// HTTP server.
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server around pre-initialized state.
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        let app = build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Order server listening on {}", addr);
        tracing::info!("CORS origin: {}", self.config.cors_origin);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}

/// Assemble the full application router. Shared with integration tests so
/// they exercise the exact same stack as production.
pub fn build_router(state: ServerState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    let uploads_dir = state.config.uploads_dir();

    Router::new()
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::menu::router())
        .merge(api::orders::router())
        .merge(api::upload::router())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
    ];
    match origin {
        "*" => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(methods)
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!("Invalid CORS_ORIGIN {:?}, falling back to any", origin);
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(methods)
                    .allow_headers(Any)
            }
        },
    }
}
