//! Web layer module
//!
//! Serves the tuner protocol endpoints, the compiled guide and the status
//! page. Handlers are thin: documents come from [`crate::protocol`] and
//! [`crate::device`], guide access goes through [`GuideService`].

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::backend::ListingsBackend;
use crate::config::Config;
use crate::device::DeviceIdentity;
use crate::errors::{AppError, AppResult};
use crate::guide::GuideService;

pub mod handlers;
pub mod responses;

pub use responses::{ApiResponse, handle_error};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<DeviceIdentity>,
    pub backend: Arc<dyn ListingsBackend>,
    pub guide: Arc<GuideService>,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> AppResult<Self> {
        let addr: SocketAddr = format!("{}:{}", state.config.web.host, state.config.web.port)
            .parse()
            .map_err(|e| {
                AppError::configuration(format!(
                    "web.host '{}' with port {} is not a socket address: {e}",
                    state.config.web.host, state.config.web.port
                ))
            })?;
        let app = Self::create_router(state);
        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        let static_dir = state.config.web.static_dir.clone();

        let router = Router::new()
            // Tuner discovery and lineup
            .route("/discover.json", get(handlers::discovery::discover))
            .route("/lineup_status.json", get(handlers::discovery::lineup_status))
            .route("/lineup.json", get(handlers::discovery::lineup))
            .route(
                "/lineup.post",
                get(handlers::discovery::lineup_post).post(handlers::discovery::lineup_post),
            )
            // UPnP descriptors
            .route("/device.xml", get(handlers::discovery::device_descriptor))
            .route(
                "/ConnectionManager.xml",
                get(handlers::discovery::connection_manager),
            )
            .route(
                "/ContentDirectory.xml",
                get(handlers::discovery::content_directory),
            )
            // Guide
            .route("/epg.xml", get(handlers::guide::serve_epg))
            .route("/guide/refresh", post(handlers::guide::refresh_guide))
            // Status
            .route("/antennas_config.json", get(handlers::status::antennas_config));

        let router = match static_dir {
            Some(dir) => Self::with_static_assets(router, &dir),
            None => router,
        };

        router
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    fn with_static_assets(router: Router<AppState>, dir: &Path) -> Router<AppState> {
        info!("Serving static assets from {}", dir.display());
        router.fallback_service(ServeDir::new(dir))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `cancellation_token` fires, then drain in-flight requests
    pub async fn serve_with_cancellation(self, cancellation_token: CancellationToken) -> AppResult<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await.map_err(|e| {
            AppError::internal(format!("Failed to bind to {}: {e}", self.addr))
        })?;
        info!("Antennas listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                cancellation_token.cancelled().await;
                info!("Web server received cancellation signal, shutting down gracefully");
            })
            .await?;
        Ok(())
    }
}
