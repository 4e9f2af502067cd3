//! Application startup and lifecycle management.
//!
//! Builds the provider clients once from configuration, wires the HTTP router
//! and runs it until a shutdown signal arrives.

use crate::config::BouquetConfig;
use crate::handlers::{
    generate::generate,
    health::{health_check, metrics_endpoint, readiness_check},
};
use crate::middleware::metrics_middleware;
use crate::services::providers::cloudinary::CloudinaryStore;
use crate::services::providers::openai::{OpenAiImageProvider, OpenAiSettings};
use crate::services::providers::{AssetStore, ImageProvider};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, get_service, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BouquetConfig>,
    /// `None` when no OpenAI key is configured.
    pub image_provider: Option<Arc<dyn ImageProvider>>,
    /// `None` when Cloudinary is not configured; uploads are then skipped.
    pub asset_store: Option<Arc<dyn AssetStore>>,
}

impl AppState {
    /// Build the real provider clients for whatever credentials are configured.
    pub fn from_config(config: BouquetConfig) -> Self {
        let image_provider = match OpenAiSettings::from_config(&config.openai) {
            Some(settings) => {
                tracing::info!(
                    model = %settings.model,
                    size = %settings.image_size,
                    "Initialized OpenAI image provider"
                );
                Some(Arc::new(OpenAiImageProvider::new(settings)) as Arc<dyn ImageProvider>)
            }
            None => {
                tracing::warn!(
                    "OPENAI_API_KEY not configured - generation requests will be rejected"
                );
                None
            }
        };

        let asset_store = match config.cloudinary.clone() {
            Some(cloudinary) => {
                tracing::info!(
                    cloud_name = %cloudinary.cloud_name,
                    folder = %cloudinary.folder,
                    "Initialized Cloudinary asset store"
                );
                Some(Arc::new(CloudinaryStore::new(cloudinary)) as Arc<dyn AssetStore>)
            }
            None => {
                tracing::info!("Cloudinary not configured - image upload disabled");
                None
            }
        };

        Self {
            config: Arc::new(config),
            image_provider,
            asset_store,
        }
    }
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.server.static_dir);
    let index_file = static_dir.join("index.html");
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/", get_service(ServeFile::new(index_file)))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/generate", post(generate))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener and build the router (port 0 = random port for testing).
    pub async fn build(config: BouquetConfig) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::from_config(config));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
