//! HTTP server setup and configuration.
//!
//! # Responsibilities
//!
//! - Create the Axum router with all handlers
//! - Wire up middleware: request IDs, tracing, timeout, body limits, CORS
//! - Serve plain TCP or TLS depending on configuration
//! - Shut down gracefully on SIGINT/SIGTERM

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::chain::{Cluster, ServiceWallet};
use crate::config::schema::MintlyConfig;
use crate::http::handlers;
use crate::observability::metrics;
use crate::storage::client::StorageClient;

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MintlyConfig>,
    pub wallet: ServiceWallet,
    pub storage: StorageClient,
}

impl AppState {
    /// Network used when a request does not name one. The configured value
    /// is validated at load time, so the fallback only covers states built
    /// without the loader.
    pub fn default_network(&self) -> Cluster {
        self.config.cluster.default_network.parse().unwrap_or_default()
    }
}

/// HTTP server for the mint service.
pub struct HttpServer {
    router: Router,
    config: Arc<MintlyConfig>,
}

impl HttpServer {
    /// Create the server: loads the service wallet, builds the storage
    /// client, and assembles the router.
    pub fn new(config: MintlyConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Arc::new(config);
        let wallet = ServiceWallet::load(&config.wallet)?;
        let storage = StorageClient::new(&config.storage)?;

        let state = AppState {
            config: config.clone(),
            wallet,
            storage,
        };
        let router = Self::build_router(&config, state);

        Ok(Self { router, config })
    }

    /// Build the router with all middleware layers.
    fn build_router(config: &MintlyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/mint-token", post(handlers::mint_token))
            .route("/api/health", get(handlers::health))
            .route("/api/estimate-cost", get(handlers::estimate_cost));

        if let Some(static_dir) = &config.server.static_dir {
            router = router.fallback_service(ServeDir::new(static_dir));
        }

        // The whole-body cap leaves headroom over the image cap for the
        // text fields and multipart framing; the per-image limit itself is
        // enforced in the handler with a readable error.
        let body_limit = config.mint.max_image_bytes + 1024 * 1024;

        // Applied as successive `Router::layer` calls (later calls wrap
        // earlier ones), so the stack runs outermost-to-innermost as:
        // request id -> trace -> propagate id -> timeout -> body limits.
        let mut router = router
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(RequestBodyLimitLayer::new(body_limit))
                    .layer(DefaultBodyLimit::max(body_limit)),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
            .layer(middleware::from_fn(track_metrics));

        if config.server.cors_enabled {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router
    }

    /// Run the server on the given listener until a shutdown signal.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        if let Some(tls) = &self.config.server.tls {
            tracing::info!(address = %addr, "HTTPS server starting");
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;

            let handle = axum_server::Handle::new();
            tokio::spawn(graceful_tls_shutdown(handle.clone()));

            axum_server::from_tcp_rustls(listener.into_std()?, tls_config)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        } else {
            tracing::info!(address = %addr, "HTTP server starting");
            axum::serve(listener, self.router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record request count and latency for every route.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    metrics::record_request(method.as_str(), response.status().as_u16(), &path, start);
    response
}

/// Translate the shutdown signal into a graceful TLS listener stop.
async fn graceful_tls_shutdown(handle: axum_server::Handle) {
    shutdown_signal().await;
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
