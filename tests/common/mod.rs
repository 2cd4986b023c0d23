//! Shared utilities for integration testing.
//!
//! Boots the service against a mock storage gateway so the API contract can
//! be exercised without network access or funded wallets.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use solana_sdk::signature::{write_keypair_file, Keypair};
use solana_sdk::signer::Signer;
use tokio::net::TcpListener;

use mintly::{HttpServer, MintlyConfig};

/// What the mock gateway has seen so far.
#[derive(Clone, Default)]
pub struct GatewayState {
    pub uploads: Arc<AtomicUsize>,
    pub last_json: Arc<Mutex<Option<serde_json::Value>>>,
}

impl GatewayState {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn last_json(&self) -> Option<serde_json::Value> {
        self.last_json.lock().unwrap().clone()
    }
}

/// Start a mock storage gateway; returns its address and observed state.
pub async fn start_mock_gateway() -> (SocketAddr, GatewayState) {
    let state = GatewayState::default();

    let app = Router::new()
        .route("/upload", post(upload_file))
        .route("/upload/json", post(upload_json))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

async fn upload_file(
    State(state): State<GatewayState>,
    _body: axum::body::Bytes,
) -> Json<serde_json::Value> {
    let n = state.uploads.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({ "id": format!("file-{}", n) }))
}

async fn upload_json(
    State(state): State<GatewayState>,
    Json(document): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let n = state.uploads.fetch_add(1, Ordering::SeqCst);
    *state.last_json.lock().unwrap() = Some(document);
    Json(serde_json::json!({ "id": format!("json-{}", n) }))
}

/// Config pointing at the mock gateway: upload-only mode, a throwaway
/// wallet, metrics off.
pub fn test_config(gateway: SocketAddr) -> MintlyConfig {
    let keypair = Keypair::new();
    let keypair_path = std::env::temp_dir().join(format!("mintly-test-{}.json", keypair.pubkey()));
    write_keypair_file(&keypair, keypair_path.to_str().unwrap()).unwrap();

    let mut config = MintlyConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.wallet.keypair_path = Some(keypair_path.to_str().unwrap().to_string());
    config.storage.api_url = format!("http://{}", gateway);
    config.storage.gateway_url = "https://gateway.test".to_string();
    config.mint.server_side = false;
    config.observability.metrics_enabled = false;
    config
}

/// Boot the service on an ephemeral port; returns its base URL.
pub async fn start_app(config: MintlyConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    format!("http://{}", addr)
}

/// HTTP client that ignores any proxy environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
