//! Public API handlers.

use std::time::Instant;

use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::chain::{Cluster, SolanaRpc};
use crate::http::request::parse_mint_form;
use crate::http::response::{ApiError, CostResponse, HealthResponse, MintResponse, UploadResponse};
use crate::http::server::AppState;
use crate::mint::cost::{self, FALLBACK_ESTIMATE_SOL};
use crate::mint::engine::MintEngine;
use crate::mint::types::MintError;
use crate::observability::metrics;

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /api/mint-token`
///
/// Runs the full server-side sequence, or the upload-only variant when the
/// service is configured that way. The request contract is the same in
/// both modes.
pub async fn mint_token(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    tracing::info!("Received mint token request");

    let (request, image) = parse_mint_form(multipart, &state.config.mint, state.default_network()).await?;
    tracing::info!(
        name = %request.name,
        symbol = %request.symbol,
        network = %request.network,
        attributes = request.attributes.len(),
        image_bytes = image.bytes.len(),
        "Token request accepted"
    );

    let network = request.network;
    let rpc = SolanaRpc::connect(network, &state.config.cluster);
    let engine = MintEngine::new(
        rpc,
        state.wallet.clone(),
        state.storage.clone(),
        state.config.mint.clone(),
    );

    let result: Result<Response, MintError> = if state.config.mint.server_side {
        engine.execute(&request, &image).await.map(|outcome| {
            Json(MintResponse {
                success: true,
                name: request.name.clone(),
                symbol: request.symbol.clone(),
                mint_address: outcome.mint_address.to_string(),
                metadata_uri: outcome.metadata_uri,
                network: network.name().to_string(),
                explorer_url: outcome.explorer_url,
            })
            .into_response()
        })
    } else {
        engine
            .upload_assets(&request, &image)
            .await
            .map(|(image_uri, metadata_uri)| {
                Json(UploadResponse {
                    success: true,
                    image_uri,
                    metadata_uri,
                })
                .into_response()
            })
    };

    match result {
        Ok(response) => {
            metrics::record_mint(network.name(), true, start);
            Ok(response)
        }
        Err(err) => {
            if let Some(step) = err.step() {
                metrics::record_mint_step_failure(step.name());
            }
            metrics::record_mint(network.name(), false, start);
            tracing::error!(error = %err, "Mint request failed");
            Err(err.into())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateParams {
    network: Option<String>,
}

/// `GET /api/estimate-cost`
///
/// Live rent and fee estimate for one mint sequence, with a fixed fallback
/// when the cluster is unreachable.
pub async fn estimate_cost(
    State(state): State<AppState>,
    Query(params): Query<EstimateParams>,
) -> Result<Json<CostResponse>, ApiError> {
    let network = match params.network.as_deref() {
        Some(raw) if !raw.is_empty() => raw
            .parse::<Cluster>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        _ => state.default_network(),
    };

    let rpc = SolanaRpc::connect(network, &state.config.cluster);
    match cost::estimate_mint_cost(&rpc).await {
        Ok(estimate) => Ok(Json(CostResponse {
            network: network.name().to_string(),
            estimated_sol: estimate.sol,
            lamports: Some(estimate.lamports),
        })),
        Err(err) => {
            tracing::warn!(error = %err, network = %network, "Cost estimate fell back to the fixed value");
            Ok(Json(CostResponse {
                network: network.name().to_string(),
                estimated_sol: FALLBACK_ESTIMATE_SOL,
                lamports: None,
            }))
        }
    }
}
