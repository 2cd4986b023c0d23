//! Response bodies and error mapping for the public API.
//!
//! Field names are camelCase because the browser form that posts to this
//! API reads them that way.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::mint::types::MintError;

/// Body for `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body for a completed server-side mint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintResponse {
    pub success: bool,
    pub name: String,
    pub symbol: String,
    pub mint_address: String,
    pub metadata_uri: String,
    pub network: String,
    pub explorer_url: String,
}

/// Body for an upload-only mint request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_uri: String,
    pub metadata_uri: String,
}

/// Body for `GET /api/estimate-cost`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResponse {
    pub network: String,
    pub estimated_sol: f64,
    /// Exact lamports when the estimate came from the cluster; absent when
    /// the fixed fallback was used.
    pub lamports: Option<u64>,
}

/// API failure mapped onto the JSON error contract.
#[derive(Debug)]
pub enum ApiError {
    /// Client-side problem: `400 {"error": ...}`.
    BadRequest(String),

    /// The mint sequence failed:
    /// `500 {"error": "Failed to mint token", "message": ...}`.
    MintFailed(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl From<MintError> for ApiError {
    fn from(err: MintError) -> Self {
        match err {
            // Precondition failures reject the request before any side
            // effect, so they read as client errors.
            MintError::InsufficientBalance { .. } | MintError::SupplyOverflow { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            MintError::Chain { .. } | MintError::Storage { .. } => {
                ApiError::MintFailed(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::MintFailed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to mint token", "message": message }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::ChainError;
    use crate::mint::types::MintStep;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_uses_the_error_field() {
        let response = ApiError::bad_request("No image file uploaded").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "No image file uploaded");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn mint_failure_carries_the_step_message() {
        let err = MintError::Chain {
            step: MintStep::CreateMint,
            source: ChainError::Rpc("all devnet endpoints failed".to_string()),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to mint token");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("mint account creation failed"));
    }

    #[test]
    fn insufficient_balance_maps_to_bad_request() {
        let err = MintError::InsufficientBalance {
            balance_sol: 0.01,
            required_sol: 0.1,
        };
        assert!(matches!(ApiError::from(err), ApiError::BadRequest(_)));

        let err = MintError::SupplyOverflow {
            amount: u64::MAX,
            decimals: 9,
        };
        assert!(matches!(ApiError::from(err), ApiError::BadRequest(_)));
    }

    #[test]
    fn mint_response_serializes_camel_case() {
        let response = MintResponse {
            success: true,
            name: "Test Token".to_string(),
            symbol: "TST".to_string(),
            mint_address: "7xKX...".to_string(),
            metadata_uri: "https://gateway.test/meta".to_string(),
            network: "devnet".to_string(),
            explorer_url: "https://explorer.solana.com/address/7xKX...?cluster=devnet".to_string(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["mintAddress"], "7xKX...");
        assert_eq!(value["metadataUri"], "https://gateway.test/meta");
        assert_eq!(value["explorerUrl"], response.explorer_url);
        assert!(value.get("mint_address").is_none());
    }
}
