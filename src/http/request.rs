//! Multipart form extraction for the mint endpoint.
//!
//! Field rules:
//!
//! - `image` is required, must carry an `image/*` content type, and is
//!   capped at the configured byte limit
//! - `name` and `symbol` are required and length-limited to what the
//!   on-chain metadata account accepts
//! - numeric fields fall back to configured defaults when absent or empty,
//!   and reject with 400 when malformed
//! - `attributes` is a JSON array of trait rows
//! - unknown fields are ignored, like any browser form post

use std::str::FromStr;

use axum::extract::multipart::Field;
use axum::extract::Multipart;

use crate::chain::Cluster;
use crate::config::schema::MintConfig;
use crate::http::response::ApiError;
use crate::mint::metadata;
use crate::mint::types::{MintRequest, UploadedImage};

/// Longest accepted token name (the on-chain metadata field size).
const MAX_NAME_LEN: usize = 32;

/// Longest accepted token symbol.
const MAX_SYMBOL_LEN: usize = 10;

/// Parse and validate the multipart body of `POST /api/mint-token`.
pub async fn parse_mint_form(
    mut multipart: Multipart,
    config: &MintConfig,
    default_network: Cluster,
) -> Result<(MintRequest, UploadedImage), ApiError> {
    let mut name = None;
    let mut symbol = None;
    let mut description = String::new();
    let mut decimals = None;
    let mut mint_amount = None;
    let mut network = None;
    let mut attributes = Vec::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "image" => image = Some(read_image(field, config).await?),
            "name" => name = Some(text_field(field, "name").await?),
            "symbol" => symbol = Some(text_field(field, "symbol").await?),
            "description" => description = text_field(field, "description").await?,
            "decimals" => {
                decimals = parse_numeric(&text_field(field, "decimals").await?, "decimals")?;
            }
            "mintAmount" => {
                mint_amount =
                    parse_numeric(&text_field(field, "mintAmount").await?, "mintAmount")?;
            }
            "network" => {
                let value = text_field(field, "network").await?;
                if !value.is_empty() {
                    network = Some(
                        Cluster::from_str(&value).map_err(|e| ApiError::bad_request(e.to_string()))?,
                    );
                }
            }
            "attributes" => {
                let raw = text_field(field, "attributes").await?;
                if !raw.trim().is_empty() {
                    attributes = metadata::parse_attributes(&raw).map_err(|e| {
                        ApiError::bad_request(format!(
                            "attributes must be a JSON array of trait rows: {}",
                            e
                        ))
                    })?;
                }
            }
            _ => {}
        }
    }

    let Some(image) = image else {
        return Err(ApiError::bad_request("No image file uploaded"));
    };

    let name = name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(ApiError::bad_request("Token name is required"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Token name is longer than {} characters",
            MAX_NAME_LEN
        )));
    }

    let symbol = symbol.unwrap_or_default().trim().to_string();
    if symbol.is_empty() {
        return Err(ApiError::bad_request("Token symbol is required"));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(ApiError::bad_request(format!(
            "Token symbol is longer than {} characters",
            MAX_SYMBOL_LEN
        )));
    }

    let decimals = decimals.unwrap_or(config.default_decimals);
    if decimals > 9 {
        return Err(ApiError::bad_request("Decimals must be between 0 and 9"));
    }

    let mint_amount = mint_amount.unwrap_or(config.default_mint_amount);
    if mint_amount == 0 {
        return Err(ApiError::bad_request("Initial supply must be at least 1"));
    }

    let request = MintRequest {
        name,
        symbol,
        description,
        decimals,
        mint_amount,
        network: network.unwrap_or(default_network),
        attributes,
    };
    Ok((request, image))
}

async fn read_image(field: Field<'_>, config: &MintConfig) -> Result<UploadedImage, ApiError> {
    let content_type = field.content_type().unwrap_or_default().to_string();
    if !content_type.starts_with("image/") {
        return Err(ApiError::bad_request("Only image files are allowed"));
    }

    let file_name = field.file_name().unwrap_or("token-image").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("could not read image: {}", e)))?;

    if bytes.len() > config.max_image_bytes {
        return Err(ApiError::bad_request(format!(
            "Image is too large: the limit is {} bytes",
            config.max_image_bytes
        )));
    }
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded image is empty"));
    }

    Ok(UploadedImage {
        bytes: bytes.to_vec(),
        file_name,
        content_type,
    })
}

async fn text_field(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("could not read field '{}': {}", name, e)))
}

fn parse_numeric<T: FromStr>(raw: &str, name: &str) -> Result<Option<T>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ApiError::bad_request(format!("Invalid value for '{}'", name)))
}
