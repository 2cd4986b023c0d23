//! Upload gateway client.
//!
//! # Responsibilities
//!
//! - Post image bytes and JSON metadata documents to the upload gateway
//! - Attach the bearer token when one is configured
//! - Turn gateway receipts into public content URIs
//!
//! The gateway fronts the permanent-storage network: the service posts
//! files to `{api_url}/upload` and JSON documents to `{api_url}/upload/json`,
//! gets back a content id, and publishes `{gateway_url}/{id}` as the URI
//! wallets and explorers will fetch.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::config::schema::StorageConfig;
use crate::storage::types::{StorageError, StorageResult, UploadReceipt};

/// Client for the storage upload gateway.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    api_token: Option<String>,
    timeout_secs: u64,
}

impl StorageClient {
    /// Build a client from configuration.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs))
            .build()
            .map_err(|e| StorageError::Request(format!("could not build HTTP client: {}", e)))?;

        let api_token = if config.api_token.is_empty() {
            None
        } else {
            Some(config.api_token.clone())
        };

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_token,
            timeout_secs: config.upload_timeout_secs,
        })
    }

    /// Upload raw file bytes; returns the public URI.
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                StorageError::Request(format!("invalid content type '{}': {}", content_type, e))
            })?;
        let form = Form::new().part("file", part);

        let mut request = self
            .http
            .post(format!("{}/upload", self.api_url))
            .multipart(form);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let receipt = self.execute(request).await?;
        Ok(self.uri_for(&receipt.id))
    }

    /// Upload a JSON document; returns the public URI.
    pub async fn upload_json(&self, document: &serde_json::Value) -> StorageResult<String> {
        let mut request = self
            .http
            .post(format!("{}/upload/json", self.api_url))
            .json(document);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let receipt = self.execute(request).await?;
        Ok(self.uri_for(&receipt.id))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> StorageResult<UploadReceipt> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                StorageError::Timeout(self.timeout_secs)
            } else {
                StorageError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadReceipt>()
            .await
            .map_err(|e| StorageError::BadResponse(e.to_string()))
    }

    fn uri_for(&self, id: &str) -> String {
        format!("{}/{}", self.gateway_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config(api_url: &str, gateway_url: &str) -> StorageConfig {
        StorageConfig {
            api_url: api_url.to_string(),
            gateway_url: gateway_url.to_string(),
            api_token: String::new(),
            upload_timeout_secs: 5,
        }
    }

    #[test]
    fn trailing_slashes_do_not_double_up_in_uris() {
        let client =
            StorageClient::new(&storage_config("https://node.test/", "https://gateway.test/"))
                .unwrap();
        assert_eq!(client.uri_for("abc123"), "https://gateway.test/abc123");
    }

    #[test]
    fn empty_token_sends_no_auth() {
        let client =
            StorageClient::new(&storage_config("https://node.test", "https://gateway.test"))
                .unwrap();
        assert!(client.api_token.is_none());

        let mut config = storage_config("https://node.test", "https://gateway.test");
        config.api_token = "secret-token".to_string();
        let client = StorageClient::new(&config).unwrap();
        assert_eq!(client.api_token.as_deref(), Some("secret-token"));
    }

    #[tokio::test]
    async fn invalid_content_type_fails_before_sending() {
        let client =
            StorageClient::new(&storage_config("https://node.test", "https://gateway.test"))
                .unwrap();

        let err = client
            .upload_file(vec![1, 2, 3], "file.bin", "not/a/valid/mime")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Request(_)));
    }
}
