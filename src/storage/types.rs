//! Storage gateway types and errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors from the upload gateway.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The request could not be built or the connection failed.
    #[error("upload request failed: {0}")]
    Request(String),

    /// The gateway did not answer within the configured timeout.
    #[error("upload timed out after {0} seconds")]
    Timeout(u64),

    /// The gateway answered with a non-success status.
    #[error("gateway rejected the upload ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The gateway answered 2xx but the body was not an upload receipt.
    #[error("malformed gateway response: {0}")]
    BadResponse(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Receipt returned by the gateway for a stored object.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    /// Content identifier; the public URI is `<gateway_url>/<id>`.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_deserializes_from_gateway_body() {
        let receipt: UploadReceipt =
            serde_json::from_str(r#"{"id":"abc123","timestamp":1700000000}"#).unwrap();
        assert_eq!(receipt.id, "abc123");
    }

    #[test]
    fn rejected_error_carries_status_and_body() {
        let err = StorageError::Rejected {
            status: 402,
            body: "insufficient funded balance".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("402"));
        assert!(message.contains("insufficient funded balance"));
    }
}
