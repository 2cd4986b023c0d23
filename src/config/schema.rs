//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML, and every
//! field has a default so a minimal (or empty) config file still boots a
//! working devnet service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the mint service.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MintlyConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Cluster selection and RPC endpoints.
    pub cluster: ClusterConfig,

    /// Service wallet key material location.
    pub wallet: WalletConfig,

    /// Storage gateway settings.
    pub storage: StorageConfig,

    /// Mint sequence settings.
    pub mint: MintConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration; plain HTTP when unset.
    pub tls: Option<TlsConfig>,

    /// Request timeout in seconds. Covers the whole mint sequence, so it is
    /// much longer than a typical API timeout.
    pub request_timeout_secs: u64,

    /// Whether to answer cross-origin requests permissively.
    pub cors_enabled: bool,

    /// Optional directory of static files served at the root path.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
            request_timeout_secs: 120,
            cors_enabled: true,
            static_dir: None,
        }
    }
}

/// TLS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to the certificate chain (PEM).
    pub cert_path: String,

    /// Path to the private key (PEM).
    pub key_path: String,
}

/// Cluster and RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Network used when a request does not name one.
    pub default_network: String,

    /// Per-network RPC endpoint lists, keyed by network name. The first
    /// entry is the primary; the rest are tried in order on failure.
    /// Networks without an entry use the public endpoint.
    pub rpc_urls: HashMap<String, Vec<String>>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            default_network: "devnet".to_string(),
            rpc_urls: HashMap::new(),
            rpc_timeout_secs: 30,
        }
    }
}

/// Service wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Path to a JSON byte-array keypair file. When unset, the environment
    /// variable and then the Solana CLI default path are tried.
    pub keypair_path: Option<String>,

    /// Environment variable holding the secret key, as a JSON byte array
    /// or a base58 string.
    pub env_var: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: None,
            env_var: crate::chain::wallet::KEYPAIR_ENV_VAR.to_string(),
        }
    }
}

/// Storage gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Upload API base URL.
    pub api_url: String,

    /// Public gateway base URL; content URIs are `<gateway_url>/<id>`.
    pub gateway_url: String,

    /// Bearer token for the upload API. Empty sends no Authorization header.
    pub api_token: String,

    /// Upload timeout in seconds.
    pub upload_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_url: "https://node1.irys.xyz".to_string(),
            gateway_url: "https://gateway.irys.xyz".to_string(),
            api_token: String::new(),
            upload_timeout_secs: 60,
        }
    }
}

/// Mint sequence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MintConfig {
    /// When true the endpoint runs the whole on-chain sequence with the
    /// service wallet. When false it uploads the image and metadata only
    /// and the caller's wallet finishes the on-chain steps.
    pub server_side: bool,

    /// Minimum service wallet balance required before minting, in SOL.
    pub min_balance_sol: f64,

    /// Optional service fee recipient (base58 address). Unset, or set to
    /// the service wallet itself, skips the fee-payment step.
    pub fee_recipient: Option<String>,

    /// Service fee in SOL, transferred to `fee_recipient` before minting.
    pub fee_sol: f64,

    /// Token decimals used when the request leaves them out.
    pub default_decimals: u8,

    /// Initial supply used when the request leaves it out, in whole tokens.
    pub default_mint_amount: u64,

    /// Upper bound for the uploaded image, in bytes.
    pub max_image_bytes: usize,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            server_side: true,
            min_balance_sol: 0.1,
            fee_recipient: None,
            fee_sol: 0.1,
            default_decimals: 9,
            default_mint_amount: 1000,
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Metrics exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_boots_a_devnet_service() {
        let config = MintlyConfig::default();

        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
        assert_eq!(config.cluster.default_network, "devnet");
        assert!(config.cluster.rpc_urls.is_empty());
        assert_eq!(config.wallet.env_var, "MINTLY_KEYPAIR");
        assert!(config.mint.server_side);
        assert_eq!(config.mint.default_decimals, 9);
        assert_eq!(config.mint.default_mint_amount, 1000);
        assert_eq!(config.mint.max_image_bytes, 5 * 1024 * 1024);
        assert!(config.mint.fee_recipient.is_none());
    }

    #[test]
    fn empty_toml_deserializes_to_defaults() {
        let config: MintlyConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
        assert_eq!(config.storage.gateway_url, "https://gateway.irys.xyz");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: MintlyConfig = toml::from_str(
            r#"
            [server]
            bind_address = "127.0.0.1:8080"

            [cluster]
            default_network = "testnet"

            [cluster.rpc_urls]
            testnet = ["https://rpc.example.com"]

            [mint]
            fee_recipient = "11111111111111111111111111111111"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.server.request_timeout_secs, 120);
        assert_eq!(config.cluster.default_network, "testnet");
        assert_eq!(
            config.cluster.rpc_urls["testnet"],
            vec!["https://rpc.example.com".to_string()]
        );
        assert_eq!(
            config.mint.fee_recipient.as_deref(),
            Some("11111111111111111111111111111111")
        );
        assert_eq!(config.mint.default_decimals, 9);
    }
}
