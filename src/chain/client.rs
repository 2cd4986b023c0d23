//! Solana RPC client with endpoint failover.
//!
//! # Responsibilities
//!
//! - Connect to a cluster's JSON-RPC endpoint(s)
//! - Query balances, blockhashes, and rent-exemption minimums
//! - Submit transactions and wait for confirmation
//! - Try each configured endpoint in order before giving up
//!
//! Endpoints come from the `[cluster]` config section; clusters with no
//! configured list use the public endpoint.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::chain::cluster::Cluster;
use crate::chain::types::{ChainError, ChainResult};
use crate::config::schema::ClusterConfig;

/// RPC access to one cluster, with failover across its endpoints.
#[derive(Clone)]
pub struct SolanaRpc {
    providers: Vec<Arc<RpcClient>>,
    urls: Vec<String>,
    cluster: Cluster,
}

impl SolanaRpc {
    /// Connect to a cluster using its configured endpoint list, or the
    /// public endpoint when none is configured.
    pub fn connect(cluster: Cluster, config: &ClusterConfig) -> Self {
        let urls: Vec<String> = match config.rpc_urls.get(cluster.name()) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![cluster.api_url()],
        };

        let timeout = Duration::from_secs(config.rpc_timeout_secs);
        let providers = urls
            .iter()
            .map(|url| {
                Arc::new(RpcClient::new_with_timeout_and_commitment(
                    url.clone(),
                    timeout,
                    CommitmentConfig::confirmed(),
                ))
            })
            .collect();

        Self {
            providers,
            urls,
            cluster,
        }
    }

    /// The cluster this client talks to.
    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    /// The endpoint URLs, primary first.
    pub fn endpoints(&self) -> &[String] {
        &self.urls
    }

    /// Balance of an address in lamports.
    pub async fn balance(&self, address: &Pubkey) -> ChainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            match provider.get_balance(address).await {
                Ok(lamports) => return Ok(lamports),
                Err(e) => {
                    tracing::warn!(endpoint = %self.urls[i], error = %e, "Balance query failed, trying next endpoint");
                }
            }
        }
        Err(ChainError::Rpc(format!(
            "all {} endpoints failed to get the balance",
            self.cluster
        )))
    }

    /// A recent blockhash for transaction building.
    pub async fn latest_blockhash(&self) -> ChainResult<Hash> {
        for (i, provider) in self.providers.iter().enumerate() {
            match provider.get_latest_blockhash().await {
                Ok(hash) => return Ok(hash),
                Err(e) => {
                    tracing::warn!(endpoint = %self.urls[i], error = %e, "Blockhash query failed, trying next endpoint");
                }
            }
        }
        Err(ChainError::Rpc(format!(
            "all {} endpoints failed to get a blockhash",
            self.cluster
        )))
    }

    /// Minimum lamports an account of `data_len` bytes needs to be
    /// rent-exempt.
    pub async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ChainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            match provider.get_minimum_balance_for_rent_exemption(data_len).await {
                Ok(lamports) => return Ok(lamports),
                Err(e) => {
                    tracing::warn!(endpoint = %self.urls[i], error = %e, "Rent query failed, trying next endpoint");
                }
            }
        }
        Err(ChainError::Rpc(format!(
            "all {} endpoints failed to get the rent-exempt minimum",
            self.cluster
        )))
    }

    /// Submit a signed transaction and wait for confirmed commitment.
    ///
    /// Resending to a failover endpoint is safe: the transaction is keyed by
    /// its signature, so a duplicate submission cannot execute twice.
    pub async fn send_and_confirm(&self, transaction: &Transaction) -> ChainResult<Signature> {
        for (i, provider) in self.providers.iter().enumerate() {
            match provider.send_and_confirm_transaction(transaction).await {
                Ok(signature) => return Ok(signature),
                Err(e) => {
                    tracing::warn!(endpoint = %self.urls[i], error = %e, "Transaction submit failed, trying next endpoint");
                }
            }
        }
        Err(ChainError::Transaction(format!(
            "all {} endpoints failed to confirm the transaction",
            self.cluster
        )))
    }
}

// Manual Debug: RpcClient does not implement it.
impl fmt::Debug for SolanaRpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolanaRpc")
            .field("cluster", &self.cluster)
            .field("urls", &self.urls)
            .finish()
    }
}
