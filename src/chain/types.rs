//! Chain-specific types and error definitions.

use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed on every configured endpoint.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Network name from a request or config that no cluster matches.
    #[error("unknown network '{0}' (expected mainnet-beta, devnet, or testnet)")]
    UnknownCluster(String),

    /// Keypair could not be located or parsed.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// A transaction could not be built or did not confirm.
    #[error("transaction failed: {0}")]
    Transaction(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
