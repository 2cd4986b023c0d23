//! Solana chain access.
//!
//! Cluster naming, the failover RPC client, and the service wallet that
//! signs everything the service puts on chain.

pub mod client;
pub mod cluster;
pub mod types;
pub mod wallet;

pub use client::SolanaRpc;
pub use cluster::Cluster;
pub use types::{ChainError, ChainResult};
pub use wallet::ServiceWallet;
