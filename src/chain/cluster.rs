//! Cluster names and well-known endpoints.
//!
//! Requests carry the network as a string (`mainnet-beta`, `devnet`,
//! `testnet`); everything downstream works with the parsed [`Cluster`].

use std::fmt;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::chain::types::ChainError;

/// A Solana cluster the service can mint on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cluster {
    MainnetBeta,
    #[default]
    Devnet,
    Testnet,
}

impl Cluster {
    /// Network name as it appears in requests, config, and explorer links.
    pub fn name(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
        }
    }

    /// Public JSON-RPC endpoint for the cluster.
    pub fn api_url(&self) -> String {
        format!("https://api.{}.solana.com", self.name())
    }

    /// Explorer link for an address. Mainnet is the explorer default, so
    /// only the other clusters get the `cluster` query parameter.
    pub fn explorer_url(&self, address: &Pubkey) -> String {
        match self {
            Cluster::MainnetBeta => {
                format!("https://explorer.solana.com/address/{}", address)
            }
            _ => format!(
                "https://explorer.solana.com/address/{}?cluster={}",
                address,
                self.name()
            ),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cluster {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet-beta" => Ok(Cluster::MainnetBeta),
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            other => Err(ChainError::UnknownCluster(other.to_string())),
        }
    }
}
