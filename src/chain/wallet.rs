//! Service wallet loading and key handling.
//!
//! # Security Considerations
//!
//! - Secret keys come from a configured file, an environment variable, or
//!   the Solana CLI default path, in that order
//! - Keys are never logged or serialized; log lines carry the public key only
//! - The in-memory keypair is shared, not copied, across request handlers

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};
use solana_sdk::signer::Signer;

use crate::chain::types::{ChainError, ChainResult};
use crate::config::schema::WalletConfig;

/// Default environment variable holding the service secret key.
pub const KEYPAIR_ENV_VAR: &str = "MINTLY_KEYPAIR";

/// The wallet that pays for uploads, rent, and transaction fees, and holds
/// mint and update authority over every token the service creates.
#[derive(Clone)]
pub struct ServiceWallet {
    keypair: Arc<Keypair>,
}

impl ServiceWallet {
    /// Wrap an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// Load the wallet from the configured sources: an explicit keypair
    /// file, then the environment variable, then `~/.config/solana/id.json`.
    pub fn load(config: &WalletConfig) -> ChainResult<Self> {
        if let Some(raw_path) = &config.keypair_path {
            let path = Path::new(raw_path);
            if !path.exists() {
                return Err(ChainError::Wallet(format!(
                    "keypair file not found: {}",
                    path.display()
                )));
            }
            let wallet = Self::from_file(path)?;
            tracing::info!(pubkey = %wallet.pubkey(), path = %path.display(), "Service wallet loaded");
            return Ok(wallet);
        }

        if let Ok(raw) = std::env::var(&config.env_var) {
            let wallet = Self::from_secret_str(raw.trim())?;
            tracing::info!(pubkey = %wallet.pubkey(), source = %config.env_var, "Service wallet loaded");
            return Ok(wallet);
        }

        if let Some(path) = default_cli_keypair_path() {
            if path.exists() {
                let wallet = Self::from_file(&path)?;
                tracing::info!(pubkey = %wallet.pubkey(), path = %path.display(), "Service wallet loaded");
                return Ok(wallet);
            }
        }

        Err(ChainError::Wallet(format!(
            "no keypair found: set [wallet] keypair_path, the {} environment variable, or provide ~/.config/solana/id.json",
            config.env_var
        )))
    }

    /// Load from a JSON byte-array keypair file (the `id.json` layout).
    pub fn from_file(path: &Path) -> ChainResult<Self> {
        let keypair = read_keypair_file(path).map_err(|e| {
            ChainError::Wallet(format!(
                "could not read keypair file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_keypair(keypair))
    }

    /// Parse a secret key given as either a JSON byte array or a base58
    /// string. Both layouts show up in deployments: exported CLI keypairs
    /// are JSON arrays, wallet apps export base58.
    pub fn from_secret_str(raw: &str) -> ChainResult<Self> {
        let bytes: Vec<u8> = if raw.starts_with('[') {
            serde_json::from_str(raw)
                .map_err(|e| ChainError::Wallet(format!("invalid JSON keypair: {}", e)))?
        } else {
            bs58::decode(raw)
                .into_vec()
                .map_err(|e| ChainError::Wallet(format!("invalid base58 secret key: {}", e)))?
        };

        let keypair = Keypair::from_bytes(&bytes)
            .map_err(|e| ChainError::Wallet(format!("invalid secret key bytes: {}", e)))?;
        Ok(Self::from_keypair(keypair))
    }

    /// The wallet's public key.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// The underlying keypair, for transaction signing.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

// Manual Debug that exposes the public key only.
impl fmt::Debug for ServiceWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceWallet")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

fn default_cli_keypair_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(PathBuf::from(home).join(".config").join("solana").join("id.json"))
}
