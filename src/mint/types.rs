//! Mint flow types and errors.

use std::fmt;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use thiserror::Error;

use crate::chain::types::ChainError;
use crate::chain::Cluster;
use crate::mint::metadata::TokenAttribute;
use crate::storage::types::StorageError;

/// A validated token-creation request.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub decimals: u8,
    /// Initial supply in whole tokens; scaled by `10^decimals` on chain.
    pub mint_amount: u64,
    pub network: Cluster,
    pub attributes: Vec<TokenAttribute>,
}

/// The uploaded token image.
#[derive(Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

// Debug without the raw bytes; a 5MB hex dump helps nobody.
impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Steps of the mint sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStep {
    BalanceCheck,
    FeePayment,
    ImageUpload,
    MetadataUpload,
    CreateMint,
    CreateMetadata,
    MintSupply,
}

impl MintStep {
    /// Step name used in errors, logs, and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            MintStep::BalanceCheck => "balance check",
            MintStep::FeePayment => "fee payment",
            MintStep::ImageUpload => "image upload",
            MintStep::MetadataUpload => "metadata upload",
            MintStep::CreateMint => "mint account creation",
            MintStep::CreateMetadata => "metadata account creation",
            MintStep::MintSupply => "supply mint",
        }
    }
}

impl fmt::Display for MintStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from the mint sequence.
///
/// On-chain and storage failures carry the step they happened in. Earlier
/// steps are not rolled back: a failure after the fee payment leaves the
/// fee paid and the error tells the caller which step died.
#[derive(Debug, Error)]
pub enum MintError {
    /// Service wallet holds less than the configured minimum.
    #[error("insufficient service wallet balance: {balance_sol:.4} SOL (need at least {required_sol} SOL)")]
    InsufficientBalance { balance_sol: f64, required_sol: f64 },

    /// `mint_amount * 10^decimals` does not fit in 64 bits.
    #[error("initial supply of {amount} does not fit at {decimals} decimals")]
    SupplyOverflow { amount: u64, decimals: u8 },

    /// A chain operation failed at the given step.
    #[error("{step} failed: {source}")]
    Chain {
        step: MintStep,
        #[source]
        source: ChainError,
    },

    /// A storage upload failed at the given step.
    #[error("{step} failed: {source}")]
    Storage {
        step: MintStep,
        #[source]
        source: StorageError,
    },
}

impl MintError {
    /// The step the sequence died in, when it got that far.
    pub fn step(&self) -> Option<MintStep> {
        match self {
            MintError::Chain { step, .. } | MintError::Storage { step, .. } => Some(*step),
            MintError::InsufficientBalance { .. } | MintError::SupplyOverflow { .. } => None,
        }
    }
}

/// Result of a completed mint sequence.
#[derive(Debug, Clone)]
pub struct MintOutcome {
    pub mint_address: Pubkey,
    pub image_uri: String,
    pub metadata_uri: String,
    pub explorer_url: String,
    pub signatures: MintSignatures,
}

/// Transaction signatures produced by the sequence.
#[derive(Debug, Clone)]
pub struct MintSignatures {
    /// Fee transfer, when a fee recipient is configured.
    pub fee_payment: Option<Signature>,
    pub create_mint: Signature,
    pub create_metadata: Signature,
    pub mint_supply: Signature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_errors_name_the_step() {
        let err = MintError::Storage {
            step: MintStep::ImageUpload,
            source: StorageError::Timeout(60),
        };
        assert!(err.to_string().starts_with("image upload failed"));
        assert_eq!(err.step(), Some(MintStep::ImageUpload));
    }

    #[test]
    fn precondition_errors_have_no_step() {
        let err = MintError::SupplyOverflow {
            amount: u64::MAX,
            decimals: 9,
        };
        assert_eq!(err.step(), None);
    }

    #[test]
    fn balance_error_rounds_to_readable_sol() {
        let err = MintError::InsufficientBalance {
            balance_sol: 0.03217,
            required_sol: 0.1,
        };
        let message = err.to_string();
        assert!(message.contains("0.0322 SOL"));
        assert!(message.contains("0.1 SOL"));
    }

    #[test]
    fn image_debug_reports_length_not_contents() {
        let image = UploadedImage {
            bytes: vec![0xAB; 512],
            file_name: "token.png".to_string(),
            content_type: "image/png".to_string(),
        };
        let debug = format!("{:?}", image);
        assert!(debug.contains("512"));
        assert!(!debug.contains("171")); // 0xAB
    }
}
