//! On-chain cost estimation for one mint sequence.
//!
//! The sequence creates three rent-exempt accounts (the mint, the metadata
//! account, and the creator's token account) across three transactions.
//! Rent minimums are queried live so the estimate tracks the cluster's rent
//! schedule; when the cluster is unreachable a fixed fallback is reported
//! instead of an error.

use solana_sdk::native_token::lamports_to_sol;
use solana_sdk::program_pack::Pack;

use crate::chain::client::SolanaRpc;
use crate::chain::types::ChainResult;

/// Size of an SPL mint account.
pub const MINT_ACCOUNT_SIZE: usize = spl_token::state::Mint::LEN;

/// Size of a token metadata account.
pub const METADATA_ACCOUNT_SIZE: usize = 679;

/// Size of an SPL token holding account.
pub const TOKEN_ACCOUNT_SIZE: usize = spl_token::state::Account::LEN;

/// Base fee per transaction signature, in lamports.
const SIGNATURE_FEE_LAMPORTS: u64 = 5_000;

/// Fee-paying signatures across the sequence's transactions.
const SIGNATURE_COUNT: u64 = 3;

/// Estimate reported when the cluster cannot be reached.
pub const FALLBACK_ESTIMATE_SOL: f64 = 0.005;

/// Estimated cost of one mint sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub lamports: u64,
    pub sol: f64,
}

/// Query rent-exemption minimums from the cluster and add the signature
/// fees for the sequence's transactions.
pub async fn estimate_mint_cost(rpc: &SolanaRpc) -> ChainResult<CostEstimate> {
    let mint_rent = rpc
        .minimum_balance_for_rent_exemption(MINT_ACCOUNT_SIZE)
        .await?;
    let metadata_rent = rpc
        .minimum_balance_for_rent_exemption(METADATA_ACCOUNT_SIZE)
        .await?;
    let token_account_rent = rpc
        .minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_SIZE)
        .await?;

    let lamports =
        mint_rent + metadata_rent + token_account_rent + SIGNATURE_FEE_LAMPORTS * SIGNATURE_COUNT;

    Ok(CostEstimate {
        lamports,
        sol: lamports_to_sol(lamports),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_sizes_match_the_onchain_layouts() {
        assert_eq!(MINT_ACCOUNT_SIZE, 82);
        assert_eq!(TOKEN_ACCOUNT_SIZE, 165);
    }

    #[test]
    fn fallback_is_a_plausible_devnet_cost() {
        assert!(FALLBACK_ESTIMATE_SOL > 0.0);
        assert!(FALLBACK_ESTIMATE_SOL < 0.1);
    }
}
