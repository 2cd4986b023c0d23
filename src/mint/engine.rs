//! The mint sequence.
//!
//! # Responsibilities
//!
//! - Run the steps in a fixed order: balance check, fee payment, image
//!   upload, metadata upload, mint account creation, metadata account
//!   creation, supply mint
//! - Confirm each transaction before starting the next step
//! - Tag every failure with the step it happened in
//!
//! # Design Decisions
//!
//! Steps are not retried and earlier steps are not rolled back. Uploads and
//! on-chain writes are permanent, so a failure part-way through reports
//! exactly which step died and leaves the completed steps in place.

use solana_sdk::instruction::Instruction;
use solana_sdk::native_token::{lamports_to_sol, sol_to_lamports};
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;

use mpl_token_metadata::accounts::Metadata;
use mpl_token_metadata::instructions::CreateMetadataAccountV3Builder;
use mpl_token_metadata::types::{Creator, DataV2};

use crate::chain::client::SolanaRpc;
use crate::chain::types::{ChainError, ChainResult};
use crate::chain::wallet::ServiceWallet;
use crate::config::schema::MintConfig;
use crate::mint::metadata;
use crate::mint::types::{
    MintError, MintOutcome, MintRequest, MintSignatures, MintStep, UploadedImage,
};
use crate::storage::client::StorageClient;

/// Runs the mint sequence with the service wallet as payer and authority.
pub struct MintEngine {
    rpc: SolanaRpc,
    wallet: ServiceWallet,
    storage: StorageClient,
    config: MintConfig,
}

impl MintEngine {
    pub fn new(
        rpc: SolanaRpc,
        wallet: ServiceWallet,
        storage: StorageClient,
        config: MintConfig,
    ) -> Self {
        Self {
            rpc,
            wallet,
            storage,
            config,
        }
    }

    /// Run the full sequence and return the new token's addresses and URIs.
    pub async fn execute(
        &self,
        request: &MintRequest,
        image: &UploadedImage,
    ) -> Result<MintOutcome, MintError> {
        tracing::info!(
            name = %request.name,
            symbol = %request.symbol,
            network = %self.rpc.cluster(),
            decimals = request.decimals,
            mint_amount = request.mint_amount,
            "Starting mint sequence"
        );

        // Precondition checks fail before any side effect.
        let supply = base_units(request.mint_amount, request.decimals).ok_or(
            MintError::SupplyOverflow {
                amount: request.mint_amount,
                decimals: request.decimals,
            },
        )?;
        self.check_balance().await?;

        let fee_payment = self.pay_service_fee().await?;
        let (image_uri, metadata_uri) = self.upload_assets(request, image).await?;
        let (mint_address, create_mint) = self.create_mint_account(request.decimals).await?;
        let create_metadata = self
            .create_metadata_account(&mint_address, request, &metadata_uri)
            .await?;
        let mint_supply = self.mint_supply(&mint_address, supply).await?;

        let outcome = MintOutcome {
            mint_address,
            image_uri,
            metadata_uri,
            explorer_url: self.rpc.cluster().explorer_url(&mint_address),
            signatures: MintSignatures {
                fee_payment,
                create_mint,
                create_metadata,
                mint_supply,
            },
        };
        tracing::info!(mint = %outcome.mint_address, "Mint sequence complete");
        Ok(outcome)
    }

    /// Upload the image and the metadata document; returns their URIs.
    ///
    /// This is the whole job in upload-only mode, and the storage steps of
    /// the full sequence.
    pub async fn upload_assets(
        &self,
        request: &MintRequest,
        image: &UploadedImage,
    ) -> Result<(String, String), MintError> {
        // Prefix with a fresh id so repeated uploads of "token.png" stay
        // distinguishable in gateway listings.
        let stored_name = format!("{}-{}", uuid::Uuid::new_v4(), image.file_name);
        tracing::info!(file = %image.file_name, bytes = image.bytes.len(), "Uploading token image");

        let image_uri = self
            .storage
            .upload_file(image.bytes.clone(), &stored_name, &image.content_type)
            .await
            .map_err(|e| MintError::Storage {
                step: MintStep::ImageUpload,
                source: e,
            })?;
        tracing::info!(uri = %image_uri, "Image uploaded");

        let document = metadata::metadata_document(
            &request.name,
            &request.symbol,
            &request.description,
            &request.attributes,
            &image_uri,
            &image.content_type,
            &self.wallet.pubkey(),
        );
        let metadata_uri = self
            .storage
            .upload_json(&document)
            .await
            .map_err(|e| MintError::Storage {
                step: MintStep::MetadataUpload,
                source: e,
            })?;
        tracing::info!(uri = %metadata_uri, "Metadata document uploaded");

        Ok((image_uri, metadata_uri))
    }

    /// Refuse to start when the wallet cannot plausibly cover the sequence.
    async fn check_balance(&self) -> Result<(), MintError> {
        let required = sol_to_lamports(self.config.min_balance_sol);
        if required == 0 {
            return Ok(());
        }

        let balance = self
            .rpc
            .balance(&self.wallet.pubkey())
            .await
            .map_err(|e| MintError::Chain {
                step: MintStep::BalanceCheck,
                source: e,
            })?;
        tracing::info!(balance_sol = lamports_to_sol(balance), "Service wallet balance");

        if balance < required {
            return Err(MintError::InsufficientBalance {
                balance_sol: lamports_to_sol(balance),
                required_sol: self.config.min_balance_sol,
            });
        }
        Ok(())
    }

    /// Transfer the service fee, when a distinct recipient is configured.
    async fn pay_service_fee(&self) -> Result<Option<Signature>, MintError> {
        let payer = self.wallet.pubkey();
        let recipient = match fee_recipient(&self.config, &payer) {
            Some(recipient) => recipient,
            None => {
                tracing::debug!("No distinct fee recipient configured, skipping fee payment");
                return Ok(None);
            }
        };

        let lamports = sol_to_lamports(self.config.fee_sol);
        if lamports == 0 {
            return Ok(None);
        }

        let signature = self
            .send_instructions(
                &[system_instruction::transfer(&payer, &recipient, lamports)],
                &[self.wallet.keypair()],
            )
            .await
            .map_err(|e| MintError::Chain {
                step: MintStep::FeePayment,
                source: e,
            })?;

        tracing::info!(recipient = %recipient, lamports, signature = %signature, "Service fee paid");
        Ok(Some(signature))
    }

    /// Create and initialize the mint account. The service wallet becomes
    /// both mint and freeze authority.
    async fn create_mint_account(&self, decimals: u8) -> Result<(Pubkey, Signature), MintError> {
        let payer = self.wallet.pubkey();
        let mint_keypair = Keypair::new();
        let mint_address = mint_keypair.pubkey();

        let rent = self
            .rpc
            .minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await
            .map_err(|e| MintError::Chain {
                step: MintStep::CreateMint,
                source: e,
            })?;

        let create_account = system_instruction::create_account(
            &payer,
            &mint_address,
            rent,
            spl_token::state::Mint::LEN as u64,
            &spl_token::id(),
        );
        let initialize_mint = spl_token::instruction::initialize_mint(
            &spl_token::id(),
            &mint_address,
            &payer,
            Some(&payer),
            decimals,
        )
        .map_err(|e| MintError::Chain {
            step: MintStep::CreateMint,
            source: ChainError::Transaction(e.to_string()),
        })?;

        let signature = self
            .send_instructions(
                &[create_account, initialize_mint],
                &[self.wallet.keypair(), &mint_keypair],
            )
            .await
            .map_err(|e| MintError::Chain {
                step: MintStep::CreateMint,
                source: e,
            })?;

        tracing::info!(mint = %mint_address, signature = %signature, "Mint account created");
        Ok((mint_address, signature))
    }

    /// Create the metadata account at the token's metadata PDA.
    async fn create_metadata_account(
        &self,
        mint: &Pubkey,
        request: &MintRequest,
        metadata_uri: &str,
    ) -> Result<Signature, MintError> {
        let payer = self.wallet.pubkey();
        let (metadata_address, _bump) = Metadata::find_pda(mint);

        let data = DataV2 {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri: metadata_uri.to_string(),
            seller_fee_basis_points: 0,
            creators: Some(vec![Creator {
                address: payer,
                verified: true,
                share: 100,
            }]),
            collection: None,
            uses: None,
        };

        let instruction = CreateMetadataAccountV3Builder::new()
            .metadata(metadata_address)
            .mint(*mint)
            .mint_authority(payer)
            .payer(payer)
            .update_authority(payer, true)
            .data(data)
            .is_mutable(true)
            .instruction();

        let signature = self
            .send_instructions(&[instruction], &[self.wallet.keypair()])
            .await
            .map_err(|e| MintError::Chain {
                step: MintStep::CreateMetadata,
                source: e,
            })?;

        tracing::info!(metadata = %metadata_address, signature = %signature, "Metadata account created");
        Ok(signature)
    }

    /// Create the service wallet's token account and mint the initial
    /// supply into it.
    async fn mint_supply(&self, mint: &Pubkey, supply: u64) -> Result<Signature, MintError> {
        let payer = self.wallet.pubkey();
        let token_account = spl_associated_token_account::get_associated_token_address(&payer, mint);

        let create_token_account =
            spl_associated_token_account::instruction::create_associated_token_account_idempotent(
                &payer,
                &payer,
                mint,
                &spl_token::id(),
            );
        let mint_to =
            spl_token::instruction::mint_to(&spl_token::id(), mint, &token_account, &payer, &[], supply)
                .map_err(|e| MintError::Chain {
                    step: MintStep::MintSupply,
                    source: ChainError::Transaction(e.to_string()),
                })?;

        let signature = self
            .send_instructions(&[create_token_account, mint_to], &[self.wallet.keypair()])
            .await
            .map_err(|e| MintError::Chain {
                step: MintStep::MintSupply,
                source: e,
            })?;

        tracing::info!(token_account = %token_account, supply, signature = %signature, "Initial supply minted");
        Ok(signature)
    }

    /// Build, sign, submit, and confirm one transaction.
    async fn send_instructions(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> ChainResult<Signature> {
        let blockhash = self.rpc.latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.wallet.pubkey()),
            &signers.to_vec(),
            blockhash,
        );
        self.rpc.send_and_confirm(&transaction).await
    }
}

/// Convert a whole-token amount to base units (`amount * 10^decimals`).
fn base_units(amount: u64, decimals: u8) -> Option<u64> {
    10u64
        .checked_pow(decimals as u32)
        .and_then(|scale| amount.checked_mul(scale))
}

/// Fee recipient, when configured, parseable, and not the payer itself.
fn fee_recipient(config: &MintConfig, payer: &Pubkey) -> Option<Pubkey> {
    let raw = config.fee_recipient.as_deref()?;
    let recipient = raw.parse::<Pubkey>().ok()?;
    (recipient != *payer).then_some(recipient)
}
