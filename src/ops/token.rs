//! Metadata-tagged token creation
//!
//! Three sequential submissions, each atomic on its own: the mint
//! account, the metadata account at the derived PDA, then the associated
//! token account with the initial supply. A failure at any step leaves
//! the earlier steps committed; the receipt reports how far it got via
//! the error context.

use std::sync::Arc;

use anyhow::Result;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    program_pack::Pack,
};
use spl_associated_token_account::get_associated_token_address;
use tracing::info;

use crate::metadata::{create_metadata_account_v3, find_metadata_pda, TokenMetadata};
use crate::ops::mint::{create_mint_instructions, mint_supply_instructions};
use crate::ops::{expect_confirmed, scale_amount};
use crate::pipeline::{InstructionSet, SignerSet, SubmitPipeline};
use crate::rpc::QueryRpc;
use crate::wallet::WalletSigner;

/// What to create: metadata fields plus supply parameters
///
/// The metadata JSON document behind `uri` is hosted externally; only
/// the pointer goes on-chain.
#[derive(Debug, Clone)]
pub struct TokenSpec {
    pub metadata: TokenMetadata,
    pub decimals: u8,
    pub initial_supply: u64,
}

/// Result of a fully confirmed token creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenReceipt {
    pub mint: Pubkey,
    pub metadata_account: Pubkey,
    pub ata: Pubkey,
    pub create_signature: Signature,
    pub metadata_signature: Signature,
    /// Present when an initial supply was minted
    pub mint_signature: Option<Signature>,
}

/// Create a token with on-chain metadata
pub async fn create_token_with_metadata(
    pipeline: &SubmitPipeline,
    rpc: &dyn QueryRpc,
    wallet: Arc<dyn WalletSigner>,
    spec: TokenSpec,
) -> Result<TokenReceipt> {
    let authority = wallet.pubkey();
    let mint = Keypair::new();
    let mint_pubkey = mint.pubkey();
    let ata = get_associated_token_address(&authority, &mint_pubkey);
    let metadata_account = find_metadata_pda(&mint_pubkey);

    // 1. Mint account, signed by the ephemeral mint keypair
    let rent = rpc
        .minimum_rent_exemption(spl_token::state::Mint::LEN)
        .await?;
    let instructions = InstructionSet::new(create_mint_instructions(
        &authority,
        &mint_pubkey,
        rent,
        spec.decimals,
    )?)?;
    let signers = SignerSet::new(wallet.clone()).with_ephemeral(mint);
    let outcome = pipeline.submit(instructions, signers).await?;
    let create_signature = expect_confirmed(outcome, "mint creation")?;
    info!(mint = %mint_pubkey, signature = %create_signature, "Mint created");

    // 2. Metadata account at the derived PDA
    let metadata_ix = create_metadata_account_v3(
        &mint_pubkey,
        &authority,
        &authority,
        &authority,
        &spec.metadata,
    )?;
    let outcome = pipeline
        .submit(
            InstructionSet::new(vec![metadata_ix])?,
            SignerSet::new(wallet.clone()),
        )
        .await?;
    let metadata_signature = expect_confirmed(outcome, "metadata creation")?;
    info!(
        mint = %mint_pubkey,
        metadata = %metadata_account,
        name = %spec.metadata.name,
        symbol = %spec.metadata.symbol,
        signature = %metadata_signature,
        "Metadata account created"
    );

    // 3. Associated token account and initial supply
    let mint_signature = if spec.initial_supply > 0 {
        let base_amount = scale_amount(spec.initial_supply, spec.decimals)?;
        let supply_ixs = mint_supply_instructions(&authority, &mint_pubkey, base_amount, true)?;
        let outcome = pipeline
            .submit(InstructionSet::new(supply_ixs)?, SignerSet::new(wallet))
            .await?;
        let signature = expect_confirmed(outcome, "initial supply mint")?;
        info!(mint = %mint_pubkey, ata = %ata, amount = base_amount, signature = %signature, "Initial supply minted");
        Some(signature)
    } else {
        None
    };

    Ok(TokenReceipt {
        mint: mint_pubkey,
        metadata_account,
        ata,
        create_signature,
        metadata_signature,
        mint_signature,
    })
}
