//! Mint creation and token minting
//!
//! Mirrors the two-transaction shape of creating a fungible token:
//! first the mint account itself (the new mint keypair is an ephemeral
//! signer, since the account being created must authorize its own
//! creation), then the associated token account plus the initial supply.

use std::sync::Arc;

use anyhow::{Context, Result};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    program_pack::Pack,
    system_instruction,
};
use spl_associated_token_account::get_associated_token_address;
use tracing::info;

use crate::ops::{expect_confirmed, scale_amount};
use crate::pipeline::{InstructionSet, SignerSet, SubmitPipeline};
use crate::rpc::QueryRpc;
use crate::wallet::WalletSigner;

/// Result of a confirmed mint creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub mint: Pubkey,
    pub ata: Pubkey,
    pub create_signature: Signature,
    /// Present when an initial supply was minted
    pub mint_signature: Option<Signature>,
}

/// Result of a confirmed mint-to on an existing mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintTokensReceipt {
    pub ata: Pubkey,
    pub amount: u64,
    pub signature: Signature,
}

/// Instructions creating and initializing a new mint account
///
/// The wallet becomes both mint and freeze authority.
pub fn create_mint_instructions(
    authority: &Pubkey,
    mint: &Pubkey,
    rent_lamports: u64,
    decimals: u8,
) -> Result<Vec<Instruction>> {
    let create_ix = system_instruction::create_account(
        authority,
        mint,
        rent_lamports,
        spl_token::state::Mint::LEN as u64,
        &spl_token::id(),
    );
    let init_ix = spl_token::instruction::initialize_mint(
        &spl_token::id(),
        mint,
        authority,
        Some(authority),
        decimals,
    )
    .context("Failed to build initialize_mint instruction")?;
    Ok(vec![create_ix, init_ix])
}

/// Instructions minting `base_amount` to the owner's associated token
/// account, creating the account first when asked
pub fn mint_supply_instructions(
    owner: &Pubkey,
    mint: &Pubkey,
    base_amount: u64,
    create_ata: bool,
) -> Result<Vec<Instruction>> {
    let ata = get_associated_token_address(owner, mint);
    let mut instructions = Vec::with_capacity(2);
    if create_ata {
        instructions.push(
            spl_associated_token_account::instruction::create_associated_token_account(
                owner,
                owner,
                mint,
                &spl_token::id(),
            ),
        );
    }
    instructions.push(
        spl_token::instruction::mint_to(&spl_token::id(), mint, &ata, owner, &[], base_amount)
            .context("Failed to build mint_to instruction")?,
    );
    Ok(instructions)
}

/// Create a new SPL token mint, optionally minting an initial supply
pub async fn create_mint(
    pipeline: &SubmitPipeline,
    rpc: &dyn QueryRpc,
    wallet: Arc<dyn WalletSigner>,
    decimals: u8,
    initial_supply: u64,
) -> Result<MintReceipt> {
    let authority = wallet.pubkey();
    let mint = Keypair::new();
    let mint_pubkey = mint.pubkey();
    let ata = get_associated_token_address(&authority, &mint_pubkey);

    let rent = rpc
        .minimum_rent_exemption(spl_token::state::Mint::LEN)
        .await?;
    let instructions = InstructionSet::new(create_mint_instructions(
        &authority,
        &mint_pubkey,
        rent,
        decimals,
    )?)?;
    // The mint keypair authorizes its own creation, then is discarded.
    let signers = SignerSet::new(wallet.clone()).with_ephemeral(mint);

    let outcome = pipeline.submit(instructions, signers).await?;
    let create_signature = expect_confirmed(outcome, "mint creation")?;
    info!(mint = %mint_pubkey, decimals = decimals, signature = %create_signature, "Mint created");

    if initial_supply == 0 {
        return Ok(MintReceipt {
            mint: mint_pubkey,
            ata,
            create_signature,
            mint_signature: None,
        });
    }

    let base_amount = scale_amount(initial_supply, decimals)?;
    let supply_ixs = mint_supply_instructions(&authority, &mint_pubkey, base_amount, true)?;
    let outcome = pipeline
        .submit(InstructionSet::new(supply_ixs)?, SignerSet::new(wallet))
        .await?;
    let mint_signature = expect_confirmed(outcome, "initial supply mint")?;
    info!(mint = %mint_pubkey, ata = %ata, amount = base_amount, signature = %mint_signature, "Initial supply minted");

    Ok(MintReceipt {
        mint: mint_pubkey,
        ata,
        create_signature,
        mint_signature: Some(mint_signature),
    })
}

/// Mint more tokens from an existing mint to the wallet's token account
///
/// The token account must already exist; the wallet must be the mint
/// authority.
pub async fn mint_tokens(
    pipeline: &SubmitPipeline,
    wallet: Arc<dyn WalletSigner>,
    mint: Pubkey,
    decimals: u8,
    amount: u64,
) -> Result<MintTokensReceipt> {
    anyhow::ensure!(amount > 0, "Mint amount must be positive");
    let owner = wallet.pubkey();
    let ata = get_associated_token_address(&owner, &mint);
    let base_amount = scale_amount(amount, decimals)?;

    let instructions =
        InstructionSet::new(mint_supply_instructions(&owner, &mint, base_amount, false)?)?;
    let outcome = pipeline
        .submit(instructions, SignerSet::new(wallet))
        .await?;
    let signature = expect_confirmed(outcome, "token mint")?;
    info!(mint = %mint, ata = %ata, amount = base_amount, signature = %signature, "Tokens minted");

    Ok(MintTokensReceipt {
        ata,
        amount: base_amount,
        signature,
    })
}
