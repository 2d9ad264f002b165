//! SOL transfer

use std::sync::Arc;

use anyhow::Result;
use solana_sdk::{
    native_token::sol_to_lamports, pubkey::Pubkey, signature::Signature, system_instruction,
};
use tracing::info;

use crate::ops::expect_confirmed;
use crate::pipeline::{InstructionSet, SignerSet, SubmitPipeline};
use crate::wallet::WalletSigner;

/// Result of a confirmed SOL transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub signature: Signature,
    pub recipient: Pubkey,
    pub lamports: u64,
}

/// Send SOL from the wallet to a recipient
pub async fn transfer_sol(
    pipeline: &SubmitPipeline,
    wallet: Arc<dyn WalletSigner>,
    recipient: Pubkey,
    sol: f64,
) -> Result<TransferReceipt> {
    anyhow::ensure!(sol > 0.0, "Transfer amount must be positive");
    let lamports = sol_to_lamports(sol);

    let ix = system_instruction::transfer(&wallet.pubkey(), &recipient, lamports);
    let instructions = InstructionSet::new(vec![ix])?;
    let signers = SignerSet::new(wallet);

    let outcome = pipeline.submit(instructions, signers).await?;
    let signature = expect_confirmed(outcome, "SOL transfer")?;
    info!(recipient = %recipient, lamports = lamports, signature = %signature, "SOL transferred");

    Ok(TransferReceipt {
        signature,
        recipient,
        lamports,
    })
}
