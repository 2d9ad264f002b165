//! Devnet SOL airdrop

use anyhow::Result;
use solana_sdk::{native_token::sol_to_lamports, pubkey::Pubkey, signature::Signature};
use tracing::info;

use crate::ops::expect_confirmed;
use crate::pipeline::{CancelToken, SubmitPipeline};
use crate::rpc::QueryRpc;

/// Request an airdrop and wait for it to confirm
///
/// The airdrop signature comes straight from the faucet; only the
/// confirmation stage of the pipeline applies.
pub async fn airdrop(
    pipeline: &SubmitPipeline,
    rpc: &dyn QueryRpc,
    recipient: &Pubkey,
    sol: f64,
) -> Result<Signature> {
    anyhow::ensure!(sol > 0.0, "Airdrop amount must be positive");
    let lamports = sol_to_lamports(sol);

    let signature = rpc.request_airdrop(recipient, lamports).await?;
    info!(recipient = %recipient, lamports = lamports, signature = %signature, "Airdrop requested");

    let window = pipeline.acquire_window().await?;
    let outcome = pipeline
        .await_confirmation(&signature, &window, &CancelToken::new())
        .await;
    expect_confirmed(outcome, "airdrop")
}
