//! Wallet balance query

use anyhow::Result;
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

use crate::rpc::QueryRpc;

/// Balance of an account in lamports, with SOL rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceReport {
    pub address: Pubkey,
    pub lamports: u64,
}

impl BalanceReport {
    pub fn sol(&self) -> f64 {
        self.lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// Fetch the SOL balance of an account
pub async fn balance(rpc: &dyn QueryRpc, address: &Pubkey) -> Result<BalanceReport> {
    let lamports = rpc.balance(address).await?;
    Ok(BalanceReport {
        address: *address,
        lamports,
    })
}
