//! Token holdings listing
//!
//! Enumerates the wallet's SPL token accounts and enriches each entry
//! with name/symbol from the mint's metadata PDA when one exists.
//! Missing metadata is normal for tokens created without it and never
//! fails the listing.

use anyhow::Result;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::metadata::{decode_metadata, find_metadata_pda, TokenMetadata};
use crate::rpc::QueryRpc;

/// One token position held by the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHolding {
    pub mint: Pubkey,
    pub ata: Pubkey,
    pub raw_amount: u64,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub uri: Option<String>,
}

impl TokenHolding {
    /// Balance in whole tokens
    pub fn ui_amount(&self) -> f64 {
        self.raw_amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

/// List all SPL token holdings of `owner`, with best-effort metadata
pub async fn list_tokens(rpc: &dyn QueryRpc, owner: &Pubkey) -> Result<Vec<TokenHolding>> {
    let accounts = rpc.token_accounts_by_owner(owner).await?;
    debug!(owner = %owner, accounts = accounts.len(), "Fetched token accounts");

    let mut holdings = Vec::with_capacity(accounts.len());
    for account in accounts {
        let metadata = fetch_metadata(rpc, &account.mint).await;
        let (name, symbol, uri) = match metadata {
            Some(m) => (m.name, m.symbol, Some(m.uri)),
            None => ("Unknown Token".to_string(), "Unknown".to_string(), None),
        };
        holdings.push(TokenHolding {
            mint: account.mint,
            ata: account.address,
            raw_amount: account.raw_amount,
            decimals: account.decimals,
            name,
            symbol,
            uri,
        });
    }
    Ok(holdings)
}

/// Read and decode a mint's metadata account, tolerating its absence
async fn fetch_metadata(rpc: &dyn QueryRpc, mint: &Pubkey) -> Option<TokenMetadata> {
    let pda = find_metadata_pda(mint);
    let data = rpc.account_data(&pda).await.ok().flatten()?;
    decode_metadata(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_amount() {
        let holding = TokenHolding {
            mint: Pubkey::new_unique(),
            ata: Pubkey::new_unique(),
            raw_amount: 1_500_000_000,
            decimals: 9,
            name: "Demo Token".to_string(),
            symbol: "DEMO".to_string(),
            uri: None,
        };
        assert!((holding.ui_amount() - 1.5).abs() < f64::EPSILON);
    }
}
