//! Wallet capabilities: the external signer seam and a local keypair implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::pipeline::SubmitError;

/// External signing capability borrowed by the submission pipeline
///
/// Implementations decide how approval happens: a local keypair signs
/// immediately, an interactive wallet may suspend and may decline.
/// Callers check `is_connected` before invoking the pipeline.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Public key of the signing identity
    fn pubkey(&self) -> Pubkey;

    /// Whether the capability is currently usable
    fn is_connected(&self) -> bool;

    /// Sign the transaction, filling this wallet's signature slot
    ///
    /// Receives the payload after any ephemeral signers have applied
    /// their signatures. Fails with `SigningRejected` when approval is
    /// declined.
    async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, SubmitError>;

    /// Sign an arbitrary message
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, SubmitError>;
}

/// File-backed keypair wallet
pub struct LocalWallet {
    keypair: Keypair,
}

impl LocalWallet {
    /// Load a wallet from a keypair file (raw 64 bytes or JSON array)
    pub fn from_file(path: &str) -> Result<Self> {
        let path = expand_home(path);
        let keypair_bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read keypair file: {}", path))?;

        let keypair = if keypair_bytes.len() == 64 {
            // Raw bytes format - validate before conversion
            if keypair_bytes.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(keypair_bytes.as_slice()).context("Invalid keypair bytes")?
        } else {
            // JSON format
            let json: Vec<u8> = serde_json::from_slice(&keypair_bytes)
                .context("Failed to parse keypair JSON")?;
            if json.len() != 64 {
                anyhow::bail!(
                    "Invalid keypair length: expected 64 bytes, got {}",
                    json.len()
                );
            }
            if json.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(json.as_slice()).context("Invalid keypair from JSON")?
        };

        Ok(Self { keypair })
    }

    /// Create a wallet from an existing keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, SubmitError> {
        let recent_blockhash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| SubmitError::signing_rejected(e.to_string()))?;
        Ok(tx)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, SubmitError> {
        Ok(self.keypair.sign_message(message))
    }
}

/// Expand a leading `~/` using $HOME so config defaults work unchanged
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return format!("{}/{}", home, rest);
        }
    }
    path.to_string()
}
