//! RPC collaborators
//!
//! Two seams, both injected rather than reached through a global:
//! - [`NetworkRpc`] is the narrow surface the submission pipeline
//!   consumes (reference state, raw broadcast, status, block height)
//! - [`QueryRpc`] is the read/query surface the wallet and token
//!   operations consume (balance, airdrop, rent, accounts)
//!
//! [`SolanaRpc`] implements both over a single configured endpoint.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use solana_account_decoder::UiAccountData;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::{RpcRequest, TokenAccountsFilter};
use solana_rpc_client_api::client_error::Error as ClientError;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
};
use solana_transaction_status::TransactionStatus;
use tracing::debug;

use crate::pipeline::SubmitError;

/// Network reference state backing a fresh expiry window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceState {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Processing status snapshot for a submitted signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// On-chain execution error, if the transaction landed and failed
    pub err: Option<String>,
    /// Whether the required commitment level has been reached
    pub commitment_met: bool,
}

impl StatusSnapshot {
    pub fn confirmed() -> Self {
        Self {
            err: None,
            commitment_met: true,
        }
    }

    pub fn processing() -> Self {
        Self {
            err: None,
            commitment_met: false,
        }
    }

    pub fn failed(err: impl Into<String>) -> Self {
        Self {
            err: Some(err.into()),
            commitment_met: false,
        }
    }
}

/// Narrow network seam consumed by the submission pipeline
#[async_trait]
pub trait NetworkRpc: Send + Sync {
    /// Current reference state (blockhash and last valid block height)
    async fn reference_state(&self) -> Result<ReferenceState, SubmitError>;

    /// Submit pre-serialized transaction bytes, returning the signature
    async fn submit_raw(&self, payload: &[u8]) -> Result<Signature, SubmitError>;

    /// Processing status of a signature; `None` when not yet observed
    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<StatusSnapshot>, SubmitError>;

    /// Current network block height
    async fn block_height(&self) -> Result<u64, SubmitError>;
}

/// One SPL token account owned by a wallet, as reported by the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountSummary {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub raw_amount: u64,
    pub decimals: u8,
}

/// Read/query surface consumed by the wallet and token operations
#[async_trait]
pub trait QueryRpc: Send + Sync {
    /// Lamport balance of an account
    async fn balance(&self, address: &Pubkey) -> Result<u64, SubmitError>;

    /// Request a devnet airdrop, returning the airdrop signature
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, SubmitError>;

    /// Minimum lamports for rent exemption of an account of `size` bytes
    async fn minimum_rent_exemption(&self, size: usize) -> Result<u64, SubmitError>;

    /// Raw account data; `None` when the account does not exist
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SubmitError>;

    /// All SPL token accounts owned by `owner`
    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountSummary>, SubmitError>;
}

/// Concrete RPC client over a single configured endpoint
///
/// The endpoint and commitment are constructor inputs; there is no
/// process-wide endpoint state.
pub struct SolanaRpc {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl SolanaRpc {
    pub fn new(url: String, commitment: CommitmentConfig, timeout: Duration) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(url, timeout, commitment),
            commitment,
        }
    }

    /// Map a client error onto the pipeline taxonomy
    ///
    /// An embedded transaction error means the payload itself was judged
    /// and refused; everything else is treated as transient.
    fn classify(err: ClientError) -> SubmitError {
        match err.get_transaction_error() {
            Some(tx_err) => SubmitError::rejected(tx_err.to_string()),
            None => SubmitError::transient(err.to_string()),
        }
    }
}

#[async_trait]
impl NetworkRpc for SolanaRpc {
    async fn reference_state(&self) -> Result<ReferenceState, SubmitError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .map_err(Self::classify)?;
        Ok(ReferenceState {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn submit_raw(&self, payload: &[u8]) -> Result<Signature, SubmitError> {
        // sendTransaction with pre-serialized bytes; retries are owned by
        // the pipeline, so the node-side rebroadcast is disabled.
        let config = json!({
            "encoding": "base64",
            "skipPreflight": false,
            "preflightCommitment": self.commitment.commitment,
            "maxRetries": 0,
        });
        let signature: String = self
            .client
            .send(
                RpcRequest::SendTransaction,
                json!([BASE64.encode(payload), config]),
            )
            .await
            .map_err(Self::classify)?;
        debug!(signature = %signature, bytes = payload.len(), "Raw transaction accepted by RPC");
        Signature::from_str(&signature)
            .map_err(|e| SubmitError::transient(format!("unparseable signature in response: {e}")))
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<StatusSnapshot>, SubmitError> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(Self::classify)?;
        let status = response.value.into_iter().next().flatten();
        Ok(status.map(|s: TransactionStatus| StatusSnapshot {
            commitment_met: s.satisfies_commitment(self.commitment),
            err: s.err.map(|e| e.to_string()),
        }))
    }

    async fn block_height(&self) -> Result<u64, SubmitError> {
        self.client.get_block_height().await.map_err(Self::classify)
    }
}

#[async_trait]
impl QueryRpc for SolanaRpc {
    async fn balance(&self, address: &Pubkey) -> Result<u64, SubmitError> {
        self.client.get_balance(address).await.map_err(Self::classify)
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, SubmitError> {
        self.client
            .request_airdrop(to, lamports)
            .await
            .map_err(Self::classify)
    }

    async fn minimum_rent_exemption(&self, size: usize) -> Result<u64, SubmitError> {
        self.client
            .get_minimum_balance_for_rent_exemption(size)
            .await
            .map_err(Self::classify)
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SubmitError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(Self::classify)?;
        Ok(response.value.map(|account| account.data))
    }

    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountSummary>, SubmitError> {
        let accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
            .await
            .map_err(Self::classify)?;

        let mut summaries = Vec::with_capacity(accounts.len());
        for keyed in accounts {
            let address = Pubkey::from_str(&keyed.pubkey)
                .map_err(|e| SubmitError::transient(format!("bad token account key: {e}")))?;
            // jsonParsed encoding; anything else means the node ignored
            // the requested encoding
            let UiAccountData::Json(parsed) = keyed.account.data else {
                continue;
            };
            let info = &parsed.parsed["info"];
            let Some(mint) = info["mint"].as_str().and_then(|m| Pubkey::from_str(m).ok()) else {
                continue;
            };
            let raw_amount = info["tokenAmount"]["amount"]
                .as_str()
                .and_then(|a| a.parse::<u64>().ok())
                .unwrap_or(0);
            let decimals = info["tokenAmount"]["decimals"].as_u64().unwrap_or(0) as u8;
            summaries.push(TokenAccountSummary {
                address,
                mint,
                raw_amount,
                decimals,
            });
        }
        Ok(summaries)
    }
}
