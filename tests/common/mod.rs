//! Deterministic fakes for exercising the pipeline and operations
//! without a network
//!
//! `FakeRpc` scripts the submit/status/height sequences and counts
//! calls; `FakeWallet` records what it observed when asked to sign and
//! can be configured to decline or report as disconnected.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use solmint::pipeline::SubmitError;
use solmint::rpc::{
    NetworkRpc, QueryRpc, ReferenceState, StatusSnapshot, TokenAccountSummary,
};
use solmint::wallet::WalletSigner;

/// Scripted RPC collaborator
///
/// Scripts are consumed front-to-back; once a script is empty the
/// configured fallback applies. All calls are counted.
pub struct FakeRpc {
    reference: ReferenceState,
    fail_reference: bool,
    signature: Signature,
    airdrop_signature: Signature,

    submit_script: Mutex<VecDeque<Result<Signature, SubmitError>>>,
    status_script: Mutex<VecDeque<Option<StatusSnapshot>>>,
    fallback_status: Option<StatusSnapshot>,
    height_script: Mutex<VecDeque<u64>>,
    last_height: AtomicU64,

    pub submitted_payloads: Mutex<Vec<Vec<u8>>>,
    pub submit_calls: AtomicU64,
    pub status_calls: AtomicU64,
    pub height_calls: AtomicU64,

    balance_lamports: u64,
    rent_lamports: u64,
    token_accounts: Vec<TokenAccountSummary>,
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
}

impl FakeRpc {
    fn base(expiry_height: u64, fallback_status: Option<StatusSnapshot>) -> Self {
        Self {
            reference: ReferenceState {
                blockhash: Hash::new_unique(),
                last_valid_block_height: expiry_height,
            },
            fail_reference: false,
            signature: Signature::from([9u8; 64]),
            airdrop_signature: Signature::from([8u8; 64]),
            submit_script: Mutex::new(VecDeque::new()),
            status_script: Mutex::new(VecDeque::new()),
            fallback_status,
            height_script: Mutex::new(VecDeque::new()),
            last_height: AtomicU64::new(0),
            submitted_payloads: Mutex::new(Vec::new()),
            submit_calls: AtomicU64::new(0),
            status_calls: AtomicU64::new(0),
            height_calls: AtomicU64::new(0),
            balance_lamports: 0,
            rent_lamports: 1_461_600,
            token_accounts: Vec::new(),
            accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Every submission is accepted and confirms on the first poll
    pub fn confirming(expiry_height: u64) -> Self {
        Self::base(expiry_height, Some(StatusSnapshot::confirmed()))
    }

    /// Submissions are accepted but never observed as confirmed
    pub fn pending(expiry_height: u64) -> Self {
        Self::base(expiry_height, None)
    }

    pub fn with_reference_failure(mut self) -> Self {
        self.fail_reference = true;
        self
    }

    pub fn with_balance(mut self, lamports: u64) -> Self {
        self.balance_lamports = lamports;
        self
    }

    pub fn with_token_accounts(mut self, accounts: Vec<TokenAccountSummary>) -> Self {
        self.token_accounts = accounts;
        self
    }

    pub fn with_account(self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.lock().unwrap().insert(address, data);
        self
    }

    /// The signature handed out for accepted submissions
    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn airdrop_signature(&self) -> Signature {
        self.airdrop_signature
    }

    /// Queue the result of the next `submit_raw` call
    pub fn script_submit(&self, result: Result<Signature, SubmitError>) {
        self.submit_script.lock().unwrap().push_back(result);
    }

    /// Queue the result of the next `signature_status` call
    pub fn script_status(&self, status: Option<StatusSnapshot>) {
        self.status_script.lock().unwrap().push_back(status);
    }

    /// Queue block heights returned by successive `block_height` calls;
    /// the last one repeats once the script is exhausted
    pub fn script_heights(&self, heights: &[u64]) {
        let mut script = self.height_script.lock().unwrap();
        for &h in heights {
            script.push_back(h);
        }
    }
}

#[async_trait]
impl NetworkRpc for FakeRpc {
    async fn reference_state(&self) -> Result<ReferenceState, SubmitError> {
        if self.fail_reference {
            return Err(SubmitError::transient("reference state unavailable"));
        }
        Ok(self.reference)
    }

    async fn submit_raw(&self, payload: &[u8]) -> Result<Signature, SubmitError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted_payloads.lock().unwrap().push(payload.to_vec());
        match self.submit_script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.signature),
        }
    }

    async fn signature_status(
        &self,
        _signature: &Signature,
    ) -> Result<Option<StatusSnapshot>, SubmitError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.status_script.lock().unwrap().pop_front() {
            Some(status) => Ok(status),
            None => Ok(self.fallback_status.clone()),
        }
    }

    async fn block_height(&self) -> Result<u64, SubmitError> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(height) = self.height_script.lock().unwrap().pop_front() {
            self.last_height.store(height, Ordering::SeqCst);
        }
        Ok(self.last_height.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl QueryRpc for FakeRpc {
    async fn balance(&self, _address: &Pubkey) -> Result<u64, SubmitError> {
        Ok(self.balance_lamports)
    }

    async fn request_airdrop(
        &self,
        _to: &Pubkey,
        _lamports: u64,
    ) -> Result<Signature, SubmitError> {
        Ok(self.airdrop_signature)
    }

    async fn minimum_rent_exemption(&self, _size: usize) -> Result<u64, SubmitError> {
        Ok(self.rent_lamports)
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SubmitError> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn token_accounts_by_owner(
        &self,
        _owner: &Pubkey,
    ) -> Result<Vec<TokenAccountSummary>, SubmitError> {
        Ok(self.token_accounts.clone())
    }
}

/// Wallet fake recording signing activity
pub struct FakeWallet {
    keypair: Keypair,
    decline: bool,
    connected: bool,
    /// Count of non-empty signature slots observed when invoked
    pub presigned_when_called: AtomicUsize,
    pub sign_calls: AtomicU64,
}

impl FakeWallet {
    pub fn new() -> Self {
        Self {
            keypair: Keypair::new(),
            decline: false,
            connected: true,
            presigned_when_called: AtomicUsize::new(usize::MAX),
            sign_calls: AtomicU64::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Self::new()
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl WalletSigner for FakeWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, SubmitError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.decline {
            return Err(SubmitError::signing_rejected("user declined"));
        }
        let presigned = tx
            .signatures
            .iter()
            .filter(|s| **s != Signature::default())
            .count();
        self.presigned_when_called.store(presigned, Ordering::SeqCst);

        let hash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[&self.keypair], hash)
            .map_err(|e| SubmitError::signing_rejected(e.to_string()))?;
        Ok(tx)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, SubmitError> {
        Ok(self.keypair.sign_message(message))
    }
}
