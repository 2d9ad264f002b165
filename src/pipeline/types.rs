//! Core data types for the submission pipeline

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

use crate::pipeline::errors::SubmitError;
use crate::pipeline::window::ExpiryWindow;
use crate::wallet::WalletSigner;

/// Ordered sequence of instructions forming one atomic on-chain operation
///
/// Immutable once built. The pipeline never interprets instruction
/// semantics; it only carries them to the network.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    /// Build an instruction set, rejecting an empty sequence
    pub fn new(instructions: Vec<Instruction>) -> Result<Self, SubmitError> {
        if instructions.is_empty() {
            return Err(SubmitError::Configuration(
                "Instruction set is empty".to_string(),
            ));
        }
        Ok(Self { instructions })
    }

    /// The ordered instructions
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions in the set
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Signing identities for one submission
///
/// Ephemeral keypairs exist solely for this submission (e.g. the keypair
/// of an account being created) and are consumed with the set. The
/// wallet capability is shared; it signs last.
pub struct SignerSet {
    fee_payer: Pubkey,
    ephemeral: Vec<Keypair>,
    wallet: Arc<dyn WalletSigner>,
}

impl SignerSet {
    /// Create a signer set with the wallet as fee payer
    pub fn new(wallet: Arc<dyn WalletSigner>) -> Self {
        Self {
            fee_payer: wallet.pubkey(),
            ephemeral: Vec::new(),
            wallet,
        }
    }

    /// Add an ephemeral signer; declaration order is signing order
    pub fn with_ephemeral(mut self, keypair: Keypair) -> Self {
        self.ephemeral.push(keypair);
        self
    }

    /// The identity charged network fees
    pub fn fee_payer(&self) -> Pubkey {
        self.fee_payer
    }

    /// Ephemeral signers in declaration order
    pub fn ephemeral(&self) -> &[Keypair] {
        &self.ephemeral
    }

    /// The external wallet capability
    pub fn wallet(&self) -> &dyn WalletSigner {
        self.wallet.as_ref()
    }
}

impl fmt::Debug for SignerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerSet")
            .field("fee_payer", &self.fee_payer)
            .field(
                "ephemeral",
                &self
                    .ephemeral
                    .iter()
                    .map(|k| k.pubkey())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Mutable state of one broadcast cycle
///
/// The payload bytes are fixed at signing time; retries resend them
/// verbatim. Once the window's reference hash is stale the attempt is
/// abandoned, never resent.
#[derive(Debug)]
pub struct SubmissionAttempt {
    payload: Vec<u8>,
    window: ExpiryWindow,
    attempts: u32,
    last_error: Option<String>,
}

impl SubmissionAttempt {
    pub fn new(payload: Vec<u8>, window: ExpiryWindow) -> Self {
        Self {
            payload,
            window,
            attempts: 0,
            last_error: None,
        }
    }

    /// The serialized signed payload, identical across attempts
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn window(&self) -> &ExpiryWindow {
        &self.window
    }

    /// Number of broadcast attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
    }
}

/// Terminal result of a submission
///
/// Exactly one outcome is produced per invocation; it never flips after
/// being reported, even if the network state changes later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The required commitment level was reached
    Confirmed(Signature),
    /// The expiry window lapsed before confirmation was observed
    Expired,
    /// The transaction landed and failed, or the network refused it
    Rejected(String),
    /// The caller cancelled while awaiting confirmation
    Cancelled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed(sig) => write!(f, "confirmed ({})", sig),
            Self::Expired => write!(f, "expired"),
            Self::Rejected(reason) => write!(f, "rejected: {}", reason),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Tunable submission policy
///
/// `max_attempts` counts broadcast attempts including the first;
/// backoff grows exponentially from `base_backoff_ms` up to
/// `max_backoff_ms` with jitter to avoid thundering herds.
#[derive(Debug, Clone)]
pub struct SubmitPolicy {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub jitter_factor: f64,
    pub poll_interval_ms: u64,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff_ms: 200,
            max_backoff_ms: 5_000,
            jitter_factor: 0.2,
            poll_interval_ms: 500,
        }
    }
}

impl SubmitPolicy {
    /// Calculate backoff delay for a given attempt (0-indexed)
    pub(crate) fn backoff(&self, attempt: u32) -> Duration {
        let exp_backoff = (self.base_backoff_ms as f64) * 2_f64.powi(attempt as i32);
        let capped_backoff = exp_backoff.min(self.max_backoff_ms as f64);

        let jitter_range = capped_backoff * self.jitter_factor.clamp(0.0, 1.0);
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };

        Duration::from_millis((capped_backoff + jitter).max(0.0) as u64)
    }
}
