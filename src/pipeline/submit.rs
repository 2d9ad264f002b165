//! Pipeline orchestration
//!
//! Composes the four stages of one submission in strict order:
//! acquire window → sign → broadcast → confirm. Failure at any stage
//! short-circuits; a terminal outcome never restarts an earlier stage.

use std::sync::Arc;
use std::time::Instant;

use solana_sdk::signature::Signature;
use tracing::{info, warn};

use crate::observability::CorrelationId;
use crate::pipeline::broadcast::broadcast;
use crate::pipeline::confirm::{confirm, CancelToken};
use crate::pipeline::errors::SubmitError;
use crate::pipeline::signing::sign;
use crate::pipeline::types::{InstructionSet, Outcome, SignerSet, SubmissionAttempt, SubmitPolicy};
use crate::pipeline::window::{ExpiryTracker, ExpiryWindow};
use crate::rpc::NetworkRpc;

/// The transaction submission pipeline
///
/// One instance serves any number of submissions; each invocation owns
/// its attempt state exclusively, so independent submissions may run
/// concurrently. Conflicting on-chain state between concurrent
/// submissions is the caller's concern.
pub struct SubmitPipeline {
    rpc: Arc<dyn NetworkRpc>,
    tracker: ExpiryTracker,
    policy: SubmitPolicy,
}

impl SubmitPipeline {
    pub fn new(rpc: Arc<dyn NetworkRpc>, policy: SubmitPolicy) -> Self {
        let tracker = ExpiryTracker::new(rpc.clone());
        Self {
            rpc,
            tracker,
            policy,
        }
    }

    pub fn policy(&self) -> &SubmitPolicy {
        &self.policy
    }

    /// Acquire a fresh expiry window
    pub async fn acquire_window(&self) -> Result<ExpiryWindow, SubmitError> {
        self.tracker.acquire().await
    }

    /// Submit an instruction set and await its terminal outcome
    pub async fn submit(
        &self,
        instructions: InstructionSet,
        signers: SignerSet,
    ) -> Result<Outcome, SubmitError> {
        self.submit_with_cancel(instructions, signers, &CancelToken::new())
            .await
    }

    /// Submit with a caller-held cancellation token
    ///
    /// Errors cover the stages before the payload reaches the network
    /// (window acquisition, signing, exhausted broadcast). Once the
    /// submission is decided against the network, the result is an
    /// [`Outcome`]: `Expired` and `Rejected` are decided results, not
    /// errors.
    pub async fn submit_with_cancel(
        &self,
        instructions: InstructionSet,
        signers: SignerSet,
        cancel: &CancelToken,
    ) -> Result<Outcome, SubmitError> {
        let correlation_id = CorrelationId::new();
        let started = Instant::now();

        let window = self.tracker.acquire().await?;
        let payload = sign(&instructions, &signers, &window).await?;

        let mut attempt = SubmissionAttempt::new(payload, window.clone());
        let signature = match broadcast(
            self.rpc.as_ref(),
            &mut attempt,
            &self.policy,
            &correlation_id,
        )
        .await
        {
            Ok(signature) => signature,
            Err(SubmitError::Expired) => {
                info!(correlation_id = %correlation_id, "Submission expired during broadcast");
                return Ok(Outcome::Expired);
            }
            Err(SubmitError::Rejected(reason)) => {
                warn!(correlation_id = %correlation_id, reason = %reason, "Submission rejected at broadcast");
                return Ok(Outcome::Rejected(reason));
            }
            Err(err) => return Err(err),
        };

        let outcome = confirm(self.rpc.as_ref(), &signature, &window, &self.policy, cancel).await;
        info!(
            correlation_id = %correlation_id,
            signature = %signature,
            outcome = %outcome,
            broadcast_attempts = attempt.attempts(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Submission finished"
        );
        Ok(outcome)
    }

    /// Await confirmation of a signature produced outside the
    /// sign/broadcast path (e.g. an airdrop)
    pub async fn await_confirmation(
        &self,
        signature: &Signature,
        window: &ExpiryWindow,
        cancel: &CancelToken,
    ) -> Outcome {
        confirm(self.rpc.as_ref(), signature, window, &self.policy, cancel).await
    }
}
