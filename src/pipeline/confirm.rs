//! Confirmation polling
//!
//! Polls the network for a signature's status at a bounded interval
//! until the required commitment level is reached, the expiry window
//! lapses, or the caller cancels. Transient poll failures are retried
//! silently while the window holds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use solana_sdk::signature::Signature;
use tracing::{debug, trace, warn};

use crate::pipeline::types::{Outcome, SubmitPolicy};
use crate::pipeline::window::ExpiryWindow;
use crate::rpc::NetworkRpc;

/// Cooperative cancellation signal
///
/// Checked between poll iterations; an in-flight network call is never
/// interrupted mid-request. Cloning shares the signal.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Poll until the signature reaches a terminal outcome
///
/// Outcome semantics:
/// - `Confirmed` once the commitment level is reported reached
/// - `Rejected` on an explicit on-chain failure
/// - `Expired` once the block height exceeds the window; the canonical
///   "transaction dropped" result, reported even if the transaction
///   later lands
/// - `Cancelled` when the caller signals, within one poll interval; the
///   on-chain result is left unresolved
pub async fn confirm(
    rpc: &dyn NetworkRpc,
    signature: &Signature,
    window: &ExpiryWindow,
    policy: &SubmitPolicy,
    cancel: &CancelToken,
) -> Outcome {
    let mut interval =
        tokio::time::interval(Duration::from_millis(policy.poll_interval_ms.max(1)));
    let mut polls: u64 = 0;

    loop {
        interval.tick().await;

        if cancel.is_cancelled() {
            debug!(signature = %signature, polls = polls, "Confirmation cancelled by caller");
            return Outcome::Cancelled;
        }

        polls += 1;
        match rpc.signature_status(signature).await {
            Ok(Some(status)) => {
                if let Some(err) = status.err {
                    warn!(signature = %signature, error = %err, "Transaction failed on-chain");
                    return Outcome::Rejected(err);
                }
                if status.commitment_met {
                    debug!(signature = %signature, polls = polls, "Transaction confirmed");
                    return Outcome::Confirmed(*signature);
                }
            }
            Ok(None) => {
                trace!(signature = %signature, polls = polls, "Signature not yet observed");
            }
            Err(err) => {
                // Transient; keep polling while the window holds.
                trace!(signature = %signature, error = %err, "Status poll failed, will retry");
            }
        }

        if let Ok(height) = rpc.block_height().await {
            if window.is_lapsed(height) {
                warn!(
                    signature = %signature,
                    expiry_height = window.expiry_height,
                    current_height = height,
                    polls = polls,
                    "Window lapsed before confirmation"
                );
                return Outcome::Expired;
            }
        }
    }
}
