//! Broadcast with bounded retry
//!
//! Resends the identical signed bytes; signing never happens here. Only
//! transient failures are retried, with jittered exponential backoff. A
//! lapsed window aborts the cycle: a payload anchored to a stale
//! reference hash can no longer land, so resending it is pointless.

use solana_sdk::signature::Signature;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::observability::CorrelationId;
use crate::pipeline::errors::SubmitError;
use crate::pipeline::types::{SubmissionAttempt, SubmitPolicy};
use crate::rpc::NetworkRpc;

/// Broadcast the attempt's payload until accepted or terminal
///
/// Returns the network-assigned signature on the first accepted
/// submission. Structural rejections surface immediately; transient
/// failures consume attempts up to `policy.max_attempts`.
pub async fn broadcast(
    rpc: &dyn NetworkRpc,
    attempt: &mut SubmissionAttempt,
    policy: &SubmitPolicy,
    correlation_id: &CorrelationId,
) -> Result<Signature, SubmitError> {
    let max_attempts = policy.max_attempts.max(1);

    loop {
        if attempt.attempts() > 0 {
            // Re-check the window before a resend. A failed height probe
            // is itself transient; the resend proceeds and the
            // confirmation stage still enforces expiry.
            if let Ok(height) = rpc.block_height().await {
                if attempt.window().is_lapsed(height) {
                    warn!(
                        correlation_id = %correlation_id,
                        attempts = attempt.attempts(),
                        expiry_height = attempt.window().expiry_height,
                        current_height = height,
                        "Window lapsed between broadcast attempts"
                    );
                    return Err(SubmitError::Expired);
                }
            }
        }

        attempt.record_attempt();
        match rpc.submit_raw(attempt.payload()).await {
            Ok(signature) => {
                debug!(
                    correlation_id = %correlation_id,
                    signature = %signature,
                    attempts = attempt.attempts(),
                    "Broadcast accepted"
                );
                return Ok(signature);
            }
            Err(err) if err.is_retryable() && attempt.attempts() < max_attempts => {
                let delay = policy.backoff(attempt.attempts() - 1);
                warn!(
                    correlation_id = %correlation_id,
                    attempt = attempt.attempts(),
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Broadcast failed, retrying"
                );
                attempt.record_error(err.to_string());
                sleep(delay).await;
            }
            Err(err) => {
                attempt.record_error(err.to_string());
                return Err(err);
            }
        }
    }
}
