//! Error types for the submission pipeline
//!
//! The taxonomy mirrors the lifecycle of a submission:
//! - Transient network failures are retryable and never terminal on their own
//! - Signing failures are terminal and user-facing
//! - Expiry and on-chain rejection are terminal outcomes, not retried
//! - Cancellation is terminal but not an error condition

use thiserror::Error;

/// Error type covering every stage of a submission
///
/// Stages: window acquisition, signing, broadcast, confirmation polling.
/// The orchestrator never converts a terminal error into a retry of an
/// earlier stage; restarting the whole pipeline is the caller's decision.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// A network or RPC call failed in a way that may succeed on retry
    ///
    /// This covers I/O errors, timeouts, and server-side errors that do
    /// not implicate the payload itself.
    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    /// The expiry window lapsed before the submission could land
    ///
    /// The signed payload is anchored to a reference hash the network no
    /// longer accepts. The payload must be rebuilt from scratch;
    /// resending it verbatim can never succeed.
    #[error("Expiry window lapsed before the submission landed")]
    Expired,

    /// The external signer declined to sign, or the capability is absent
    #[error("Signing rejected: {0}")]
    SigningRejected(String),

    /// A required identity did not sign the payload
    #[error("Missing signer: {0}")]
    MissingSigner(String),

    /// The network rejected the payload as structurally invalid
    ///
    /// Includes malformed instructions and already-processed duplicates.
    /// Never retried: the same bytes would be rejected again.
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// The caller cancelled the submission
    #[error("Submission cancelled by caller")]
    Cancelled,

    /// Failed to serialize the signed payload
    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    /// Invalid pipeline input or configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SubmitError {
    /// Check if this error is potentially retryable
    ///
    /// Only transient network failures qualify; every other variant is
    /// terminal for the current payload.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }

    /// Get the error category for logging and observability
    pub fn category(&self) -> &'static str {
        match self {
            Self::TransientNetwork(_) => "transient",
            Self::Expired => "expired",
            Self::SigningRejected(_) => "signing",
            Self::MissingSigner(_) => "signing",
            Self::Rejected(_) => "rejected",
            Self::Cancelled => "cancelled",
            Self::Serialization(_) => "serialization",
            Self::Configuration(_) => "config",
        }
    }

    /// Create a transient network error
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::TransientNetwork(reason.into())
    }

    /// Create a signing rejection error
    pub fn signing_rejected(reason: impl Into<String>) -> Self {
        Self::SigningRejected(reason.into())
    }

    /// Create a rejection error for a structurally invalid payload
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
