//! Expiry window acquisition and lapse tracking
//!
//! A window snapshots the network reference state (blockhash plus last
//! valid block height) that bounds how long a signed payload can still
//! land. Windows are fetched fresh per submission; a lapsed window means
//! the payload must be rebuilt, not resent.

use std::sync::Arc;

use solana_sdk::hash::Hash;
use tracing::debug;

use crate::pipeline::errors::SubmitError;
use crate::rpc::NetworkRpc;

/// Validity interval of a pending submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryWindow {
    /// Blockhash the payload is anchored to
    pub reference_hash: Hash,
    /// Last block height at which the payload can still be accepted
    pub expiry_height: u64,
}

impl ExpiryWindow {
    pub fn new(reference_hash: Hash, expiry_height: u64) -> Self {
        Self {
            reference_hash,
            expiry_height,
        }
    }

    /// Whether the window has lapsed at the given network block height
    ///
    /// The window is inclusive of `expiry_height` itself.
    pub fn is_lapsed(&self, current_height: u64) -> bool {
        current_height > self.expiry_height
    }
}

/// Acquires fresh expiry windows from the network collaborator
pub struct ExpiryTracker {
    rpc: Arc<dyn NetworkRpc>,
}

impl ExpiryTracker {
    pub fn new(rpc: Arc<dyn NetworkRpc>) -> Self {
        Self { rpc }
    }

    /// Fetch a fresh window
    ///
    /// One fetch, no retry; a transient failure here propagates to the
    /// caller, who may restart the whole pipeline.
    pub async fn acquire(&self) -> Result<ExpiryWindow, SubmitError> {
        let state = self.rpc.reference_state().await?;
        debug!(
            blockhash = %state.blockhash,
            expiry_height = state.last_valid_block_height,
            "Acquired expiry window"
        );
        Ok(ExpiryWindow::new(
            state.blockhash,
            state.last_valid_block_height,
        ))
    }
}
