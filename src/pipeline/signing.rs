//! Signing orchestration
//!
//! Assembles the instruction set, fee payer, and expiry window into one
//! unsigned payload, applies ephemeral signatures in declaration order,
//! then delegates final signing to the wallet capability. Ephemeral
//! identities only exist for this submission, so they must authorize the
//! exact bytes before the external signer sees them.

use solana_sdk::{
    message::Message,
    signature::{Signature, Signer},
    transaction::Transaction,
};
use tracing::debug;

use crate::pipeline::errors::SubmitError;
use crate::pipeline::types::{InstructionSet, SignerSet};
use crate::pipeline::window::ExpiryWindow;

/// Produce the serialized, fully signed payload for one submission
///
/// The wallet call may suspend for interactive approval and may be
/// declined. Fails with `SigningRejected` when the capability is absent
/// or declines, and `MissingSigner` when a required signature slot is
/// still empty afterwards.
pub async fn sign(
    instructions: &InstructionSet,
    signers: &SignerSet,
    window: &ExpiryWindow,
) -> Result<Vec<u8>, SubmitError> {
    let wallet = signers.wallet();
    if !wallet.is_connected() {
        return Err(SubmitError::signing_rejected("wallet is not connected"));
    }

    let fee_payer = signers.fee_payer();
    let message = Message::new_with_blockhash(
        instructions.instructions(),
        Some(&fee_payer),
        &window.reference_hash,
    );
    let mut tx = Transaction::new_unsigned(message);

    for keypair in signers.ephemeral() {
        tx.try_partial_sign(&[keypair], window.reference_hash)
            .map_err(|e| {
                SubmitError::Configuration(format!(
                    "ephemeral signer {} cannot sign this payload: {}",
                    keypair.pubkey(),
                    e
                ))
            })?;
    }

    let tx = wallet.sign_transaction(tx).await?;

    let missing = missing_signers(&tx);
    if !missing.is_empty() {
        return Err(SubmitError::MissingSigner(missing.join(", ")));
    }

    debug!(
        fee_payer = %fee_payer,
        instructions = instructions.len(),
        ephemeral_signers = signers.ephemeral().len(),
        "Payload fully signed"
    );

    bincode::serialize(&tx).map_err(|e| SubmitError::Serialization(e.to_string()))
}

/// Required signer slots still holding a default signature
fn missing_signers(tx: &Transaction) -> Vec<String> {
    let required = tx.message.header.num_required_signatures as usize;
    tx.signatures
        .iter()
        .take(required)
        .enumerate()
        .filter(|(_, sig)| **sig == Signature::default())
        .map(|(i, _)| {
            tx.message
                .account_keys
                .get(i)
                .map(|k| k.to_string())
                .unwrap_or_else(|| format!("signer #{i}"))
        })
        .collect()
}
