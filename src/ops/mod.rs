//! High-level wallet and token operations
//!
//! Each operation builds an instruction set, hands it to the submission
//! pipeline with the right signer set, and maps the terminal outcome
//! into a caller-facing result. Operations never talk to the network
//! except through the injected RPC and pipeline collaborators.

pub mod airdrop;
pub mod balance;
pub mod list;
pub mod mint;
pub mod token;
pub mod transfer;

use anyhow::Result;
use solana_sdk::signature::Signature;

use crate::pipeline::Outcome;

/// Unwrap a confirmed outcome, or fail with an operation-specific message
pub(crate) fn expect_confirmed(outcome: Outcome, what: &str) -> Result<Signature> {
    match outcome {
        Outcome::Confirmed(signature) => Ok(signature),
        Outcome::Expired => anyhow::bail!(
            "{} expired before confirmation; rebuild and resubmit",
            what
        ),
        Outcome::Rejected(reason) => anyhow::bail!("{} rejected: {}", what, reason),
        Outcome::Cancelled => anyhow::bail!("{} cancelled", what),
    }
}

/// Scale a whole-token amount into base units
pub(crate) fn scale_amount(amount: u64, decimals: u8) -> Result<u64> {
    let unit = 10u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| anyhow::anyhow!("Unsupported decimals: {}", decimals))?;
    amount
        .checked_mul(unit)
        .ok_or_else(|| anyhow::anyhow!("Amount {} overflows at {} decimals", amount, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(1, 0).unwrap(), 1);
        assert_eq!(scale_amount(1000, 9).unwrap(), 1_000_000_000_000);
        assert!(scale_amount(u64::MAX, 9).is_err());
        assert!(scale_amount(1, 20).is_err());
    }

    #[test]
    fn test_expect_confirmed_messages() {
        let sig = Signature::from([7u8; 64]);
        assert_eq!(
            expect_confirmed(Outcome::Confirmed(sig), "transfer").unwrap(),
            sig
        );

        let err = expect_confirmed(Outcome::Rejected("busted".to_string()), "transfer")
            .unwrap_err();
        assert!(err.to_string().contains("busted"));

        let err = expect_confirmed(Outcome::Expired, "mint creation").unwrap_err();
        assert!(err.to_string().contains("expired"));
    }
}
