//! solmint - Solana wallet and SPL token toolkit
//!
//! Everything transactional in this crate flows through a single
//! [`pipeline::SubmitPipeline`]: acquire an expiry window, sign
//! (ephemeral keypairs first, then the wallet capability), broadcast
//! identical bytes with bounded retry, and poll for confirmation. The
//! operations in [`ops`] are pure callers of that pipeline: SOL
//! transfer, airdrop, mint creation, token minting, metadata-tagged
//! token creation, and token listing.
//!
//! The RPC endpoint and the wallet are injected capabilities
//! ([`rpc::NetworkRpc`], [`rpc::QueryRpc`], [`wallet::WalletSigner`]);
//! there is no process-wide endpoint or signer state.

pub mod config;
pub mod metadata;
pub mod observability;
pub mod ops;
pub mod pipeline;
pub mod rpc;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{
    CancelToken, InstructionSet, Outcome, SignerSet, SubmitError, SubmitPipeline, SubmitPolicy,
};
pub use rpc::{NetworkRpc, QueryRpc, SolanaRpc};
pub use wallet::{LocalWallet, WalletSigner};
