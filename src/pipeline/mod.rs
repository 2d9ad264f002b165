//! Transaction submission pipeline
//!
//! One reusable path from an ordered instruction set to a confirmed or
//! failed outcome, shared by every operation in the crate:
//!
//! 1. **window**: snapshot the network reference state bounding how long
//!    a signed payload can land
//! 2. **signing**: ephemeral signers first (declaration order), then the
//!    external wallet capability
//! 3. **broadcast**: resend identical bytes on transient failures only,
//!    within the window
//! 4. **confirm**: poll to the required commitment level, with expiry
//!    detection and cooperative cancellation
//!
//! A submission is sequential; independent submissions may run
//! concurrently, each owning its attempt state exclusively.

// Public API - Error types
pub mod errors;
pub use errors::SubmitError;

mod broadcast;
mod confirm;
mod signing;
mod submit;
mod types;
mod window;

pub use confirm::CancelToken;
pub use submit::SubmitPipeline;
pub use types::{InstructionSet, Outcome, SignerSet, SubmissionAttempt, SubmitPolicy};
pub use window::{ExpiryTracker, ExpiryWindow};
