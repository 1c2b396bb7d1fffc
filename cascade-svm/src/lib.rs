#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Solana payment verification for the Cascade protocol.
//!
//! This crate implements the "exact" payment scheme for Solana. A client
//! submits a pre-built, partially signed transaction paying SPL tokens; the
//! facilitator verifies, without settling, that the transaction pays at
//! least the required amount of the required mint to the required
//! destination, and that the facilitator's own fee-paying key cannot be
//! abused as a transfer authority, a nonce authority, or a hidden
//! instruction participant. Only then does the signing collaborator attach
//! the fee-payer signature.
//!
//! # Architecture
//!
//! - [`chain`] - Core Solana chain types (addresses, network references,
//!   token deployments)
//! - [`exact`] - The "exact" scheme: instruction layout detection,
//!   per-instruction verifiers, and the verification orchestrator
//!
//! # Transaction Structure
//!
//! A payment transaction is 3-6 instructions in a fixed grammar:
//!
//! - Optional: `AdvanceNonceAccount` (durable-nonce payments)
//! - `SetComputeUnitLimit` then `SetComputeUnitPrice` (always, in order)
//! - Optional: a deadline check against the Cascade deadline-validator
//!   program
//! - Optional: an associated-token-account creation
//! - Terminal: the payment itself, either an SPL `TransferChecked`
//!   (verified statically) or a smart-wallet invocation whose inner
//!   transfer is verified from a prior execution simulation
//!
//! # Feature Flags
//!
//! - `telemetry` - tracing instrumentation at verification milestones

pub mod chain;
pub mod exact;

mod networks;
pub use networks::*;

pub use exact::SolanaExact;
pub use exact::facilitator::{FacilitatorKeys, SolanaExactFacilitator};
