//! Solana "exact" payment scheme implementation.
//!
//! This module implements the "exact" payment scheme for Solana. The payment
//! is an SPL Token `TransferChecked`, either as the transaction's terminal
//! instruction (verified statically) or nested inside a smart-wallet
//! invocation (verified from a prior execution simulation).
//!
//! # Features
//!
//! - SPL Token and Token-2022 program support
//! - Instruction layout detection over the full payment grammar
//!   (durable nonce, compute budget, deadline check, ATA creation, transfer)
//! - Compute budget instruction validation with a priority-fee ceiling
//! - Fee payer safety checks against confused-deputy use of the
//!   facilitator's key
//! - CPI transfer verification from captured inner instructions

use cascade::scheme::{ExactScheme, SchemeId};
use solana_pubkey::{Pubkey, pubkey};

pub mod error;
pub use error::*;

pub mod layout;
pub use layout::InstructionLayout;

pub mod types;
pub use types::*;

pub mod facilitator;

/// Associated Token Account program public key.
pub const ATA_PROGRAM_PUBKEY: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// System program public key (owns durable nonce accounts).
pub const SYSTEM_PROGRAM_PUBKEY: Pubkey = pubkey!("11111111111111111111111111111111");

/// Cascade deadline-validator program public key.
///
/// On-chain program that aborts the transaction if the cluster clock has
/// passed the deadline embedded in its instruction data.
pub const DEADLINE_VALIDATOR_PROGRAM: Pubkey =
    pubkey!("HGCS6Pe6UPwH1dmKwVD11Ay8EPz56rF7kf5bEhgafGjo");

/// `SetComputeUnitLimit` instruction discriminator.
pub const COMPUTE_UNIT_LIMIT_DISCRIMINATOR: u8 = 2;

/// `SetComputeUnitPrice` instruction discriminator.
pub const COMPUTE_UNIT_PRICE_DISCRIMINATOR: u8 = 3;

/// `AdvanceNonceAccount` opcode (system instruction enum index, LE u32).
pub const ADVANCE_NONCE_OPCODE: u32 = 4;

/// Index of the nonce authority in an `AdvanceNonceAccount` account list.
pub const NONCE_AUTHORITY_ACCOUNT_INDEX: usize = 2;

/// Deadline-validator `CheckDeadline` instruction discriminator.
pub const CHECK_DEADLINE_DISCRIMINATOR: u8 = 0;

/// SPL Token `TransferChecked` instruction discriminator.
pub const TRANSFER_CHECKED_DISCRIMINATOR: u8 = 12;

/// Solana exact scheme identifier.
#[derive(Debug, Clone, Copy)]
pub struct SolanaExact;

impl SchemeId for SolanaExact {
    fn namespace(&self) -> &'static str {
        "solana"
    }

    fn scheme(&self) -> &str {
        ExactScheme.as_ref()
    }
}
