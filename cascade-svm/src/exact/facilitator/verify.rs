//! Payment verification logic for the Solana exact scheme.
//!
//! Contains the per-instruction verifiers (compute budget, durable nonce,
//! deadline, fee-payer safety, direct transfer, CPI transfer) and the
//! orchestrator that sequences them into one pass/fail decision per
//! submitted transaction.
//!
//! Every function here is a pure, synchronous computation over immutable
//! inputs: the transaction bytes, the requirements, the facilitator key set,
//! and (for CPI-routed payments) a previously captured simulation. The
//! pipeline short-circuits on the first failure and never retries.

use cascade::timestamp::UnixTimestamp;
use solana_compute_budget_interface::ID as COMPUTE_BUDGET_PROGRAM;
use solana_pubkey::Pubkey;
use solana_transaction::versioned::VersionedTransaction;

use super::FacilitatorKeys;
use super::config::SolanaExactFacilitatorConfig;
use crate::exact::error::SolanaExactError;
use crate::exact::layout::InstructionLayout;
use crate::exact::types::{InstructionInt, SimulationOutcome, TransactionInt, decode_transaction};
use crate::exact::{
    ADVANCE_NONCE_OPCODE, ATA_PROGRAM_PUBKEY, CHECK_DEADLINE_DISCRIMINATOR,
    COMPUTE_UNIT_LIMIT_DISCRIMINATOR, COMPUTE_UNIT_PRICE_DISCRIMINATOR,
    DEADLINE_VALIDATOR_PROGRAM, NONCE_AUTHORITY_ACCOUNT_INDEX, SYSTEM_PROGRAM_PUBKEY,
    TRANSFER_CHECKED_DISCRIMINATOR,
};

/// Required fields for validating a transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequirement {
    /// Expected asset (mint) address.
    pub asset: Pubkey,
    /// Expected recipient owner address.
    pub pay_to: Pubkey,
    /// Minimum transfer amount in base units.
    pub amount: u64,
    /// Maximum allowed payment timeout in seconds, if the caller enforces
    /// one against an embedded deadline.
    pub max_timeout_seconds: Option<u64>,
}

/// Parsed SPL Token `TransferChecked` instruction fields.
#[derive(Debug, Clone, Copy)]
pub struct TransferCheckedInstruction {
    /// Transfer amount in token base units.
    pub amount: u64,
    /// Source token account.
    pub source: Pubkey,
    /// Token mint address.
    pub mint: Pubkey,
    /// Destination token account.
    pub destination: Pubkey,
    /// Authority (signer) of the transfer.
    pub authority: Pubkey,
    /// SPL Token program ID (Token or Token-2022).
    pub token_program: Pubkey,
}

/// Result of a successful transfer verification.
#[derive(Debug)]
pub struct VerifiedTransfer {
    /// The payer address, when statically determinable. CPI-routed payments
    /// verify without one.
    pub payer: Option<Pubkey>,
    /// The detected payment layout.
    pub layout: InstructionLayout,
    /// The verified transaction, ready for the signing collaborator.
    pub transaction: VersionedTransaction,
}

/// Verifies a `SetComputeUnitLimit` instruction and returns the unit limit.
///
/// # Errors
///
/// Returns [`SolanaExactError::InvalidComputeLimitInstruction`] if the
/// instruction targets the wrong program or the payload does not parse.
pub fn verify_compute_limit_instruction(
    instruction: &InstructionInt,
) -> Result<u32, SolanaExactError> {
    let data = instruction.data_slice();
    if instruction.program_id() != COMPUTE_BUDGET_PROGRAM
        || data.first().copied() != Some(COMPUTE_UNIT_LIMIT_DISCRIMINATOR)
        || data.len() != 5
    {
        return Err(SolanaExactError::InvalidComputeLimitInstruction);
    }

    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[1..5]);
    Ok(u32::from_le_bytes(buf))
}

/// Verifies a `SetComputeUnitPrice` instruction against the price ceiling.
///
/// # Errors
///
/// Returns [`SolanaExactError::InvalidComputePriceInstruction`] if the
/// payload does not parse, or [`SolanaExactError::ComputePriceTooHigh`] if
/// the price exceeds `max_compute_unit_price`.
pub fn verify_compute_price_instruction(
    max_compute_unit_price: u64,
    instruction: &InstructionInt,
) -> Result<(), SolanaExactError> {
    let data = instruction.data_slice();
    if instruction.program_id() != COMPUTE_BUDGET_PROGRAM
        || data.first().copied() != Some(COMPUTE_UNIT_PRICE_DISCRIMINATOR)
        || data.len() != 9
    {
        return Err(SolanaExactError::InvalidComputePriceInstruction);
    }

    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[1..9]);
    let micro_lamports = u64::from_le_bytes(buf);
    if micro_lamports > max_compute_unit_price {
        return Err(SolanaExactError::ComputePriceTooHigh);
    }
    Ok(())
}

/// Verifies an `AdvanceNonceAccount` instruction.
///
/// The layout detector accepted this slot on program identity alone; this
/// check validates the content and, critically, that the nonce authority is
/// not one of the facilitator's own keys. A facilitator-controlled nonce
/// authority could be tricked into invalidating or replaying transactions it
/// never meant to execute.
///
/// # Errors
///
/// Returns [`SolanaExactError`] if the instruction is malformed or names the
/// facilitator as the nonce authority.
pub fn verify_nonce_advance_instruction(
    instruction: &InstructionInt,
    keys: &FacilitatorKeys,
) -> Result<(), SolanaExactError> {
    if instruction.program_id() != SYSTEM_PROGRAM_PUBKEY {
        return Err(SolanaExactError::InvalidNonceAdvanceProgram);
    }

    let data = instruction.data_slice();
    if data.len() < 4 {
        return Err(SolanaExactError::InvalidNonceInstructionType);
    }
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[..4]);
    if u32::from_le_bytes(buf) != ADVANCE_NONCE_OPCODE {
        return Err(SolanaExactError::InvalidNonceInstructionType);
    }

    if instruction.account_count() <= NONCE_AUTHORITY_ACCOUNT_INDEX {
        return Err(SolanaExactError::InvalidNonceAccounts);
    }
    let authority = instruction
        .account(NONCE_AUTHORITY_ACCOUNT_INDEX)
        .map_err(|_| SolanaExactError::InvalidNonceAccounts)?;
    if keys.contains(&authority) {
        return Err(SolanaExactError::FeePayerIsNonceAuthority);
    }
    Ok(())
}

/// Verifies a deadline-validator `CheckDeadline` instruction.
///
/// Lateness is tolerated up to `clock_drift_tolerance_secs` (clock skew);
/// a deadline further in the future than `now + max_timeout_seconds` is
/// rejected so a client cannot declare an arbitrarily distant deadline and
/// escape the facilitator's risk window. Returns the decoded deadline.
///
/// # Errors
///
/// Returns [`SolanaExactError`] if the instruction is malformed or the
/// deadline violates either bound.
pub fn verify_deadline_instruction(
    instruction: &InstructionInt,
    max_timeout_seconds: Option<u64>,
    clock_drift_tolerance_secs: u32,
    now: UnixTimestamp,
) -> Result<i64, SolanaExactError> {
    if instruction.program_id() != DEADLINE_VALIDATOR_PROGRAM {
        return Err(SolanaExactError::InvalidDeadlineValidatorProgram);
    }

    let data = instruction.data_slice();
    if data.len() < 9 {
        return Err(SolanaExactError::InvalidDeadlineValidatorData);
    }
    if data[0] != CHECK_DEADLINE_DISCRIMINATOR {
        return Err(SolanaExactError::InvalidDeadlineInstructionType);
    }

    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[1..9]);
    let deadline = i64::from_le_bytes(buf);

    let now = now.as_signed_secs();
    if let Some(max_timeout) = max_timeout_seconds {
        let max_timeout = i64::try_from(max_timeout).unwrap_or(i64::MAX);
        if deadline > now.saturating_add(max_timeout) {
            return Err(SolanaExactError::DeadlineExceedsMaxTimeout);
        }
    }
    if deadline < now.saturating_sub(i64::from(clock_drift_tolerance_secs)) {
        return Err(SolanaExactError::DeadlinePassed);
    }
    Ok(deadline)
}

/// Verifies the facilitator's keys appear in no instruction's account list.
///
/// Scans the compiled (index-based) transaction. The two compute-budget
/// positions are skipped, since the facilitator legitimately signs as fee
/// payer at the message level; every other instruction is checked regardless
/// of account role. Legitimate payments never need the facilitator's
/// identity inside a transfer or CPI instruction, so any appearance is
/// treated as adversarial.
///
/// # Errors
///
/// Returns [`SolanaExactError::FeePayerInInstructionAccounts`] on any hit.
pub fn verify_fee_payer_absent(
    transaction: &TransactionInt,
    layout: &InstructionLayout,
    keys: &FacilitatorKeys,
) -> Result<(), SolanaExactError> {
    let slots = layout.slots();
    let message = &transaction.inner().message;
    let account_keys = message.static_account_keys();

    for (position, instruction) in message.instructions().iter().enumerate() {
        if position == slots.compute_limit || position == slots.compute_price {
            continue;
        }
        for account_index in &instruction.accounts {
            let account = account_keys
                .get(*account_index as usize)
                .ok_or(SolanaExactError::NoAccountAtIndex(*account_index as usize))?;
            if keys.contains(account) {
                return Err(SolanaExactError::FeePayerInInstructionAccounts);
            }
        }
    }
    Ok(())
}

/// Verifies a terminal SPL Token `TransferChecked` instruction statically.
///
/// # Errors
///
/// Returns [`SolanaExactError`] if the instruction does not parse, the
/// facilitator is the transfer authority, or the mint, amount, or
/// destination does not satisfy the requirement.
pub fn verify_direct_transfer(
    instruction: &InstructionInt,
    requirement: &TransferRequirement,
    keys: &FacilitatorKeys,
) -> Result<TransferCheckedInstruction, SolanaExactError> {
    let program_id = instruction.program_id();
    // Token and Token-2022 share the same instruction layout, so spl_token's
    // unpack covers both; only the program ID differs.
    let token_program = if program_id == spl_token::ID {
        spl_token::ID
    } else if program_id == spl_token_2022::ID {
        spl_token_2022::ID
    } else {
        return Err(SolanaExactError::InvalidTransferProgram);
    };

    let token_instruction = spl_token::instruction::TokenInstruction::unpack(
        instruction.data_slice(),
    )
    .map_err(|_| SolanaExactError::InvalidTransferInstruction)?;
    let spl_token::instruction::TokenInstruction::TransferChecked {
        amount,
        decimals: _,
    } = token_instruction
    else {
        return Err(SolanaExactError::InvalidTransferInstruction);
    };

    let resolve =
        |index: usize| instruction.account(index).map_err(|_| SolanaExactError::InvalidTransferInstruction);
    let transfer = TransferCheckedInstruction {
        amount,
        source: resolve(0)?,
        mint: resolve(1)?,
        destination: resolve(2)?,
        authority: resolve(3)?,
        token_program,
    };

    if keys.contains(&transfer.authority) {
        return Err(SolanaExactError::FeePayerIsTransferAuthority);
    }
    if transfer.mint != requirement.asset {
        return Err(SolanaExactError::MintMismatch);
    }
    if transfer.amount < requirement.amount {
        return Err(SolanaExactError::InsufficientAmount);
    }

    let (expected_destination, _) = Pubkey::find_program_address(
        &[
            requirement.pay_to.as_ref(),
            token_program.as_ref(),
            requirement.asset.as_ref(),
        ],
        &ATA_PROGRAM_PUBKEY,
    );
    if transfer.destination != expected_destination {
        return Err(SolanaExactError::DestinationMismatch);
    }

    Ok(transfer)
}

/// Verifies a CPI-routed transfer from a captured simulation trace.
///
/// Scans every inner instruction for exactly one `TransferChecked` payload
/// and checks its amount. Destination and authority are not re-derived here:
/// the enclosing program (e.g. a smart-wallet policy) enforces them, and the
/// simulation's success proves that enforcement ran. Returns the transferred
/// amount.
///
/// # Errors
///
/// Returns [`SolanaExactError`] if the simulation failed, captured no inner
/// instructions, contains zero or multiple transfers, or the one transfer's
/// amount is below the requirement.
pub fn verify_cpi_transfer(
    simulation: &SimulationOutcome,
    required_amount: u64,
) -> Result<u64, SolanaExactError> {
    if !simulation.success {
        let message = simulation
            .error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(SolanaExactError::SimulationFailed(message));
    }

    let groups = match simulation.inner_instructions.as_deref() {
        Some(groups) if !groups.is_empty() => groups,
        _ => return Err(SolanaExactError::NoInnerInstructions),
    };

    let mut transfer_amount: Option<u64> = None;
    for group in groups {
        for inner in &group.instructions {
            let data = inner.data.as_slice();
            if data.first().copied() != Some(TRANSFER_CHECKED_DISCRIMINATOR) || data.len() < 10 {
                continue;
            }
            if transfer_amount.is_some() {
                return Err(SolanaExactError::MultipleTransfersInCpi);
            }
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&data[1..9]);
            transfer_amount = Some(u64::from_le_bytes(buf));
        }
    }

    let amount = transfer_amount.ok_or(SolanaExactError::NoTransferInCpi)?;
    if amount < required_amount {
        return Err(SolanaExactError::InsufficientAmount);
    }
    Ok(amount)
}

/// Verifies a base64-encoded payment transaction against a requirement.
///
/// Runs the full pipeline: decode, layout detection, compute budget, nonce,
/// deadline, then the transfer check and fee-payer safety scan. The pipeline
/// is fail-closed: a CPI-routed layout without a supplied simulation is
/// invalid, never assumed good.
///
/// # Errors
///
/// Returns the first failing verifier's [`SolanaExactError`].
pub fn verify_transaction(
    transaction_b64: &str,
    requirement: &TransferRequirement,
    keys: &FacilitatorKeys,
    config: &SolanaExactFacilitatorConfig,
    simulation: Option<&SimulationOutcome>,
) -> Result<VerifiedTransfer, SolanaExactError> {
    verify_transaction_at(
        transaction_b64,
        requirement,
        keys,
        config,
        simulation,
        UnixTimestamp::now(),
    )
}

/// [`verify_transaction`] with an explicit clock, for deterministic callers.
///
/// # Errors
///
/// Returns the first failing verifier's [`SolanaExactError`].
pub fn verify_transaction_at(
    transaction_b64: &str,
    requirement: &TransferRequirement,
    keys: &FacilitatorKeys,
    config: &SolanaExactFacilitatorConfig,
    simulation: Option<&SimulationOutcome>,
    now: UnixTimestamp,
) -> Result<VerifiedTransfer, SolanaExactError> {
    let transaction = TransactionInt::new(decode_transaction(transaction_b64)?);

    let layout = InstructionLayout::detect(&transaction.program_ids())
        .ok_or(SolanaExactError::InvalidInstructionLayout)?;
    #[cfg(feature = "telemetry")]
    tracing::debug!(
        direct = layout.is_direct_transfer(),
        instructions = transaction.instruction_count(),
        "Detected payment layout"
    );
    let slots = *layout.slots();

    let compute_units =
        verify_compute_limit_instruction(&transaction.instruction(slots.compute_limit)?)?;
    verify_compute_price_instruction(
        config.max_compute_unit_price,
        &transaction.instruction(slots.compute_price)?,
    )?;
    #[cfg(feature = "telemetry")]
    tracing::debug!(compute_units = compute_units, "Verified compute budget");
    #[cfg(not(feature = "telemetry"))]
    let _ = compute_units;

    if let Some(index) = slots.nonce_advance {
        verify_nonce_advance_instruction(&transaction.instruction(index)?, keys)?;
    }

    if let Some(index) = slots.deadline_check {
        verify_deadline_instruction(
            &transaction.instruction(index)?,
            requirement.max_timeout_seconds,
            config.deadline_clock_drift_tolerance_secs,
            now,
        )?;
    }

    // The direct-transfer check runs before the blanket fee-payer scan so
    // that a facilitator key in the authority slot reports as a transfer
    // authority violation rather than a generic account hit.
    let payer = match &layout {
        InstructionLayout::Direct(_) => {
            let transfer = verify_direct_transfer(
                &transaction.instruction(slots.transfer)?,
                requirement,
                keys,
            )?;
            verify_fee_payer_absent(&transaction, &layout, keys)?;
            Some(transfer.authority)
        }
        InstructionLayout::CpiRouted(_) => {
            verify_fee_payer_absent(&transaction, &layout, keys)?;
            let simulation = simulation.ok_or(SolanaExactError::SimulationRequiredForCpi)?;
            verify_cpi_transfer(simulation, requirement.amount)?;
            None
        }
    };

    Ok(VerifiedTransfer {
        payer,
        layout,
        transaction: transaction.into_inner(),
    })
}
