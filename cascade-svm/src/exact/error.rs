//! Error types for the Solana "exact" payment scheme.
//!
//! Every verification failure is a [`SolanaExactError`]. `Display` carries a
//! human-readable message; [`SolanaExactError::reason`] returns the stable
//! machine-readable code that goes on the wire as `invalidReason`. The code
//! vocabulary is closed (API consumers match on these strings), so codes
//! never carry dynamic content except the simulation failure message, which
//! is interpolated by contract.

/// Errors specific to Solana exact scheme verification.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SolanaExactError {
    /// Transaction could not be deserialized.
    #[error("Can not decode transaction: {0}")]
    TransactionDecoding(String),
    /// The instruction sequence does not match any known payment layout.
    #[error("Instruction sequence does not match a payment layout")]
    InvalidInstructionLayout,
    /// Compute limit instruction could not be parsed.
    #[error("Invalid compute limit instruction")]
    InvalidComputeLimitInstruction,
    /// Compute price instruction could not be parsed.
    #[error("Invalid compute price instruction")]
    InvalidComputePriceInstruction,
    /// Compute unit price exceeds the facilitator ceiling.
    #[error("Compute unit price exceeds facilitator maximum")]
    ComputePriceTooHigh,
    /// Deadline instruction targets the wrong program.
    #[error("Deadline instruction targets the wrong program")]
    InvalidDeadlineValidatorProgram,
    /// Deadline instruction data is too short.
    #[error("Deadline instruction data is malformed")]
    InvalidDeadlineValidatorData,
    /// Deadline instruction is not a clock check.
    #[error("Deadline instruction is not a clock check")]
    InvalidDeadlineInstructionType,
    /// Declared deadline lies beyond the allowed timeout window.
    #[error("Deadline exceeds the maximum allowed timeout")]
    DeadlineExceedsMaxTimeout,
    /// Declared deadline is already in the past.
    #[error("Deadline has already passed")]
    DeadlinePassed,
    /// Nonce advance instruction targets the wrong program.
    #[error("Nonce advance instruction targets the wrong program")]
    InvalidNonceAdvanceProgram,
    /// Nonce advance instruction data is not an advance opcode.
    #[error("Nonce instruction is not an advance")]
    InvalidNonceInstructionType,
    /// Nonce advance instruction references too few accounts.
    #[error("Nonce advance instruction references too few accounts")]
    InvalidNonceAccounts,
    /// The facilitator fee payer is named as the nonce authority.
    #[error("Fee payer is the nonce authority")]
    FeePayerIsNonceAuthority,
    /// The facilitator fee payer appears in a non-compute-budget
    /// instruction's accounts.
    #[error("Fee payer included in instruction accounts")]
    FeePayerInInstructionAccounts,
    /// Transfer instruction targets neither Token nor Token-2022.
    #[error("Transfer instruction targets the wrong program")]
    InvalidTransferProgram,
    /// Transfer instruction could not be parsed as `TransferChecked`.
    #[error("Invalid token transfer instruction")]
    InvalidTransferInstruction,
    /// The facilitator fee payer is the transfer authority.
    #[error("Fee payer found transferring funds")]
    FeePayerIsTransferAuthority,
    /// Transfer mint does not match the required asset.
    #[error("Transfer mint does not match the required asset")]
    MintMismatch,
    /// Transfer amount is below the required amount.
    #[error("Transfer amount is below the required amount")]
    InsufficientAmount,
    /// Transfer destination is not the recipient's token account.
    #[error("Transfer destination is not the recipient's token account")]
    DestinationMismatch,
    /// A CPI-routed payment arrived without a simulation result.
    #[error("A simulation result is required to verify a CPI transfer")]
    SimulationRequiredForCpi,
    /// The execution simulation reported a failure.
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),
    /// The simulation captured no inner instructions.
    #[error("Simulation captured no inner instructions")]
    NoInnerInstructions,
    /// No transfer instruction was found in the CPI trace.
    #[error("No transfer found in CPI trace")]
    NoTransferInCpi,
    /// More than one transfer instruction was found in the CPI trace.
    #[error("Multiple transfers found in CPI trace")]
    MultipleTransfersInCpi,
    /// No instruction found at the given index.
    #[error("Instruction at index {0} not found")]
    NoInstructionAtIndex(usize),
    /// No account found at the given index.
    #[error("No account at index {0}")]
    NoAccountAtIndex(usize),
}

impl SolanaExactError {
    /// Returns the stable machine-readable reason code for this failure.
    ///
    /// These strings are the wire-level `invalidReason` vocabulary. Only
    /// `simulation_failed` interpolates a message, by contract.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::TransactionDecoding(_) => "invalid_transaction_encoding".to_string(),
            Self::InvalidInstructionLayout
            | Self::NoInstructionAtIndex(_)
            | Self::NoAccountAtIndex(_) => "invalid_instruction_layout".to_string(),
            Self::InvalidComputeLimitInstruction => {
                "invalid_compute_limit_instruction".to_string()
            }
            Self::InvalidComputePriceInstruction => {
                "invalid_compute_price_instruction".to_string()
            }
            Self::ComputePriceTooHigh => "compute_price_too_high".to_string(),
            Self::InvalidDeadlineValidatorProgram => {
                "invalid_deadline_validator_program".to_string()
            }
            Self::InvalidDeadlineValidatorData => "invalid_deadline_validator_data".to_string(),
            Self::InvalidDeadlineInstructionType => "invalid_deadline_instruction_type".to_string(),
            Self::DeadlineExceedsMaxTimeout => "deadline_exceeds_max_timeout".to_string(),
            Self::DeadlinePassed => "deadline_already_passed".to_string(),
            Self::InvalidNonceAdvanceProgram => "invalid_nonce_advance_program".to_string(),
            Self::InvalidNonceInstructionType => "invalid_nonce_instruction_type".to_string(),
            Self::InvalidNonceAccounts => "invalid_nonce_accounts".to_string(),
            Self::FeePayerIsNonceAuthority => "fee_payer_is_nonce_authority".to_string(),
            Self::FeePayerInInstructionAccounts => {
                "fee_payer_in_instruction_accounts".to_string()
            }
            Self::InvalidTransferProgram => "invalid_transfer_program".to_string(),
            Self::InvalidTransferInstruction => "invalid_transfer_instruction".to_string(),
            Self::FeePayerIsTransferAuthority => "fee_payer_is_transfer_authority".to_string(),
            Self::MintMismatch => "mint_mismatch".to_string(),
            Self::InsufficientAmount => "insufficient_amount".to_string(),
            Self::DestinationMismatch => "destination_mismatch".to_string(),
            Self::SimulationRequiredForCpi => "simulation_required_for_cpi".to_string(),
            Self::SimulationFailed(message) => format!("simulation_failed: {message}"),
            Self::NoInnerInstructions => "no_inner_instructions".to_string(),
            Self::NoTransferInCpi => "no_transfer_in_cpi".to_string(),
            Self::MultipleTransfersInCpi => "multiple_transfers_in_cpi".to_string(),
        }
    }
}
