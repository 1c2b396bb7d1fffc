//! Instruction layout detection for payment transactions.
//!
//! A payment transaction is a short, fixed-grammar instruction sequence. The
//! detector classifies an ordered list of instruction *programs* into one of
//! the known shapes, or rejects it. It is a pure shape classifier: it never
//! inspects instruction data and never validates content. The
//! per-instruction verifiers in [`super::facilitator`] do that afterwards,
//! using the indices recorded here.
//!
//! The grammar, in order:
//!
//! ```text
//! [AdvanceNonceAccount]?  SetComputeUnitLimit  SetComputeUnitPrice
//! [CheckDeadline]?  [CreateAssociatedTokenAccount]?  <payment>
//! ```
//!
//! where `<payment>` is the final instruction: an SPL Token program means a
//! direct transfer, any other program means the transfer happens inside that
//! program's invocation (CPI-routed, e.g. a smart-wallet policy call).

use solana_compute_budget_interface::ID as COMPUTE_BUDGET_PROGRAM;
use solana_pubkey::Pubkey;

use crate::exact::{ATA_PROGRAM_PUBKEY, DEADLINE_VALIDATOR_PROGRAM, SYSTEM_PROGRAM_PUBKEY};

/// Instruction positions recorded by layout detection.
///
/// Indices are positions in the transaction's top-level instruction list. A
/// populated `LayoutSlots` always satisfies `compute_limit + 1 ==
/// compute_price` and `transfer == count - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSlots {
    /// Position of the durable-nonce advance, when present (always 0).
    pub nonce_advance: Option<usize>,
    /// Position of the `SetComputeUnitLimit` instruction.
    pub compute_limit: usize,
    /// Position of the `SetComputeUnitPrice` instruction.
    pub compute_price: usize,
    /// Position of the deadline check, when present.
    pub deadline_check: Option<usize>,
    /// Position of the associated-token-account creation, when present.
    pub ata_create: Option<usize>,
    /// Position of the terminal payment instruction.
    pub transfer: usize,
}

/// A recognized payment transaction shape.
///
/// Either the terminal instruction is itself an SPL token transfer
/// ([`InstructionLayout::Direct`]), or it invokes another program that is
/// expected to perform the transfer via CPI
/// ([`InstructionLayout::CpiRouted`]). There is no partially-valid state: a
/// sequence either classifies fully or [`InstructionLayout::detect`] returns
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionLayout {
    /// Terminal instruction is an SPL Token / Token-2022 transfer.
    Direct(LayoutSlots),
    /// Terminal instruction invokes another program; the transfer is nested.
    CpiRouted(LayoutSlots),
}

impl InstructionLayout {
    /// Classifies an ordered list of instruction programs.
    ///
    /// Returns `None` for any sequence outside the grammar: fewer than 3 or
    /// more than 6 instructions, a missing compute-budget pair, or any
    /// instruction left unaccounted for between the compute-budget pair and
    /// the terminal payment.
    #[must_use]
    pub fn detect(program_ids: &[Pubkey]) -> Option<Self> {
        let count = program_ids.len();
        if !(3..=6).contains(&count) {
            return None;
        }

        let mut cursor = 0;
        // Positional heuristic only; the nonce verifier checks content later.
        let nonce_advance = if program_ids[0] == SYSTEM_PROGRAM_PUBKEY {
            cursor = 1;
            Some(0)
        } else {
            None
        };

        if program_ids.get(cursor) != Some(&COMPUTE_BUDGET_PROGRAM)
            || program_ids.get(cursor + 1) != Some(&COMPUTE_BUDGET_PROGRAM)
        {
            return None;
        }
        let compute_limit = cursor;
        let compute_price = cursor + 1;
        cursor += 2;

        let last = count - 1;
        let mut deadline_check = None;
        if cursor < last && program_ids[cursor] == DEADLINE_VALIDATOR_PROGRAM {
            deadline_check = Some(cursor);
            cursor += 1;
        }

        let mut ata_create = None;
        if cursor < last && program_ids[cursor] == ATA_PROGRAM_PUBKEY {
            ata_create = Some(cursor);
            cursor += 1;
        }

        // Every instruction must be accounted for; anything unclassified
        // between the cursor and the terminal payment rejects the sequence.
        if cursor != last {
            return None;
        }

        let slots = LayoutSlots {
            nonce_advance,
            compute_limit,
            compute_price,
            deadline_check,
            ata_create,
            transfer: last,
        };

        let terminal = program_ids[last];
        if terminal == spl_token::ID || terminal == spl_token_2022::ID {
            Some(Self::Direct(slots))
        } else {
            Some(Self::CpiRouted(slots))
        }
    }

    /// Returns the recorded instruction positions.
    #[must_use]
    pub const fn slots(&self) -> &LayoutSlots {
        match self {
            Self::Direct(slots) | Self::CpiRouted(slots) => slots,
        }
    }

    /// Returns `true` if the terminal instruction is a direct token transfer.
    #[must_use]
    pub const fn is_direct_transfer(&self) -> bool {
        matches!(self, Self::Direct(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpi_program() -> Pubkey {
        // Stand-in for a smart-wallet policy program.
        Pubkey::new_unique()
    }

    #[test]
    fn test_minimal_direct_layout() {
        let programs = [COMPUTE_BUDGET_PROGRAM, COMPUTE_BUDGET_PROGRAM, spl_token::ID];
        let layout = InstructionLayout::detect(&programs).unwrap();
        assert!(layout.is_direct_transfer());
        let slots = layout.slots();
        assert_eq!(slots.nonce_advance, None);
        assert_eq!(slots.compute_limit, 0);
        assert_eq!(slots.compute_price, 1);
        assert_eq!(slots.deadline_check, None);
        assert_eq!(slots.ata_create, None);
        assert_eq!(slots.transfer, 2);
    }

    #[test]
    fn test_token_2022_terminal_is_direct() {
        let programs = [
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            spl_token_2022::ID,
        ];
        let layout = InstructionLayout::detect(&programs).unwrap();
        assert!(layout.is_direct_transfer());
    }

    #[test]
    fn test_unknown_terminal_is_cpi_routed() {
        let programs = [COMPUTE_BUDGET_PROGRAM, COMPUTE_BUDGET_PROGRAM, cpi_program()];
        let layout = InstructionLayout::detect(&programs).unwrap();
        assert!(!layout.is_direct_transfer());
        assert!(matches!(layout, InstructionLayout::CpiRouted(_)));
    }

    #[test]
    fn test_nonce_prefix_shifts_everything() {
        let programs = [
            SYSTEM_PROGRAM_PUBKEY,
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            spl_token::ID,
        ];
        let slots = *InstructionLayout::detect(&programs).unwrap().slots();
        assert_eq!(slots.nonce_advance, Some(0));
        assert_eq!(slots.compute_limit, 1);
        assert_eq!(slots.compute_price, 2);
        assert_eq!(slots.transfer, 3);
    }

    #[test]
    fn test_full_six_instruction_layout() {
        let programs = [
            SYSTEM_PROGRAM_PUBKEY,
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            DEADLINE_VALIDATOR_PROGRAM,
            ATA_PROGRAM_PUBKEY,
            spl_token::ID,
        ];
        let slots = *InstructionLayout::detect(&programs).unwrap().slots();
        assert_eq!(slots.nonce_advance, Some(0));
        assert_eq!(slots.compute_limit, 1);
        assert_eq!(slots.compute_price, 2);
        assert_eq!(slots.deadline_check, Some(3));
        assert_eq!(slots.ata_create, Some(4));
        assert_eq!(slots.transfer, 5);
    }

    #[test]
    fn test_deadline_without_nonce() {
        let programs = [
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            DEADLINE_VALIDATOR_PROGRAM,
            cpi_program(),
        ];
        let slots = *InstructionLayout::detect(&programs).unwrap().slots();
        assert_eq!(slots.deadline_check, Some(2));
        assert_eq!(slots.transfer, 3);
    }

    #[test]
    fn test_ata_create_without_deadline() {
        let programs = [
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            ATA_PROGRAM_PUBKEY,
            spl_token::ID,
        ];
        let slots = *InstructionLayout::detect(&programs).unwrap().slots();
        assert_eq!(slots.deadline_check, None);
        assert_eq!(slots.ata_create, Some(2));
    }

    #[test]
    fn test_rejects_too_short_and_too_long() {
        assert!(InstructionLayout::detect(&[]).is_none());
        assert!(
            InstructionLayout::detect(&[COMPUTE_BUDGET_PROGRAM, COMPUTE_BUDGET_PROGRAM]).is_none()
        );
        let seven = [
            SYSTEM_PROGRAM_PUBKEY,
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            DEADLINE_VALIDATOR_PROGRAM,
            ATA_PROGRAM_PUBKEY,
            cpi_program(),
            spl_token::ID,
        ];
        assert!(InstructionLayout::detect(&seven).is_none());
    }

    #[test]
    fn test_rejects_missing_compute_budget_pair() {
        let programs = [COMPUTE_BUDGET_PROGRAM, spl_token::ID, spl_token::ID];
        assert!(InstructionLayout::detect(&programs).is_none());
        let programs = [cpi_program(), COMPUTE_BUDGET_PROGRAM, spl_token::ID];
        assert!(InstructionLayout::detect(&programs).is_none());
    }

    #[test]
    fn test_rejects_nonce_followed_by_single_compute_budget() {
        // With a nonce prefix, three instructions leave no room for the
        // compute-budget pair plus a payment.
        let programs = [SYSTEM_PROGRAM_PUBKEY, COMPUTE_BUDGET_PROGRAM, spl_token::ID];
        assert!(InstructionLayout::detect(&programs).is_none());
        let programs = [
            SYSTEM_PROGRAM_PUBKEY,
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
        ];
        assert!(InstructionLayout::detect(&programs).is_none());
    }

    #[test]
    fn test_rejects_unclassified_middle_instruction() {
        let programs = [
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            cpi_program(),
            spl_token::ID,
        ];
        assert!(InstructionLayout::detect(&programs).is_none());
    }

    #[test]
    fn test_rejects_deadline_after_ata() {
        // Grammar order is deadline first, then ATA creation.
        let programs = [
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            ATA_PROGRAM_PUBKEY,
            DEADLINE_VALIDATOR_PROGRAM,
            spl_token::ID,
        ];
        assert!(InstructionLayout::detect(&programs).is_none());
    }

    #[test]
    fn test_terminal_deadline_program_is_cpi_not_deadline_slot() {
        // A deadline-validator program in terminal position is not consumed
        // as a deadline slot (the optional slots never take the last index);
        // it classifies as the payment instruction instead.
        let programs = [
            COMPUTE_BUDGET_PROGRAM,
            COMPUTE_BUDGET_PROGRAM,
            DEADLINE_VALIDATOR_PROGRAM,
        ];
        let layout = InstructionLayout::detect(&programs).unwrap();
        assert!(!layout.is_direct_transfer());
        assert_eq!(layout.slots().deadline_check, None);
    }
}
