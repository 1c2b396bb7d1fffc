//! Type definitions for the Solana "exact" payment scheme.
//!
//! This module defines the wire payload carried inside a Cascade payment,
//! wrappers over the decoded transaction, and the shape of the execution
//! simulation consumed by CPI transfer verification.

use cascade::encoding::Base64Bytes;
use serde::{Deserialize, Serialize};
use solana_message::compiled_instruction::CompiledInstruction;
use solana_pubkey::Pubkey;
use solana_transaction::versioned::VersionedTransaction;

use crate::chain::Address;
use crate::exact::error::SolanaExactError;

/// Solana exact payment payload containing a serialized transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactSolanaPayload {
    /// Base64-encoded serialized Solana transaction.
    pub transaction: String,
}

/// Scheme-specific `extra` fields carried in Solana payment requirements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SolanaPaymentExtra {
    /// The facilitator fee-payer address declared to clients.
    pub fee_payer: Address,
}

/// Decodes a base64-encoded serialized transaction.
///
/// # Errors
///
/// Returns [`SolanaExactError::TransactionDecoding`] if the string is not
/// valid base64 or the bytes do not deserialize as a versioned transaction.
pub fn decode_transaction(transaction_b64: &str) -> Result<VersionedTransaction, SolanaExactError> {
    let bytes = Base64Bytes::from(transaction_b64)
        .decode()
        .map_err(|e| SolanaExactError::TransactionDecoding(e.to_string()))?;
    bincode::deserialize::<VersionedTransaction>(bytes.as_slice())
        .map_err(|e| SolanaExactError::TransactionDecoding(e.to_string()))
}

/// Wrapper around a versioned Solana transaction with helper methods.
///
/// Holds the compiled (index-based) form; [`TransactionInt::instruction`]
/// resolves one instruction's account indices to addresses on demand.
#[derive(Debug)]
pub struct TransactionInt {
    inner: VersionedTransaction,
}

impl TransactionInt {
    /// Creates a new transaction wrapper.
    #[must_use]
    pub const fn new(transaction: VersionedTransaction) -> Self {
        Self { inner: transaction }
    }

    /// Returns the inner transaction.
    #[must_use]
    pub const fn inner(&self) -> &VersionedTransaction {
        &self.inner
    }

    /// Consumes the wrapper and returns the inner transaction.
    #[must_use]
    pub fn into_inner(self) -> VersionedTransaction {
        self.inner
    }

    /// Returns the number of top-level instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.inner.message.instructions().len()
    }

    /// Returns the program ID of every top-level instruction, in order.
    ///
    /// This is the decompiled view the layout detector classifies; it never
    /// looks at instruction data.
    #[must_use]
    pub fn program_ids(&self) -> Vec<Pubkey> {
        let account_keys = self.inner.message.static_account_keys();
        self.inner
            .message
            .instructions()
            .iter()
            .map(|instruction| *instruction.program_id(account_keys))
            .collect()
    }

    /// Returns the instruction at the given index with resolved accounts.
    ///
    /// # Errors
    ///
    /// Returns [`SolanaExactError::NoInstructionAtIndex`] if the index is out
    /// of bounds.
    pub fn instruction(&self, index: usize) -> Result<InstructionInt, SolanaExactError> {
        let instruction = self
            .inner
            .message
            .instructions()
            .get(index)
            .cloned()
            .ok_or(SolanaExactError::NoInstructionAtIndex(index))?;
        let account_keys = self.inner.message.static_account_keys().to_vec();

        Ok(InstructionInt {
            index,
            instruction,
            account_keys,
        })
    }
}

/// Parsed instruction with its index and resolved account keys.
#[derive(Debug)]
pub struct InstructionInt {
    index: usize,
    instruction: CompiledInstruction,
    account_keys: Vec<Pubkey>,
}

impl InstructionInt {
    /// Returns the instruction's position in the transaction.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the instruction data as a slice.
    #[must_use]
    pub const fn data_slice(&self) -> &[u8] {
        self.instruction.data.as_slice()
    }

    /// Returns the number of accounts the instruction references.
    #[must_use]
    pub const fn account_count(&self) -> usize {
        self.instruction.accounts.len()
    }

    /// Returns the program ID of the instruction.
    #[must_use]
    pub fn program_id(&self) -> Pubkey {
        *self.instruction.program_id(self.account_keys.as_slice())
    }

    /// Returns the account public key at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`SolanaExactError::NoAccountAtIndex`] if the index is out of
    /// bounds in either the instruction's account list or the message's
    /// account keys.
    pub fn account(&self, index: usize) -> Result<Pubkey, SolanaExactError> {
        let account_index = self
            .instruction
            .accounts
            .get(index)
            .copied()
            .ok_or(SolanaExactError::NoAccountAtIndex(index))?;
        let pubkey = self
            .account_keys
            .get(account_index as usize)
            .copied()
            .ok_or(SolanaExactError::NoAccountAtIndex(index))?;
        Ok(pubkey)
    }
}

/// Outcome of a transaction execution simulation.
///
/// Produced by the RPC collaborator (with inner-instruction capture enabled)
/// strictly before verification runs. The exact scheme consumes only this
/// shape; it never triggers a simulation itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    /// Whether the simulated execution succeeded.
    pub success: bool,
    /// Error string reported by the runtime, if execution failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Program log lines, if captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
    /// Compute units consumed, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_consumed: Option<u64>,
    /// Instructions invoked via CPI, grouped by the top-level instruction
    /// that triggered them. `None` when capture was not enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_instructions: Option<Vec<InnerInstructionGroup>>,
}

/// Instructions invoked via CPI by one top-level instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerInstructionGroup {
    /// Index of the originating top-level instruction.
    pub index: u8,
    /// The invoked instructions, in execution order.
    pub instructions: Vec<InnerInstruction>,
}

/// A single instruction captured from a CPI trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerInstruction {
    /// The invoked program.
    pub program_id: Address,
    /// Referenced account addresses.
    #[serde(default)]
    pub accounts: Vec<Address>,
    /// Instruction data, base58-encoded on the wire as the RPC reports it.
    #[serde(with = "base58_bytes")]
    pub data: Vec<u8>,
}

/// Serde adapter for base58-encoded byte payloads.
mod base58_bytes {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&bs58::encode(bytes).into_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        bs58::decode(&s).into_vec().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_transaction_rejects_bad_base64() {
        let err = decode_transaction("@@not-base64@@").unwrap_err();
        assert!(matches!(err, SolanaExactError::TransactionDecoding(_)));
    }

    #[test]
    fn test_decode_transaction_rejects_bad_bytes() {
        let b64 = Base64Bytes::encode(b"junk that is not a transaction").to_string();
        let err = decode_transaction(&b64).unwrap_err();
        assert!(matches!(err, SolanaExactError::TransactionDecoding(_)));
    }

    #[test]
    fn test_simulation_outcome_deserializes_with_base58_data() {
        let program = Pubkey::new_unique();
        let json = format!(
            r#"{{
                "success": true,
                "unitsConsumed": 3200,
                "innerInstructions": [{{
                    "index": 2,
                    "instructions": [{{
                        "programId": "{program}",
                        "accounts": [],
                        "data": "{}"
                    }}]
                }}]
            }}"#,
            bs58::encode([12u8, 1, 2, 3]).into_string(),
        );
        let outcome: SimulationOutcome = serde_json::from_str(&json).unwrap();
        let groups = outcome.inner_instructions.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].index, 2);
        assert_eq!(groups[0].instructions[0].data, vec![12, 1, 2, 3]);
        assert_eq!(*groups[0].instructions[0].program_id.pubkey(), program);
    }

    #[test]
    fn test_payment_extra_uses_camel_case() {
        let fee_payer = Pubkey::new_unique();
        let extra = SolanaPaymentExtra {
            fee_payer: Address::new(fee_payer),
        };
        let json = serde_json::to_value(extra).unwrap();
        assert_eq!(json["feePayer"], fee_payer.to_string());
        let back: SolanaPaymentExtra = serde_json::from_value(json).unwrap();
        assert_eq!(back, extra);
    }

    #[test]
    fn test_inner_instruction_data_roundtrip() {
        let instruction = InnerInstruction {
            program_id: Address::new(Pubkey::new_unique()),
            accounts: vec![Address::new(Pubkey::new_unique())],
            data: vec![12, 0, 0, 0, 0, 0, 0, 0, 16, 6],
        };
        let json = serde_json::to_string(&instruction).unwrap();
        let back: InnerInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, instruction.data);
    }
}
