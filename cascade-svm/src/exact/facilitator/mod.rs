//! Facilitator-side payment verification for the Solana exact scheme.
//!
//! [`SolanaExactFacilitator`] is the trust boundary between a
//! client-submitted transaction and the facilitator key that will co-sign
//! it. It owns no I/O: the HTTP layer hands it the verify request, the
//! key-management collaborator supplies the facilitator's addresses at
//! construction, and the RPC collaborator supplies a prior simulation (with
//! inner-instruction capture enabled) when the payment routes through a
//! smart-wallet invocation.

mod config;
mod verify;

use std::collections::HashSet;

pub use config::SolanaExactFacilitatorConfig;
pub use verify::{
    TransferCheckedInstruction, TransferRequirement, VerifiedTransfer,
    verify_compute_limit_instruction, verify_compute_price_instruction, verify_cpi_transfer,
    verify_deadline_instruction, verify_direct_transfer, verify_fee_payer_absent,
    verify_nonce_advance_instruction, verify_transaction, verify_transaction_at,
};

use cascade::facilitator::{Facilitator, FacilitatorError};
use cascade::proto;
use cascade::scheme::ExactScheme;
use solana_pubkey::Pubkey;

use crate::exact::types::{ExactSolanaPayload, SimulationOutcome};

/// The set of facilitator-controlled addresses.
///
/// Supplied by the signer/key-management collaborator. Verification only
/// compares against it; the keys themselves never enter this crate.
#[derive(Debug, Clone, Default)]
pub struct FacilitatorKeys(HashSet<Pubkey>);

impl FacilitatorKeys {
    /// Creates a key set from the signer collaborator's addresses.
    #[must_use]
    pub fn new<I: IntoIterator<Item = Pubkey>>(addresses: I) -> Self {
        Self(addresses.into_iter().collect())
    }

    /// Returns `true` if the address is facilitator-controlled.
    #[must_use]
    pub fn contains(&self, address: &Pubkey) -> bool {
        self.0.contains(address)
    }

    /// Returns the number of addresses in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Pubkey> for FacilitatorKeys {
    fn from_iter<I: IntoIterator<Item = Pubkey>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Facilitator for Solana exact scheme payments.
#[derive(Debug, Clone)]
pub struct SolanaExactFacilitator {
    keys: FacilitatorKeys,
    config: SolanaExactFacilitatorConfig,
}

impl SolanaExactFacilitator {
    /// Creates a new Solana exact facilitator.
    #[must_use]
    pub const fn new(keys: FacilitatorKeys, config: SolanaExactFacilitatorConfig) -> Self {
        Self { keys, config }
    }

    /// Returns the facilitator's configuration.
    #[must_use]
    pub const fn config(&self) -> &SolanaExactFacilitatorConfig {
        &self.config
    }

    fn transfer_requirement(
        requirements: &proto::PaymentRequirements,
    ) -> Result<TransferRequirement, FacilitatorError> {
        let asset = requirements
            .asset
            .parse::<Pubkey>()
            .map_err(|e| FacilitatorError::MalformedRequest(format!("asset: {e}")))?;
        let pay_to = requirements
            .pay_to
            .parse::<Pubkey>()
            .map_err(|e| FacilitatorError::MalformedRequest(format!("payTo: {e}")))?;
        Ok(TransferRequirement {
            asset,
            pay_to,
            amount: requirements.amount.inner(),
            max_timeout_seconds: Some(requirements.max_timeout_seconds),
        })
    }
}

impl Facilitator for SolanaExactFacilitator {
    type Context = Option<SimulationOutcome>;

    fn verify(
        &self,
        request: &proto::VerifyRequest,
        context: &Self::Context,
    ) -> Result<proto::VerifyResponse, FacilitatorError> {
        let payload = &request.payment_payload;
        let requirements = &request.payment_requirements;

        if payload.scheme() != ExactScheme::VALUE {
            return Err(FacilitatorError::UnsupportedScheme(
                payload.scheme().to_string(),
            ));
        }
        if payload.accepted != *requirements {
            return Err(FacilitatorError::AcceptedRequirementsMismatch);
        }
        if requirements.network.as_network_name().is_none()
            || requirements.network.namespace() != "solana"
        {
            return Err(FacilitatorError::UnsupportedNetwork(
                requirements.network.to_string(),
            ));
        }

        let solana_payload: ExactSolanaPayload =
            serde_json::from_value(payload.payload.clone())?;
        let requirement = Self::transfer_requirement(requirements)?;

        match verify_transaction(
            &solana_payload.transaction,
            &requirement,
            &self.keys,
            &self.config,
            context.as_ref(),
        ) {
            Ok(verified) => Ok(proto::VerifyResponse::valid(
                verified.payer.map(|payer| payer.to_string()),
            )),
            Err(error) => Ok(proto::VerifyResponse::invalid(None, error.reason())),
        }
    }
}
