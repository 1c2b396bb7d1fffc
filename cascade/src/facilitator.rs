//! Facilitator trait for payment verification.
//!
//! A facilitator is the trust boundary between an untrusted client-submitted
//! payment and the key that will co-sign it. The HTTP layer deserializes a
//! [`VerifyRequest`](crate::proto::VerifyRequest), gathers whatever execution
//! context the scheme needs (e.g., a prior transaction simulation), and hands
//! both to the scheme's [`Facilitator`] implementation.
//!
//! Verification itself is a pure, synchronous computation: anything that
//! requires the network (RPC simulation, account lookups) happens strictly
//! before `verify` is called and arrives through the associated `Context`.

use crate::proto;

/// Errors for requests the facilitator cannot meaningfully verify.
///
/// These are the malformed-request class: the HTTP layer maps them to a 400
/// response. A payment that is well-formed but fails verification is NOT an
/// error; it is an `Ok` response with `isValid: false`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FacilitatorError {
    /// The request body or an embedded payload could not be parsed.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    /// The payment scheme is not supported by this facilitator.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
    /// The network is not supported by this facilitator.
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),
    /// The accepted requirements echoed by the client do not match the
    /// requirements posted with the request.
    #[error("Accepted does not match payment requirements")]
    AcceptedRequirementsMismatch,
}

impl From<serde_json::Error> for FacilitatorError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedRequest(value.to_string())
    }
}

/// Verifies payments for one scheme on one chain family.
pub trait Facilitator {
    /// Execution context gathered by collaborators before verification.
    ///
    /// Schemes that can verify a payment from the transaction alone use
    /// `()`; schemes that may need an execution trace take it here. The
    /// caller is responsible for producing the context; `verify` never
    /// performs I/O.
    type Context;

    /// Verifies a payment payload against its requirements.
    ///
    /// Returns `Ok` for every verification outcome, valid or invalid; the
    /// outcome is encoded in the [`proto::VerifyResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`FacilitatorError`] only for requests that are malformed or
    /// addressed to the wrong scheme/network.
    fn verify(
        &self,
        request: &proto::VerifyRequest,
        context: &Self::Context,
    ) -> Result<proto::VerifyResponse, FacilitatorError>;
}
