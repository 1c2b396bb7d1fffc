//! Wire format types for Cascade payment messages.
//!
//! This module defines the JSON types exchanged between resource servers,
//! paying clients, and the facilitator. All types serialize with camelCase
//! field names. Amounts are string-encoded 64-bit integers ([`U64String`])
//! so that `JavaScript` consumers never lose precision.
//!
//! # Key Types
//!
//! - [`PaymentRequirements`] - What a resource server requires for payment
//! - [`PaymentPayload`] - The client's payment submission
//! - [`VerifyRequest`] / [`VerifyResponse`] - Payment verification messages
//!
//! Verification responses carry a machine-readable `invalidReason` code from
//! a fixed vocabulary; API consumers match on those strings, so they are
//! never localized or reworded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

use crate::chain::ChainId;

/// A `u64` value that serializes as a string.
///
/// Some JSON parsers (particularly in `JavaScript`) cannot accurately
/// represent large integers. This type serializes `u64` values as strings to
/// preserve precision across all platforms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct U64String(u64);

impl U64String {
    /// Returns the inner `u64` value.
    #[must_use]
    pub const fn inner(&self) -> u64 {
        self.0
    }
}

impl FromStr for U64String {
    type Err = <u64 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl From<u64> for U64String {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<U64String> for u64 {
    fn from(value: U64String) -> Self {
        value.0
    }
}

impl Serialize for U64String {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U64String {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u64>().map(Self).map_err(serde::de::Error::custom)
    }
}

/// Payment requirements posted by a resource server.
///
/// Defines what the server requires for payment: scheme, network, asset,
/// minimum amount, recipient, and timeout. Immutable for the duration of one
/// verification.
///
/// # JSON Format
///
/// ```json
/// {
///   "scheme": "exact",
///   "network": "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
///   "asset": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
///   "amount": "1000000",
///   "payTo": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
///   "maxTimeoutSeconds": 60,
///   "extra": { "feePayer": "..." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// Payment scheme identifier (e.g., "exact").
    pub scheme: String,

    /// CAIP-2 network identifier.
    pub network: ChainId,

    /// Asset address/identifier (e.g., a token mint address).
    pub asset: String,

    /// Minimum amount in the asset's smallest unit (e.g., "1000000" for 1 USDC).
    pub amount: U64String,

    /// Recipient address. For token payments this is the owner wallet; the
    /// destination token account is derived from it.
    pub pay_to: String,

    /// Maximum time in seconds for payment validity.
    pub max_timeout_seconds: u64,

    /// Additional scheme-specific data (e.g., the declared fee payer).
    #[serde(default = "default_empty_object")]
    pub extra: Value,
}

impl PaymentRequirements {
    /// Returns the extra metadata, or `None` if it is null.
    #[must_use]
    pub fn extra(&self) -> Option<&Value> {
        if self.extra.is_null() { None } else { Some(&self.extra) }
    }
}

/// Payment payload submitted by a paying client.
///
/// Contains the scheme-specific payload (for Solana, a base64-encoded
/// serialized transaction) and echoes back the requirements the client
/// accepted, so the facilitator can detect tampering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version.
    #[serde(default = "default_version")]
    pub x402_version: u32,

    /// Scheme-specific payload data.
    pub payload: Value,

    /// The payment requirements being fulfilled.
    pub accepted: PaymentRequirements,
}

impl PaymentPayload {
    /// Returns the payment scheme from accepted requirements.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.accepted.scheme
    }

    /// Returns the network from accepted requirements.
    #[must_use]
    pub const fn network(&self) -> &ChainId {
        &self.accepted.network
    }
}

/// Request to verify a payment before the facilitator co-signs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// The payment payload to verify.
    pub payment_payload: PaymentPayload,

    /// The requirements to verify against.
    pub payment_requirements: PaymentRequirements,
}

/// Result returned by a facilitator after verifying a payment payload
/// against the provided payment requirements.
///
/// Indicates whether the submitted transaction satisfies the requirements.
/// If invalid, it carries a machine-readable reason code from the fixed
/// vocabulary. The payer address is present only when it was statically
/// determinable from the transaction (direct token transfers); payments
/// routed through a smart-wallet invocation verify without one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum VerifyResponse {
    /// The payload matches the requirements and passes all checks.
    Valid {
        /// The resolved payer address, when statically determinable.
        payer: Option<String>,
    },
    /// The payload was well-formed but failed verification.
    Invalid {
        /// Machine-readable reason verification failed.
        reason: String,
        /// The payer address, if identifiable.
        payer: Option<String>,
    },
}

impl VerifyResponse {
    /// Constructs a successful verification response.
    #[must_use]
    pub const fn valid(payer: Option<String>) -> Self {
        Self::Valid { payer }
    }

    /// Constructs a failed verification response.
    #[must_use]
    pub const fn invalid(payer: Option<String>, reason: String) -> Self {
        Self::Invalid { reason, payer }
    }

    /// Returns `true` if the verification succeeded.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Returns the invalid-reason code, if any.
    #[must_use]
    pub fn invalid_reason(&self) -> Option<&str> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid { reason, .. } => Some(reason),
        }
    }

    /// Returns the payer address, if one was resolved.
    #[must_use]
    pub fn payer(&self) -> Option<&str> {
        match self {
            Self::Valid { payer } | Self::Invalid { payer, .. } => payer.as_deref(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponseWire {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invalid_reason: Option<String>,
}

impl Serialize for VerifyResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = match self {
            Self::Valid { payer } => VerifyResponseWire {
                is_valid: true,
                payer: payer.clone(),
                invalid_reason: None,
            },
            Self::Invalid { reason, payer } => VerifyResponseWire {
                is_valid: false,
                payer: payer.clone(),
                invalid_reason: Some(reason.clone()),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VerifyResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = VerifyResponseWire::deserialize(deserializer)?;
        if wire.is_valid {
            Ok(Self::Valid { payer: wire.payer })
        } else {
            let reason = wire
                .invalid_reason
                .ok_or_else(|| serde::de::Error::missing_field("invalidReason"))?;
            Ok(Self::Invalid {
                reason,
                payer: wire.payer,
            })
        }
    }
}

const fn default_version() -> u32 {
    1
}

fn default_empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements_json() -> &'static str {
        r#"{
            "scheme": "exact",
            "network": "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
            "asset": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "amount": "1000000",
            "payTo": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
            "maxTimeoutSeconds": 60
        }"#
    }

    #[test]
    fn test_u64string_roundtrip() {
        let amount = U64String::from(1_000_000u64);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"1000000\"");
        let parsed: U64String = serde_json::from_str("\"1000000\"").unwrap();
        assert_eq!(parsed.inner(), 1_000_000);
    }

    #[test]
    fn test_u64string_rejects_bare_number() {
        assert!(serde_json::from_str::<U64String>("1000000").is_err());
    }

    #[test]
    fn test_requirements_deserialize() {
        let req: PaymentRequirements = serde_json::from_str(requirements_json()).unwrap();
        assert_eq!(req.scheme, "exact");
        assert_eq!(req.network.namespace(), "solana");
        assert_eq!(req.amount.inner(), 1_000_000);
        assert_eq!(req.max_timeout_seconds, 60);
        // Absent extra defaults to an empty object, not null.
        assert!(req.extra().is_some());
    }

    #[test]
    fn test_requirements_roundtrip() {
        let req: PaymentRequirements = serde_json::from_str(requirements_json()).unwrap();
        let json = serde_json::to_string(&req).unwrap();
        let back: PaymentRequirements = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }

    #[test]
    fn test_verify_response_valid_wire_shape() {
        let response = VerifyResponse::valid(Some("payer111".to_string()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["payer"], "payer111");
        assert!(json.get("invalidReason").is_none());
    }

    #[test]
    fn test_verify_response_valid_without_payer() {
        let response = VerifyResponse::valid(None);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isValid"], true);
        assert!(json.get("payer").is_none());
    }

    #[test]
    fn test_verify_response_invalid_wire_shape() {
        let response = VerifyResponse::invalid(None, "insufficient_amount".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["invalidReason"], "insufficient_amount");
    }

    #[test]
    fn test_verify_response_deserialize_requires_reason_when_invalid() {
        let result: Result<VerifyResponse, _> = serde_json::from_str(r#"{"isValid": false}"#);
        assert!(result.is_err());
    }
}
