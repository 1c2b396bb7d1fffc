//! Core Solana chain types: addresses, network references, token deployments.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use cascade::chain::ChainId;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use solana_pubkey::{ParsePubkeyError, Pubkey};

/// A Solana address (public key), base58-encoded on the wire.
///
/// Thin wrapper around [`Pubkey`] so that wire types and comparisons read in
/// protocol terms rather than raw key terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(Pubkey);

impl Address {
    /// Creates an address from a public key.
    #[must_use]
    pub const fn new(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }

    /// Returns the underlying public key.
    #[must_use]
    pub const fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl From<Pubkey> for Address {
    fn from(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }
}

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Pubkey>().map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

/// A Solana network, identified by the first 32 characters of its genesis
/// block hash (the CAIP-2 reference for the `solana` namespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolanaChainReference(Cow<'static, str>);

impl SolanaChainReference {
    /// Solana mainnet.
    pub const SOLANA: Self = Self(Cow::Borrowed("5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp"));

    /// Solana devnet.
    pub const SOLANA_DEVNET: Self = Self(Cow::Borrowed("EtWTRABZaYq6iMfeYKouRu166VU2xqa1"));

    /// Returns the genesis hash prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the CAIP-2 chain ID for this network.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::new("solana", self.0.as_ref())
    }

    /// Creates a reference from a CAIP-2 chain ID in the `solana` namespace.
    #[must_use]
    pub fn from_chain_id(chain_id: &ChainId) -> Option<Self> {
        if chain_id.namespace() != "solana" {
            return None;
        }
        Some(Self(Cow::Owned(chain_id.reference().to_string())))
    }
}

impl fmt::Display for SolanaChainReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An SPL token deployment on a specific Solana network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaTokenDeployment {
    /// The network the token is deployed on.
    pub chain_reference: SolanaChainReference,
    /// The token mint address.
    pub mint: Address,
    /// Number of decimal places in the token's base unit.
    pub decimals: u8,
}

impl SolanaTokenDeployment {
    /// Creates a new token deployment record.
    #[must_use]
    pub const fn new(chain_reference: SolanaChainReference, mint: Address, decimals: u8) -> Self {
        Self {
            chain_reference,
            mint,
            decimals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_serde_is_base58() {
        let pubkey = Pubkey::new_unique();
        let address = Address::new(pubkey);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{pubkey}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }

    #[test]
    fn test_address_rejects_invalid_base58() {
        assert!(serde_json::from_str::<Address>("\"not-a-key\"").is_err());
    }

    #[test]
    fn test_chain_reference_chain_id() {
        let chain_id = SolanaChainReference::SOLANA.chain_id();
        assert_eq!(chain_id.namespace(), "solana");
        assert_eq!(chain_id.reference(), "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp");
        assert_eq!(
            SolanaChainReference::from_chain_id(&chain_id),
            Some(SolanaChainReference::SOLANA)
        );
    }

    #[test]
    fn test_chain_reference_rejects_foreign_namespace() {
        let chain_id = ChainId::new("eip155", "8453");
        assert!(SolanaChainReference::from_chain_id(&chain_id).is_none());
    }
}
