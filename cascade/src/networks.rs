//! Registry of well-known blockchain networks.
//!
//! Maps human-readable network names (e.g., `"solana-devnet"`) to CAIP-2
//! chain IDs and back. Wire payloads from older Cascade clients identify
//! networks by name; the registry resolves those names before the chain
//! implementations see them.

use crate::chain::ChainId;

/// Static metadata describing a well-known network.
#[derive(Debug, Clone, Copy)]
pub struct NetworkInfo {
    /// Human-readable network name (e.g., `"solana-devnet"`).
    pub name: &'static str,
    /// CAIP-2 namespace (e.g., `"solana"`).
    pub namespace: &'static str,
    /// CAIP-2 reference (e.g., the genesis hash prefix).
    pub reference: &'static str,
}

impl NetworkInfo {
    /// Returns the CAIP-2 chain ID for this network.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::new(self.namespace, self.reference)
    }
}

/// Well-known networks supported by Cascade facilitators.
pub static KNOWN_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "solana",
        namespace: "solana",
        reference: "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
    },
    NetworkInfo {
        name: "solana-devnet",
        namespace: "solana",
        reference: "EtWTRABZaYq6iMfeYKouRu166VU2xqa1",
    },
];

/// Looks up the chain ID for a well-known network name.
#[must_use]
pub fn chain_id_by_network_name(network_name: &str) -> Option<ChainId> {
    KNOWN_NETWORKS
        .iter()
        .find(|info| info.name == network_name)
        .map(NetworkInfo::chain_id)
}

/// Looks up the well-known network name for a chain ID.
#[must_use]
pub fn network_name_by_chain_id(chain_id: &ChainId) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|info| {
            info.namespace == chain_id.namespace() && info.reference == chain_id.reference()
        })
        .map(|info| info.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_to_chain_id_and_back() {
        for info in KNOWN_NETWORKS {
            let chain_id = chain_id_by_network_name(info.name).unwrap();
            assert_eq!(network_name_by_chain_id(&chain_id), Some(info.name));
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert!(chain_id_by_network_name("base").is_none());
    }
}
