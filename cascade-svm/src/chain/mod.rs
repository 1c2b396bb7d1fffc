//! Solana chain support for Cascade payments.
//!
//! This module provides the core Solana types used by the exact scheme.
//!
//! # Key Types
//!
//! - [`Address`] - A Solana public key (base58-encoded on the wire)
//! - [`SolanaChainReference`] - A 32-character genesis hash prefix
//!   identifying a Solana network
//! - [`SolanaTokenDeployment`] - Token deployment information including mint
//!   address and decimals
//!
//! # Solana Networks
//!
//! Solana networks are identified by the first 32 characters of their
//! genesis block hash:
//! - Mainnet: `5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp`
//! - Devnet: `EtWTRABZaYq6iMfeYKouRu166VU2xqa1`

pub mod types;
pub use types::*;
