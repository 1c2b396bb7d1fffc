#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Cascade payment protocol.
//!
//! This crate provides the foundational types used throughout the Cascade
//! ecosystem for verifying client-submitted payments before a facilitator
//! co-signs them. It is designed to be blockchain-agnostic, with
//! chain-specific implementations provided by separate crates.
//!
//! # Overview
//!
//! A Cascade facilitator receives a payment payload (a pre-built, partially
//! signed transaction) together with the payment requirements posted by the
//! resource server. The facilitator verifies, without settling, that the
//! transaction pays the required amount of the required asset to the required
//! destination, then attaches its own fee-payer signature. Everything in this
//! crate sits on the wire between those parties.
//!
//! # Modules
//!
//! - [`chain`] - Blockchain identifiers (CAIP-2 chain IDs)
//! - [`encoding`] - Base64 helpers for serialized transactions
//! - [`facilitator`] - Core trait for payment verification
//! - [`networks`] - Registry of well-known blockchain networks
//! - [`proto`] - Wire format types for requirements, payloads, and results
//! - [`scheme`] - Payment scheme identifiers
//! - [`timestamp`] - Unix timestamps for payment deadlines

pub mod chain;
pub mod encoding;
pub mod facilitator;
pub mod networks;
pub mod proto;
pub mod scheme;
pub mod timestamp;
