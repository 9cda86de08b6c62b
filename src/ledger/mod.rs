//! Stellar transaction construction.
//!
//! This module provides the account, asset and operation types, the issuance
//! operation builder, and transaction assembly and signing. The wire form is
//! `stellar-xdr`.

pub mod builder;
pub mod constants;
pub mod convert;
pub mod envelope;
pub mod types;

// Re-export commonly used items
pub use builder::{IssuanceBuilder, IssuancePlan, SignerSet};
pub use constants::*;
pub use envelope::{network_id, SignedEnvelope, Transaction};
pub use types::{AccountId, Asset, DataEntry, Operation, OperationBody, TimeBounds};
