//! # Stellar Asset Issuer
//!
//! Issues a new asset on a Stellar network in a single atomic transaction:
//! the distributor (and any extra receivers) trust the asset, the issuer pays
//! the distributor one stroop, attaches a data entry, and locks its own master
//! key so no further supply can ever be created.
//!
//! ## Modules
//!
//! - [`keys`]: Secret seed resolution into signing identities
//! - [`ledger`]: Operations, transaction assembly and signing
//! - [`horizon`]: Horizon REST client
//! - [`service`]: Account and submission seams driven by the run
//! - [`issuer`]: The end-to-end issuance run
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stellar_issuer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let network = NetworkConfig::testnet();
//!     let horizon = HorizonClient::new(&network.horizon_url)?;
//!
//!     let keys = IssuanceKeys::resolve(&issuer_seed, &distributor_seed, &receiver_seeds)?;
//!     let issued = issue_asset(&horizon, &network, &IssuanceSettings::default(), keys).await?;
//!
//!     println!("{}", issued.asset);
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Error types for the issuance pipeline.
pub mod error;

/// Horizon REST API client.
pub mod horizon;

/// End-to-end issuance run.
pub mod issuer;

/// Signing identities resolved from secret seeds.
pub mod keys;

/// Stellar transaction construction.
pub mod ledger;

/// Network endpoints and passphrases.
pub mod network;

/// Ledger service seams.
pub mod service;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use stellar_issuer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{IssueError, IssueResult};
    pub use crate::horizon::{HorizonClient, HorizonClientBuilder, HorizonError, HorizonResult};
    pub use crate::issuer::{
        issue_asset, prepare_issuance, IssuanceKeys, IssuanceSettings, IssuedAsset,
        PreparedIssuance, Stage,
    };
    pub use crate::keys::{resolve_receivers, resolve_seed, split_receiver_list, SigningIdentity};
    pub use crate::ledger::{
        AccountId, Asset, DataEntry, IssuanceBuilder, IssuancePlan, Operation, OperationBody,
        SignedEnvelope, SignerSet, TimeBounds, Transaction,
    };
    pub use crate::network::{NetworkConfig, PUBLIC_PASSPHRASE, TESTNET_PASSPHRASE};
    pub use crate::service::{AccountService, SubmissionReceipt, SubmissionService};
}
