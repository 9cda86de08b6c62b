//! Error types for the issuance pipeline.

use thiserror::Error;

use crate::horizon::HorizonError;

/// Errors raised while resolving keys, building, signing or submitting
/// an issuance transaction.
#[derive(Debug, Error)]
pub enum IssueError {
    /// A secret seed is not a valid ed25519 StrKey seed.
    ///
    /// Carries the role of the offending seed, never the seed itself.
    #[error("Invalid seed format for {0}")]
    InvalidSeedFormat(String),

    /// The same account was supplied for more than one role.
    #[error("Duplicate identity: {address} supplied as {role}")]
    DuplicateIdentity { role: String, address: String },

    /// A public address is not a valid `G...` StrKey.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Asset code is empty, too long or not alphanumeric.
    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    /// Data entry name or value does not fit the ledger limits.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The issuer account does not exist on the ledger.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The ledger service could not be reached or answered unexpectedly.
    #[error("Service error: {0}")]
    Service(#[from] HorizonError),

    /// The envelope could not be built.
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// One or more accounts referenced by the transaction have no signer.
    #[error("Incomplete signer set: missing signatures for {}", missing.join(", "))]
    IncompleteSignerSet { missing: Vec<String> },

    /// The network refused the signed envelope.
    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

/// Result type alias for issuance operations
pub type IssueResult<T> = Result<T, IssueError>;
