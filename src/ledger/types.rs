//! Type definitions for Stellar transactions.
//!
//! Accounts, assets and the operation bodies the issuance protocol uses.

use std::fmt;
use std::str::FromStr;

use crate::error::{IssueError, IssueResult};
use crate::ledger::constants::{
    ALPHANUM4_MAX_LEN, MAX_ASSET_CODE_LEN, MAX_DATA_NAME_LEN, MAX_DATA_VALUE_LEN, MAX_TRUST_LIMIT,
};

// ============================================================================
// Accounts
// ============================================================================

/// An ed25519 account on the ledger, displayed as a `G...` StrKey.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Create an account ID from a raw ed25519 public key.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw ed25519 public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Last four bytes of the key, attached to signatures so the network can
    /// match them to signers.
    pub fn signature_hint(&self) -> [u8; 4] {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.0[28..]);
        hint
    }

    /// StrKey `G...` address.
    pub fn address(&self) -> String {
        stellar_strkey::ed25519::PublicKey(self.0).to_string()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.address())
    }
}

impl FromStr for AccountId {
    type Err = IssueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        stellar_strkey::ed25519::PublicKey::from_string(s)
            .map(|key| Self(key.0))
            .map_err(|_| IssueError::InvalidAddress(s.to_string()))
    }
}

// ============================================================================
// Assets
// ============================================================================

/// A credit asset: a code issued by an account.
///
/// The pair is what identifies the asset on the ledger; its canonical text
/// form is `CODE:GISSUER...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    code: String,
    issuer: AccountId,
}

impl Asset {
    /// Create an asset, validating the code.
    ///
    /// Codes must be 1-12 ASCII alphanumeric characters.
    pub fn new(code: impl Into<String>, issuer: AccountId) -> IssueResult<Self> {
        let code = code.into();
        validate_asset_code(&code)?;
        Ok(Self { code, issuer })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn issuer(&self) -> &AccountId {
        &self.issuer
    }

    /// Whether the code fits the 4-character asset type.
    pub fn is_alphanum4(&self) -> bool {
        self.code.len() <= ALPHANUM4_MAX_LEN
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.code, self.issuer)
    }
}

impl FromStr for Asset {
    type Err = IssueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, issuer) = s
            .split_once(':')
            .ok_or_else(|| IssueError::InvalidAsset(format!("expected CODE:ISSUER, got '{}'", s)))?;
        Asset::new(code, issuer.parse()?)
    }
}

/// Validate an asset code against the ledger's rules.
pub fn validate_asset_code(code: &str) -> IssueResult<()> {
    if code.is_empty() || code.len() > MAX_ASSET_CODE_LEN {
        return Err(IssueError::InvalidAsset(format!(
            "asset code must be 1-{} characters, got {}",
            MAX_ASSET_CODE_LEN,
            code.len()
        )));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(IssueError::InvalidAsset(format!(
            "asset code '{}' must be ASCII alphanumeric",
            code
        )));
    }
    Ok(())
}

// ============================================================================
// Operations
// ============================================================================

/// Operation payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    /// Authorize the source account to hold `line`, up to `limit` stroops.
    ChangeTrust { line: Asset, limit: i64 },
    /// Send `amount` stroops of `asset` to `destination`.
    Payment {
        destination: AccountId,
        asset: Asset,
        amount: i64,
    },
    /// Set (or delete, with `None`) a named data entry on the source account.
    ManageData { name: String, value: Option<Vec<u8>> },
    /// Change account options. Only the master key weight is ever set; every
    /// other option is left untouched.
    SetOptions { master_weight: Option<u32> },
}

/// A single ledger instruction with its acting account.
///
/// When `source` is `None` the transaction's source account acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub source: Option<AccountId>,
    pub body: OperationBody,
}

impl Operation {
    /// Establish a trust line from `source` to `line`, with the maximum limit.
    pub fn change_trust(source: AccountId, line: Asset) -> Self {
        Self {
            source: Some(source),
            body: OperationBody::ChangeTrust {
                line,
                limit: MAX_TRUST_LIMIT,
            },
        }
    }

    /// Transfer `amount` stroops of `asset` from `source` to `destination`.
    pub fn payment(source: AccountId, destination: AccountId, asset: Asset, amount: i64) -> Self {
        Self {
            source: Some(source),
            body: OperationBody::Payment {
                destination,
                asset,
                amount,
            },
        }
    }

    /// Attach a data entry to `source`.
    pub fn manage_data(source: AccountId, entry: &DataEntry) -> Self {
        Self {
            source: Some(source),
            body: OperationBody::ManageData {
                name: entry.name.clone(),
                value: Some(entry.value.clone()),
            },
        }
    }

    /// Drop the master key weight of `source` to zero.
    ///
    /// Irreversible for an account without other signers: nothing can ever
    /// authorize a transaction for it again.
    pub fn revoke_master_key(source: AccountId) -> Self {
        Self {
            source: Some(source),
            body: OperationBody::SetOptions {
                master_weight: Some(0),
            },
        }
    }

    /// Short name of the operation type, for logs.
    pub fn kind(&self) -> &'static str {
        match self.body {
            OperationBody::ChangeTrust { .. } => "change_trust",
            OperationBody::Payment { .. } => "payment",
            OperationBody::ManageData { .. } => "manage_data",
            OperationBody::SetOptions { .. } => "set_options",
        }
    }

    /// Account acting for this operation, falling back to the transaction source.
    pub fn effective_source(&self, tx_source: &AccountId) -> AccountId {
        self.source.unwrap_or(*tx_source)
    }

    /// Whether this operation sets the source's master weight to zero.
    pub fn is_master_key_revocation(&self) -> bool {
        matches!(
            self.body,
            OperationBody::SetOptions {
                master_weight: Some(0)
            }
        )
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// A named data entry attached to the issuer (e.g. a pointer to the asset's
/// off-chain documentation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEntry {
    name: String,
    value: Vec<u8>,
}

impl DataEntry {
    /// Create a data entry, checking the ledger's size limits.
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> IssueResult<Self> {
        let name = name.into();
        let value = value.into();
        if name.is_empty() || name.len() > MAX_DATA_NAME_LEN {
            return Err(IssueError::InvalidMetadata(format!(
                "data name must be 1-{} bytes, got {}",
                MAX_DATA_NAME_LEN,
                name.len()
            )));
        }
        if value.len() > MAX_DATA_VALUE_LEN {
            return Err(IssueError::InvalidMetadata(format!(
                "data value must be at most {} bytes, got {}",
                MAX_DATA_VALUE_LEN,
                value.len()
            )));
        }
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

// ============================================================================
// Preconditions
// ============================================================================

/// Validity window of a transaction, in Unix seconds. Zero means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    /// No expiry.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Valid from now until `now + secs`.
    pub fn expiring_after(now: u64, secs: u64) -> Self {
        Self {
            min_time: 0,
            max_time: now.saturating_add(secs),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min_time == 0 && self.max_time == 0
    }
}
