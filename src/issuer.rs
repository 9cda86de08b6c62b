//! The issuance run: resolve keys, fetch the issuer account, build the
//! operations, sign, submit.
//!
//! Stages advance strictly forward:
//!
//! ```text
//! Unstarted → KeysResolved → AccountFetched → OperationsBuilt → Signed → Submitted
//! ```
//!
//! The first error ends the run; nothing reaches the network before the
//! final submission, so there is nothing to clean up.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{IssueError, IssueResult};
use crate::keys::{resolve_receivers, resolve_seed, SigningIdentity};
use crate::ledger::builder::IssuanceBuilder;
use crate::ledger::constants::MIN_BASE_FEE;
use crate::ledger::envelope::{SignedEnvelope, Transaction};
use crate::ledger::types::{validate_asset_code, AccountId, Asset, DataEntry, TimeBounds};
use crate::network::NetworkConfig;
use crate::service::{AccountService, SubmissionReceipt, SubmissionService};

/// Default asset code.
pub const DEFAULT_ASSET_CODE: &str = "EigerNFT";

/// Default name of the data entry attached to the issuer.
pub const DEFAULT_DATA_NAME: &str = "nftsource";

/// Default value of the data entry attached to the issuer.
pub const DEFAULT_DATA_VALUE: &str = "https://www.eiger.co";

// ============================================================================
// Settings & Keys
// ============================================================================

/// What to issue and how to pay for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceSettings {
    pub asset_code: String,
    pub data_name: String,
    pub data_value: String,
    /// Fee per operation, in stroops
    pub base_fee: u32,
    /// Seconds the transaction stays valid; `None` never expires
    pub timeout_secs: Option<u64>,
}

impl Default for IssuanceSettings {
    fn default() -> Self {
        Self {
            asset_code: DEFAULT_ASSET_CODE.to_string(),
            data_name: DEFAULT_DATA_NAME.to_string(),
            data_value: DEFAULT_DATA_VALUE.to_string(),
            base_fee: MIN_BASE_FEE,
            timeout_secs: None,
        }
    }
}

impl IssuanceSettings {
    pub fn with_asset_code(mut self, code: impl Into<String>) -> Self {
        self.asset_code = code.into();
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_name = name.into();
        self.data_value = value.into();
        self
    }

    pub fn with_base_fee(mut self, base_fee: u32) -> Self {
        self.base_fee = base_fee;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Validity window for a transaction built now.
    pub fn time_bounds(&self) -> TimeBounds {
        match self.timeout_secs {
            Some(secs) => {
                let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
                TimeBounds::expiring_after(now, secs)
            }
            None => TimeBounds::unbounded(),
        }
    }

    /// Check the asset code and data entry before touching the network.
    pub fn validate(&self) -> IssueResult<DataEntry> {
        validate_asset_code(&self.asset_code)?;
        if self.base_fee < MIN_BASE_FEE {
            return Err(IssueError::Assembly(format!(
                "base fee {} is below the network minimum {}",
                self.base_fee, MIN_BASE_FEE
            )));
        }
        DataEntry::new(self.data_name.clone(), self.data_value.clone().into_bytes())
    }
}

/// The resolved identities taking part in an issuance.
///
/// Only built through [`IssuanceKeys::new`] or [`IssuanceKeys::resolve`], so
/// holding one means every seed decoded and no account plays two roles.
#[derive(Debug, Clone)]
pub struct IssuanceKeys {
    issuer: SigningIdentity,
    distributor: SigningIdentity,
    receivers: Vec<SigningIdentity>,
}

impl IssuanceKeys {
    /// Group identities, rejecting any account supplied for two roles.
    pub fn new(
        issuer: SigningIdentity,
        distributor: SigningIdentity,
        receivers: Vec<SigningIdentity>,
    ) -> IssueResult<Self> {
        let mut seen: BTreeSet<AccountId> = BTreeSet::new();
        seen.insert(issuer.account_id());

        let roles = std::iter::once(("distributor".to_string(), &distributor)).chain(
            receivers
                .iter()
                .enumerate()
                .map(|(i, r)| (format!("receiver #{}", i + 1), r)),
        );
        for (role, identity) in roles {
            if !seen.insert(identity.account_id()) {
                return Err(IssueError::DuplicateIdentity {
                    role,
                    address: identity.address(),
                });
            }
        }

        Ok(Self {
            issuer,
            distributor,
            receivers,
        })
    }

    /// Resolve every seed, then group the identities.
    pub fn resolve<S: AsRef<str>>(
        issuer_seed: &str,
        distributor_seed: &str,
        receiver_seeds: &[S],
    ) -> IssueResult<Self> {
        let issuer = resolve_seed(issuer_seed, "issuer")?;
        let distributor = resolve_seed(distributor_seed, "distributor")?;
        let receivers = resolve_receivers(receiver_seeds)?;
        Self::new(issuer, distributor, receivers)
    }

    pub fn issuer(&self) -> &SigningIdentity {
        &self.issuer
    }

    pub fn distributor(&self) -> &SigningIdentity {
        &self.distributor
    }

    pub fn receivers(&self) -> &[SigningIdentity] {
        &self.receivers
    }
}

// ============================================================================
// Stages
// ============================================================================

/// Progress of an issuance run.
///
/// Keys are resolved before a run starts, so `KeysResolved` is always the
/// first stage recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unstarted,
    KeysResolved,
    AccountFetched,
    OperationsBuilt,
    Signed,
    Submitted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unstarted => "unstarted",
            Stage::KeysResolved => "keys_resolved",
            Stage::AccountFetched => "account_fetched",
            Stage::OperationsBuilt => "operations_built",
            Stage::Signed => "signed",
            Stage::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// Forward-only stage tracker.
#[derive(Debug)]
struct Run {
    stage: Stage,
}

impl Run {
    fn new() -> Self {
        Self {
            stage: Stage::Unstarted,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {} after {}", next, self.stage);
        self.stage = next;
        tracing::info!(stage = %next, "Issuance stage reached");
    }
}

// ============================================================================
// Run
// ============================================================================

/// A signed issuance that has not been submitted.
#[derive(Debug, Clone)]
pub struct PreparedIssuance {
    pub asset: Asset,
    pub envelope: SignedEnvelope,
}

/// A submitted issuance.
#[derive(Debug, Clone)]
pub struct IssuedAsset {
    pub asset: Asset,
    pub receipt: SubmissionReceipt,
}

/// Build and sign the issuance transaction without submitting it.
///
/// Fetches the issuer's sequence number once.
pub async fn prepare_issuance<A>(
    accounts: &A,
    network: &NetworkConfig,
    settings: &IssuanceSettings,
    keys: IssuanceKeys,
) -> IssueResult<PreparedIssuance>
where
    A: AccountService + ?Sized,
{
    let mut run = Run::new();
    prepare(&mut run, accounts, network, settings, keys).await
}

/// Build, sign and submit the issuance transaction.
///
/// On success the returned asset is the one the ledger now holds, with the
/// issuer locked.
pub async fn issue_asset<L>(
    ledger: &L,
    network: &NetworkConfig,
    settings: &IssuanceSettings,
    keys: IssuanceKeys,
) -> IssueResult<IssuedAsset>
where
    L: AccountService + SubmissionService + ?Sized,
{
    let mut run = Run::new();
    let prepared = prepare(&mut run, ledger, network, settings, keys).await?;

    let receipt = ledger.submit(&prepared.envelope).await?;
    run.advance(Stage::Submitted);
    tracing::info!(
        hash = %receipt.hash,
        ledger = ?receipt.ledger,
        asset = %prepared.asset,
        "Asset issued"
    );

    Ok(IssuedAsset {
        asset: prepared.asset,
        receipt,
    })
}

async fn prepare<A>(
    run: &mut Run,
    accounts: &A,
    network: &NetworkConfig,
    settings: &IssuanceSettings,
    keys: IssuanceKeys,
) -> IssueResult<PreparedIssuance>
where
    A: AccountService + ?Sized,
{
    run.advance(Stage::KeysResolved);
    tracing::debug!(
        issuer = %keys.issuer.address(),
        distributor = %keys.distributor.address(),
        receivers = keys.receivers.len(),
        "Using resolved keys"
    );

    let metadata = settings.validate()?;
    let issuer = keys.issuer.account_id();
    let sequence = accounts.sequence_number(&issuer).await?;
    run.advance(Stage::AccountFetched);
    tracing::debug!(issuer = %issuer, sequence, "Fetched issuer account");

    let plan = IssuanceBuilder::new(keys.issuer, keys.distributor)
        .asset_code(settings.asset_code.clone())
        .metadata(metadata)
        .receivers(keys.receivers)
        .build()?;
    run.advance(Stage::OperationsBuilt);

    let transaction = Transaction::assemble(
        issuer,
        sequence,
        plan.operations,
        settings.base_fee,
        settings.time_bounds(),
    )?;
    let envelope = transaction.sign(&network.network_passphrase, &plan.signers)?;
    run.advance(Stage::Signed);
    tracing::info!(
        hash = %envelope.hash_hex(),
        sequence = envelope.transaction().sequence,
        fee = envelope.transaction().fee,
        operations = envelope.transaction().operations.len(),
        signatures = envelope.signatures().len(),
        "Signed issuance transaction"
    );

    Ok(PreparedIssuance {
        asset: plan.asset,
        envelope,
    })
}
