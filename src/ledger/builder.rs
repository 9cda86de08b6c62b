//! Builder for the issuance operation sequence.

use crate::error::{IssueError, IssueResult};
use crate::keys::SigningIdentity;
use crate::ledger::constants::ISSUED_AMOUNT;
use crate::ledger::types::{AccountId, Asset, DataEntry, Operation};

/// Insertion-ordered set of signing identities, one per account.
#[derive(Debug, Clone, Default)]
pub struct SignerSet {
    signers: Vec<SigningIdentity>,
}

impl SignerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity. Returns `false` if its account is already present.
    pub fn insert(&mut self, identity: SigningIdentity) -> bool {
        if self.contains(&identity.account_id()) {
            return false;
        }
        self.signers.push(identity);
        true
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.signers.iter().any(|s| s.account_id() == *account)
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SigningIdentity> {
        self.signers.iter()
    }

    /// Accounts in insertion order.
    pub fn accounts(&self) -> Vec<AccountId> {
        self.signers.iter().map(SigningIdentity::account_id).collect()
    }
}

/// The operations, signers and asset of one issuance.
#[derive(Debug, Clone)]
pub struct IssuancePlan {
    pub asset: Asset,
    pub operations: Vec<Operation>,
    pub signers: SignerSet,
}

/// Builder for the issuance protocol's operation list.
///
/// The sequence is fixed:
/// 1. distributor trusts the asset
/// 2. issuer pays the distributor one stroop
/// 3. issuer attaches the metadata entry
/// 4. issuer drops its master weight to zero
/// 5. every extra receiver trusts the asset, in the order given
///
/// The trust line must exist before the payment, and the revocation must be
/// the last issuer-sourced operation.
///
/// # Example
///
/// ```rust,ignore
/// let plan = IssuanceBuilder::new(issuer, distributor)
///     .asset_code("EigerNFT")
///     .metadata(DataEntry::new("nftsource", "https://www.eiger.co")?)
///     .receivers(receivers)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct IssuanceBuilder {
    issuer: SigningIdentity,
    distributor: SigningIdentity,
    receivers: Vec<SigningIdentity>,
    asset_code: Option<String>,
    metadata: Option<DataEntry>,
}

impl IssuanceBuilder {
    pub fn new(issuer: SigningIdentity, distributor: SigningIdentity) -> Self {
        Self {
            issuer,
            distributor,
            receivers: Vec::new(),
            asset_code: None,
            metadata: None,
        }
    }

    /// Set the asset code (required).
    pub fn asset_code(mut self, code: impl Into<String>) -> Self {
        self.asset_code = Some(code.into());
        self
    }

    /// Set the data entry attached to the issuer (required).
    pub fn metadata(mut self, entry: DataEntry) -> Self {
        self.metadata = Some(entry);
        self
    }

    /// Add one extra receiver.
    pub fn receiver(mut self, receiver: SigningIdentity) -> Self {
        self.receivers.push(receiver);
        self
    }

    /// Add extra receivers, keeping their order.
    pub fn receivers(mut self, receivers: impl IntoIterator<Item = SigningIdentity>) -> Self {
        self.receivers.extend(receivers);
        self
    }

    /// Build the operation list and the signer set.
    ///
    /// Fails with `DuplicateIdentity` when an account is supplied for more than
    /// one role: a receiver equal to the issuer would need an issuer-sourced
    /// operation after the revocation.
    pub fn build(self) -> IssueResult<IssuancePlan> {
        let code = self
            .asset_code
            .ok_or_else(|| IssueError::InvalidAsset("asset code is required".to_string()))?;
        let metadata = self
            .metadata
            .ok_or_else(|| IssueError::InvalidMetadata("metadata entry is required".to_string()))?;

        let issuer = self.issuer.account_id();
        let distributor = self.distributor.account_id();
        let asset = Asset::new(code, issuer)?;

        let mut signers = SignerSet::new();
        signers.insert(self.issuer);
        if !signers.insert(self.distributor) {
            return Err(duplicate("distributor", &distributor));
        }

        let mut operations = vec![
            Operation::change_trust(distributor, asset.clone()),
            Operation::payment(issuer, distributor, asset.clone(), ISSUED_AMOUNT),
            Operation::manage_data(issuer, &metadata),
            Operation::revoke_master_key(issuer),
        ];

        for (i, receiver) in self.receivers.into_iter().enumerate() {
            let account = receiver.account_id();
            if !signers.insert(receiver) {
                return Err(duplicate(&format!("receiver #{}", i + 1), &account));
            }
            operations.push(Operation::change_trust(account, asset.clone()));
        }

        tracing::debug!(
            asset = %asset,
            operations = operations.len(),
            signers = signers.len(),
            "Built issuance operations"
        );

        Ok(IssuancePlan {
            asset,
            operations,
            signers,
        })
    }
}

fn duplicate(role: &str, account: &AccountId) -> IssueError {
    IssueError::DuplicateIdentity {
        role: role.to_string(),
        address: account.address(),
    }
}
