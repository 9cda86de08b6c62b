//! Transaction assembly, hashing and multi-party signing.

use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

use crate::error::{IssueError, IssueResult};
use crate::ledger::builder::SignerSet;
use crate::ledger::constants::{MAX_OPERATIONS, MAX_SIGNATURES};
use crate::ledger::convert::xdr_error;
use crate::ledger::types::{AccountId, Operation, TimeBounds};

/// Network ID: SHA-256 of the network passphrase.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

// ============================================================================
// Transaction
// ============================================================================

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub source: AccountId,
    /// Total fee in stroops
    pub fee: u32,
    /// Sequence number consumed by this transaction
    pub sequence: i64,
    pub time_bounds: TimeBounds,
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// Assemble a transaction for `source`.
    ///
    /// `current_sequence` is the account's on-ledger sequence number; the
    /// transaction takes the next one. The fee is `base_fee` per operation.
    pub fn assemble(
        source: AccountId,
        current_sequence: i64,
        operations: Vec<Operation>,
        base_fee: u32,
        time_bounds: TimeBounds,
    ) -> IssueResult<Self> {
        if operations.is_empty() {
            return Err(IssueError::Assembly(
                "transaction needs at least one operation".to_string(),
            ));
        }
        if operations.len() > MAX_OPERATIONS {
            return Err(IssueError::Assembly(format!(
                "too many operations: {} (max {})",
                operations.len(),
                MAX_OPERATIONS
            )));
        }
        if current_sequence < 0 {
            return Err(IssueError::Assembly(format!(
                "invalid sequence number {}",
                current_sequence
            )));
        }
        let sequence = current_sequence.checked_add(1).ok_or_else(|| {
            IssueError::Assembly(format!("sequence number {} overflows", current_sequence))
        })?;
        let fee = u32::try_from(operations.len())
            .ok()
            .and_then(|n| base_fee.checked_mul(n))
            .ok_or_else(|| {
                IssueError::Assembly(format!(
                    "fee overflows: {} x {} operations",
                    base_fee,
                    operations.len()
                ))
            })?;

        Ok(Self {
            source,
            fee,
            sequence,
            time_bounds,
            operations,
        })
    }

    /// Every account whose signature the network will require: the source
    /// plus each distinct operation source.
    pub fn required_signers(&self) -> BTreeSet<AccountId> {
        let mut accounts: BTreeSet<AccountId> = self
            .operations
            .iter()
            .map(|op| op.effective_source(&self.source))
            .collect();
        accounts.insert(self.source);
        accounts
    }

    /// The transaction in its wire form.
    pub fn to_xdr(&self) -> IssueResult<xdr::Transaction> {
        let operations = self
            .operations
            .iter()
            .map(xdr::Operation::try_from)
            .collect::<IssueResult<Vec<_>>>()?;

        Ok(xdr::Transaction {
            source_account: (&self.source).into(),
            fee: self.fee,
            seq_num: xdr::SequenceNumber(self.sequence),
            cond: self.time_bounds.into(),
            memo: xdr::Memo::None,
            operations: operations.try_into().map_err(xdr_error)?,
            ext: xdr::TransactionExt::V0,
        })
    }

    /// Payload every signer signs: the transaction tagged with its network.
    pub fn signature_base(&self, network_passphrase: &str) -> IssueResult<Vec<u8>> {
        signature_payload(&self.to_xdr()?, network_passphrase)
    }

    /// Transaction hash on the given network.
    pub fn hash(&self, network_passphrase: &str) -> IssueResult<[u8; 32]> {
        Ok(Sha256::digest(self.signature_base(network_passphrase)?).into())
    }

    /// Sign with every identity in `signers`.
    ///
    /// The signer set must cover exactly [`Self::required_signers`]: a missing
    /// signer fails with `IncompleteSignerSet`, an unneeded one with `Assembly`
    /// (the network rejects both).
    pub fn sign(self, network_passphrase: &str, signers: &SignerSet) -> IssueResult<SignedEnvelope> {
        let required = self.required_signers();

        let missing: Vec<String> = required
            .iter()
            .filter(|account| !signers.contains(account))
            .map(AccountId::address)
            .collect();
        if !missing.is_empty() {
            return Err(IssueError::IncompleteSignerSet { missing });
        }
        if let Some(extra) = signers.iter().find(|s| !required.contains(&s.account_id())) {
            return Err(IssueError::Assembly(format!(
                "unused signer {}",
                extra.address()
            )));
        }
        if signers.len() > MAX_SIGNATURES {
            return Err(IssueError::Assembly(format!(
                "too many signers: {} (max {})",
                signers.len(),
                MAX_SIGNATURES
            )));
        }

        let tx = self.to_xdr()?;
        let hash: [u8; 32] = Sha256::digest(signature_payload(&tx, network_passphrase)?).into();

        let signatures = signers
            .iter()
            .map(|identity| {
                let signature: xdr::BytesM<64> =
                    identity.sign(&hash).to_vec().try_into().map_err(xdr_error)?;
                Ok(xdr::DecoratedSignature {
                    hint: xdr::SignatureHint(identity.account_id().signature_hint()),
                    signature: xdr::Signature(signature),
                })
            })
            .collect::<IssueResult<Vec<_>>>()?;

        let envelope = xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx,
            signatures: signatures.clone().try_into().map_err(xdr_error)?,
        });
        let encoded = envelope.to_xdr(Limits::none()).map_err(xdr_error)?;

        Ok(SignedEnvelope {
            transaction: self,
            signatures,
            hash,
            encoded,
        })
    }
}

/// `TransactionSignaturePayload` bytes for `tx` on the given network.
fn signature_payload(tx: &xdr::Transaction, network_passphrase: &str) -> IssueResult<Vec<u8>> {
    xdr::TransactionSignaturePayload {
        network_id: xdr::Hash(network_id(network_passphrase)),
        tagged_transaction: xdr::TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    }
    .to_xdr(Limits::none())
    .map_err(xdr_error)
}

// ============================================================================
// Signed Envelope
// ============================================================================

/// A transaction with all its signatures, ready for submission.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    transaction: Transaction,
    signatures: Vec<xdr::DecoratedSignature>,
    hash: [u8; 32],
    encoded: Vec<u8>,
}

impl SignedEnvelope {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Signatures in signer order, each tagged with its key hint.
    pub fn signatures(&self) -> &[xdr::DecoratedSignature] {
        &self.signatures
    }

    /// Transaction hash, as signed.
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Hex transaction hash, as Horizon reports it.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// `TransactionEnvelope` XDR bytes.
    pub fn as_xdr(&self) -> &[u8] {
        &self.encoded
    }

    /// Base64 `TransactionEnvelope` XDR, as Horizon accepts it.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.encoded)
    }
}
