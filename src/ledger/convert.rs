//! Conversions from the ledger types into their `stellar-xdr` wire form.

use stellar_xdr::curr as xdr;

use crate::error::{IssueError, IssueResult};
use crate::ledger::types::{AccountId, Asset, Operation, OperationBody, TimeBounds};

/// Wrap an XDR construction failure.
pub(crate) fn xdr_error(err: xdr::Error) -> IssueError {
    IssueError::Assembly(format!("XDR encoding failed: {}", err))
}

impl From<&AccountId> for xdr::AccountId {
    fn from(account: &AccountId) -> Self {
        xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(
            *account.as_bytes(),
        )))
    }
}

impl From<&AccountId> for xdr::MuxedAccount {
    fn from(account: &AccountId) -> Self {
        xdr::MuxedAccount::Ed25519(xdr::Uint256(*account.as_bytes()))
    }
}

/// Zero-padded asset code.
fn padded_code<const N: usize>(code: &str) -> [u8; N] {
    let mut out = [0u8; N];
    out[..code.len()].copy_from_slice(code.as_bytes());
    out
}

impl From<&Asset> for xdr::Asset {
    fn from(asset: &Asset) -> Self {
        let issuer = xdr::AccountId::from(asset.issuer());
        if asset.is_alphanum4() {
            xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
                asset_code: xdr::AssetCode4(padded_code(asset.code())),
                issuer,
            })
        } else {
            xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
                asset_code: xdr::AssetCode12(padded_code(asset.code())),
                issuer,
            })
        }
    }
}

impl From<&Asset> for xdr::ChangeTrustAsset {
    fn from(asset: &Asset) -> Self {
        match xdr::Asset::from(asset) {
            xdr::Asset::CreditAlphanum4(a) => xdr::ChangeTrustAsset::CreditAlphanum4(a),
            xdr::Asset::CreditAlphanum12(a) => xdr::ChangeTrustAsset::CreditAlphanum12(a),
            xdr::Asset::Native => xdr::ChangeTrustAsset::Native,
        }
    }
}

impl From<TimeBounds> for xdr::Preconditions {
    fn from(bounds: TimeBounds) -> Self {
        xdr::Preconditions::Time(xdr::TimeBounds {
            min_time: xdr::TimePoint(bounds.min_time),
            max_time: xdr::TimePoint(bounds.max_time),
        })
    }
}

impl TryFrom<&Operation> for xdr::Operation {
    type Error = IssueError;

    fn try_from(op: &Operation) -> IssueResult<Self> {
        let body = match &op.body {
            OperationBody::ChangeTrust { line, limit } => {
                xdr::OperationBody::ChangeTrust(xdr::ChangeTrustOp {
                    line: line.into(),
                    limit: *limit,
                })
            }
            OperationBody::Payment {
                destination,
                asset,
                amount,
            } => xdr::OperationBody::Payment(xdr::PaymentOp {
                destination: destination.into(),
                asset: asset.into(),
                amount: *amount,
            }),
            OperationBody::ManageData { name, value } => {
                let data_name = xdr::StringM::try_from(name.as_bytes().to_vec())
                    .map(xdr::String64)
                    .map_err(xdr_error)?;
                let data_value = value
                    .as_ref()
                    .map(|v| xdr::BytesM::try_from(v.clone()).map(xdr::DataValue))
                    .transpose()
                    .map_err(xdr_error)?;
                xdr::OperationBody::ManageData(xdr::ManageDataOp {
                    data_name,
                    data_value,
                })
            }
            OperationBody::SetOptions { master_weight } => {
                xdr::OperationBody::SetOptions(xdr::SetOptionsOp {
                    inflation_dest: None,
                    clear_flags: None,
                    set_flags: None,
                    master_weight: *master_weight,
                    low_threshold: None,
                    med_threshold: None,
                    high_threshold: None,
                    home_domain: None,
                    signer: None,
                })
            }
        };

        Ok(xdr::Operation {
            source_account: op.source.as_ref().map(xdr::MuxedAccount::from),
            body,
        })
    }
}
