//! Ledger service seams used by the issuance run.
//!
//! The run only needs two things from the network: the issuer's current
//! sequence number and a way to submit the signed envelope. Both are traits so
//! the pipeline can be driven against Horizon or an in-memory double.

use async_trait::async_trait;

use crate::error::{IssueError, IssueResult};
use crate::horizon::{HorizonClient, HorizonError};
use crate::ledger::envelope::SignedEnvelope;
use crate::ledger::types::AccountId;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Hex transaction hash
    pub hash: String,
    /// Ledger the transaction was applied in, when reported
    pub ledger: Option<u64>,
}

/// Source of account state.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Current on-ledger sequence number of `account`.
    ///
    /// Fails with `AccountNotFound` when the account does not exist.
    async fn sequence_number(&self, account: &AccountId) -> IssueResult<i64>;
}

/// Sink for signed envelopes.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Submit the envelope. A refusal by the network is `Rejected`.
    async fn submit(&self, envelope: &SignedEnvelope) -> IssueResult<SubmissionReceipt>;
}

#[async_trait]
impl AccountService for HorizonClient {
    async fn sequence_number(&self, account: &AccountId) -> IssueResult<i64> {
        let response = self.get_account(account).await.map_err(|e| match e {
            HorizonError::NotFound(_) => IssueError::AccountNotFound(account.address()),
            other => IssueError::Service(other),
        })?;
        Ok(response.sequence_number()?)
    }
}

#[async_trait]
impl SubmissionService for HorizonClient {
    async fn submit(&self, envelope: &SignedEnvelope) -> IssueResult<SubmissionReceipt> {
        let response = self.submit_transaction(envelope).await.map_err(|e| match e {
            HorizonError::TransactionFailed(problem) | HorizonError::BadRequest(problem) => {
                IssueError::Rejected(problem.message())
            }
            other => IssueError::Service(other),
        })?;

        if response.successful == Some(false) {
            return Err(IssueError::Rejected(format!(
                "transaction {} was not successful",
                response.hash
            )));
        }

        Ok(SubmissionReceipt {
            hash: response.hash,
            ledger: response.ledger,
        })
    }
}
