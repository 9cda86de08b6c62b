//! Horizon response bodies.

use serde::Deserialize;

use crate::horizon::error::{HorizonError, HorizonResult};

/// `GET /accounts/{account_id}` (only the fields this crate reads).
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub account_id: String,
    /// Current sequence number, as a decimal string
    pub sequence: String,
}

impl AccountResponse {
    /// Parse the sequence number.
    pub fn sequence_number(&self) -> HorizonResult<i64> {
        self.sequence.parse().map_err(|_| {
            HorizonError::Deserialize(format!("invalid sequence number '{}'", self.sequence))
        })
    }
}

/// `POST /transactions` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    pub hash: String,
    #[serde(default)]
    pub ledger: Option<u64>,
    #[serde(default)]
    pub successful: Option<bool>,
}

/// `GET /fee_stats` (only the fields this crate reads).
#[derive(Debug, Clone, Deserialize)]
pub struct FeeStatsResponse {
    /// Base fee of the last closed ledger, in stroops, as a decimal string
    pub last_ledger_base_fee: String,
}

impl FeeStatsResponse {
    pub fn base_fee(&self) -> HorizonResult<u32> {
        self.last_ledger_base_fee.parse().map_err(|_| {
            HorizonError::Deserialize(format!(
                "invalid base fee '{}'",
                self.last_ledger_base_fee
            ))
        })
    }
}
