//! Horizon error types.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Errors from the Horizon HTTP client.
#[derive(Debug, Error)]
pub enum HorizonError {
    /// HTTP/network error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(Problem),

    /// Submitted transaction failed validation or application (400 with result codes)
    #[error("Transaction failed: {0}")]
    TransactionFailed(Problem),

    /// Invalid request (400)
    #[error("Bad request: {0}")]
    BadRequest(Problem),

    /// Too many requests (429)
    #[error("Rate limited: {0}")]
    RateLimited(Problem),

    /// Server-side error (5xx)
    #[error("Server error: {0}")]
    ServerError(Problem),

    /// Response body did not match the expected shape
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Invalid client configuration or parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected HTTP status code
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, Problem),
}

/// Result type alias for Horizon operations.
pub type HorizonResult<T> = Result<T, HorizonError>;

/// Horizon problem document (RFC 7807).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Problem {
    #[serde(rename = "type", default)]
    pub problem_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

/// Extra fields Horizon attaches to transaction failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProblemExtras {
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
    #[serde(default)]
    pub result_xdr: Option<String>,
    #[serde(default)]
    pub envelope_xdr: Option<String>,
}

/// Transaction and per-operation result codes, e.g. `tx_failed` and
/// `["op_success", "op_no_trust"]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl Problem {
    /// Wrap a non-JSON error body.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            detail: Some(text.into()),
            ..Default::default()
        }
    }

    /// Result codes, when Horizon reported them.
    pub fn result_codes(&self) -> Option<&ResultCodes> {
        self.extras.as_ref().and_then(|e| e.result_codes.as_ref())
    }

    /// Human-readable reason: result codes when present, otherwise the
    /// detail or title.
    pub fn message(&self) -> String {
        if let Some(codes) = self.result_codes() {
            let tx = codes.transaction.as_deref().unwrap_or("unknown");
            if codes.operations.is_empty() {
                return tx.to_string();
            }
            return format!("{}: {}", tx, codes.operations.join(", "));
        }
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
