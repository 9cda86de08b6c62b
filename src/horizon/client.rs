//! Horizon REST client.
//!
//! The [`HorizonClient`] covers the three endpoints an issuance needs:
//! account lookup, fee stats and transaction submission.
//!
//! # Example
//!
//! ```rust,ignore
//! use stellar_issuer::horizon::HorizonClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HorizonClient::new("https://horizon-testnet.stellar.org")?;
//!
//!     let account = client.get_account(&issuer).await?;
//!     println!("Sequence: {}", account.sequence);
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::horizon::error::{HorizonError, HorizonResult, Problem};
use crate::horizon::types::{AccountResponse, FeeStatsResponse, TransactionResponse};
use crate::ledger::envelope::SignedEnvelope;
use crate::ledger::types::AccountId;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`HorizonClient`].
#[derive(Debug, Clone)]
pub struct HorizonClientBuilder {
    base_url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl HorizonClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> HorizonResult<HorizonClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in self.default_headers {
            let header_name = reqwest::header::HeaderName::try_from(name.as_str()).map_err(|e| {
                HorizonError::InvalidParameter(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = reqwest::header::HeaderValue::from_str(&value).map_err(|e| {
                HorizonError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;

        Ok(HorizonClient {
            http_client,
            base_url: self.base_url,
        })
    }
}

/// Horizon REST client.
#[derive(Debug, Clone)]
pub struct HorizonClient {
    http_client: Client,
    base_url: String,
}

impl HorizonClient {
    /// Create a new client with the given base URL and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> HorizonResult<Self> {
        HorizonClientBuilder::new(base_url).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(base_url: impl Into<String>) -> HorizonClientBuilder {
        HorizonClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Fetch an account's current state.
    pub async fn get_account(&self, account: &AccountId) -> HorizonResult<AccountResponse> {
        let url = format!("{}/accounts/{}", self.base_url, account);
        tracing::debug!(account = %account, "Fetching account");
        let response = self.http_client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Fetch the base fee of the last closed ledger, in stroops.
    pub async fn fetch_base_fee(&self) -> HorizonResult<u32> {
        let url = format!("{}/fee_stats", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        let stats: FeeStatsResponse = Self::handle_response(response).await?;
        stats.base_fee()
    }

    /// Submit a signed envelope and wait for it to be applied.
    ///
    /// Not retried: resubmitting after an ambiguous failure could apply the
    /// issuance twice.
    pub async fn submit_transaction(
        &self,
        envelope: &SignedEnvelope,
    ) -> HorizonResult<TransactionResponse> {
        let url = format!("{}/transactions", self.base_url);
        tracing::debug!(hash = %envelope.hash_hex(), "Submitting transaction");
        let response = self
            .http_client
            .post(&url)
            .form(&[("tx", envelope.to_base64())])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Deserialize a success body or map the error status.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> HorizonResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                HorizonError::Deserialize(format!("Failed to deserialize response: {}", e))
            });
        }
        Err(Self::parse_error_response(response).await)
    }

    /// Parse an error response into a HorizonError.
    async fn parse_error_response(response: reqwest::Response) -> HorizonError {
        let status = response.status();
        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                return Self::map_status_error(
                    status,
                    Problem::from_text(format!("HTTP {} (body unreadable: {})", status, e)),
                );
            }
        };

        let problem = serde_json::from_str::<Problem>(&error_text)
            .unwrap_or_else(|_| Problem::from_text(error_text));

        Self::map_status_error(status, problem)
    }

    /// Map HTTP status code to HorizonError.
    fn map_status_error(status: StatusCode, problem: Problem) -> HorizonError {
        match status {
            StatusCode::NOT_FOUND => HorizonError::NotFound(problem),
            StatusCode::BAD_REQUEST if problem.result_codes().is_some() => {
                HorizonError::TransactionFailed(problem)
            }
            StatusCode::BAD_REQUEST => HorizonError::BadRequest(problem),
            StatusCode::TOO_MANY_REQUESTS => HorizonError::RateLimited(problem),
            _ if status.is_server_error() => HorizonError::ServerError(problem),
            _ => HorizonError::UnexpectedStatus(status.as_u16(), problem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::error::{ProblemExtras, ResultCodes};

    #[test]
    fn test_client_creation() {
        let client = HorizonClient::new("https://horizon-testnet.stellar.org").unwrap();
        assert_eq!(client.base_url(), "https://horizon-testnet.stellar.org");
    }

    #[test]
    fn test_client_builder() {
        let client = HorizonClient::builder("https://horizon-testnet.stellar.org/")
            .timeout_secs(60)
            .header("X-Client-Name", "stellar-issuer")
            .build()
            .unwrap();

        // Base URL should have trailing slash removed
        assert_eq!(client.base_url(), "https://horizon-testnet.stellar.org");
    }

    #[test]
    fn test_client_builder_rejects_bad_header() {
        let result = HorizonClient::builder("https://horizon-testnet.stellar.org")
            .header("bad header", "value")
            .build();
        assert!(matches!(result, Err(HorizonError::InvalidParameter(_))));
    }

    #[test]
    fn test_status_mapping() {
        let failed = Problem {
            extras: Some(ProblemExtras {
                result_codes: Some(ResultCodes {
                    transaction: Some("tx_bad_auth".to_string()),
                    operations: vec![],
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(matches!(
            HorizonClient::map_status_error(StatusCode::BAD_REQUEST, failed),
            HorizonError::TransactionFailed(_)
        ));
        assert!(matches!(
            HorizonClient::map_status_error(StatusCode::BAD_REQUEST, Problem::default()),
            HorizonError::BadRequest(_)
        ));
        assert!(matches!(
            HorizonClient::map_status_error(StatusCode::NOT_FOUND, Problem::default()),
            HorizonError::NotFound(_)
        ));
        assert!(matches!(
            HorizonClient::map_status_error(StatusCode::TOO_MANY_REQUESTS, Problem::default()),
            HorizonError::RateLimited(_)
        ));
        assert!(matches!(
            HorizonClient::map_status_error(StatusCode::GATEWAY_TIMEOUT, Problem::default()),
            HorizonError::ServerError(_)
        ));
        assert!(matches!(
            HorizonClient::map_status_error(StatusCode::IM_A_TEAPOT, Problem::default()),
            HorizonError::UnexpectedStatus(418, _)
        ));
    }
}
