//! Network endpoints and passphrases.

/// Horizon endpoint of the Stellar test network.
pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";

/// Passphrase of the Stellar test network.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Horizon endpoint of the Stellar public network.
pub const PUBLIC_HORIZON_URL: &str = "https://horizon.stellar.org";

/// Passphrase of the Stellar public network.
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Target network for a run: where to talk to and what to sign for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Horizon base URL (no trailing slash)
    pub horizon_url: String,
    /// Network passphrase mixed into every transaction hash
    pub network_passphrase: String,
}

impl NetworkConfig {
    /// Create a config for an arbitrary network.
    pub fn new(horizon_url: impl Into<String>, network_passphrase: impl Into<String>) -> Self {
        Self {
            horizon_url: horizon_url.into().trim_end_matches('/').to_string(),
            network_passphrase: network_passphrase.into(),
        }
    }

    /// The Stellar test network.
    pub fn testnet() -> Self {
        Self::new(TESTNET_HORIZON_URL, TESTNET_PASSPHRASE)
    }

    /// The Stellar public network.
    pub fn public() -> Self {
        Self::new(PUBLIC_HORIZON_URL, PUBLIC_PASSPHRASE)
    }

    /// Override the Horizon URL.
    pub fn with_horizon_url(mut self, url: impl Into<String>) -> Self {
        self.horizon_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the network passphrase.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.network_passphrase = passphrase.into();
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::testnet()
    }
}
