//! # issue-asset
//!
//! Issues a Stellar asset and prints `CODE:ISSUER` on success.
//!
//! ```text
//! issue-asset -i SDR4... -d SBUW... -r SC7X...,SD2Q...
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level); stdout carries only the
//! result line, so it can be piped into other tooling.

use std::process::ExitCode;

use anyhow::Context;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use stellar_issuer::horizon::HorizonClient;
use stellar_issuer::issuer::{
    issue_asset, prepare_issuance, IssuanceKeys, IssuanceSettings, DEFAULT_ASSET_CODE,
    DEFAULT_DATA_NAME, DEFAULT_DATA_VALUE,
};
use stellar_issuer::keys::split_receiver_list;
use stellar_issuer::ledger::MIN_BASE_FEE;
use stellar_issuer::network::NetworkConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Network {
    Testnet,
    Public,
}

/// Issue a new asset, trust it from every receiver, and lock the issuer.
#[derive(Parser, Debug)]
#[command(name = "issue-asset", version, about)]
struct Cli {
    /// Issuer secret seed, e.g. SDR4C2CKNCVK4DWMTNI2IXFJ6BE3A6J3WVNCGR6Q3SCMJDTSVHMJGC6U
    #[arg(short, long, env = "ISSUER_SEED", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    issuer: String,

    /// Distributor secret seed, the first holder of the asset
    #[arg(short, long, env = "DISTRIBUTOR_SEED", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    distributor: String,

    /// Comma-separated secret seeds of other accounts that should trust the asset
    #[arg(short, long, env = "RECEIVER_SEEDS", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    receivers: String,

    /// Asset code (1-12 alphanumeric characters)
    #[arg(long, default_value = DEFAULT_ASSET_CODE)]
    asset_code: String,

    /// Name of the data entry attached to the issuer
    #[arg(long, default_value = DEFAULT_DATA_NAME)]
    data_name: String,

    /// Value of the data entry attached to the issuer
    #[arg(long, default_value = DEFAULT_DATA_VALUE)]
    data_value: String,

    /// Target network
    #[arg(long, value_enum, default_value_t = Network::Testnet, env = "STELLAR_NETWORK")]
    network: Network,

    /// Horizon URL, overriding the network's default
    #[arg(long, env = "HORIZON_URL")]
    horizon_url: Option<String>,

    /// Network passphrase, overriding the network's default
    #[arg(long, env = "NETWORK_PASSPHRASE")]
    network_passphrase: Option<String>,

    /// Fee per operation in stroops
    #[arg(long, default_value_t = MIN_BASE_FEE, conflicts_with = "fetch_base_fee")]
    base_fee: u32,

    /// Use the last ledger's base fee reported by Horizon
    #[arg(long)]
    fetch_base_fee: bool,

    /// Seconds the transaction stays valid (default: never expires)
    #[arg(long)]
    timeout: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    http_timeout: u64,

    /// Print the signed envelope XDR instead of submitting it
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn network_config(&self) -> NetworkConfig {
        let mut config = match self.network {
            Network::Testnet => NetworkConfig::testnet(),
            Network::Public => NetworkConfig::public(),
        };
        if let Some(url) = &self.horizon_url {
            config = config.with_horizon_url(url);
        }
        if let Some(passphrase) = &self.network_passphrase {
            config = config.with_passphrase(passphrase);
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the issuance; returns the line to print on stdout.
async fn run(cli: Cli) -> anyhow::Result<String> {
    let network = cli.network_config();
    tracing::info!(horizon = %network.horizon_url, "Using network");

    let receiver_seeds = split_receiver_list(&cli.receivers);
    let keys = IssuanceKeys::resolve(&cli.issuer, &cli.distributor, &receiver_seeds)?;

    let horizon = HorizonClient::builder(&network.horizon_url)
        .timeout_secs(cli.http_timeout)
        .build()
        .context("failed to build Horizon client")?;

    let base_fee = if cli.fetch_base_fee {
        let fee = horizon
            .fetch_base_fee()
            .await
            .context("failed to fetch base fee")?;
        fee.max(MIN_BASE_FEE)
    } else {
        cli.base_fee
    };

    let mut settings = IssuanceSettings::default()
        .with_asset_code(cli.asset_code)
        .with_metadata(cli.data_name, cli.data_value)
        .with_base_fee(base_fee);
    if let Some(secs) = cli.timeout {
        settings = settings.with_timeout_secs(secs);
    }

    if cli.dry_run {
        let prepared = prepare_issuance(&horizon, &network, &settings, keys).await?;
        tracing::info!(asset = %prepared.asset, "Dry run, not submitting");
        return Ok(prepared.envelope.to_base64());
    }

    let issued = issue_asset(&horizon, &network, &settings, keys).await?;
    Ok(issued.asset.to_string())
}
