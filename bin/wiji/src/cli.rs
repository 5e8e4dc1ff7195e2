use alloy_core::primitives::Address;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use wiji_deploy::{
    DEFAULT_OUTDATA,
    framework::{DEFAULT_RECEIPT_TIMEOUT_SECS, DEFAULT_RPC_URL},
    services::{DEFAULT_SALE_ARTIFACT, DEFAULT_TOKEN_ARTIFACT},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OutData {
    TempDir,
    #[strum(default)]
    Path(String),
}

#[derive(Parser)]
#[command(name = "wiji")]
#[command(
    author,
    version,
    about = "Deploy the Wiji token and its ICO contract"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "WIJI_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The JSON-RPC endpoint of the target node.
    #[arg(long, alias = "rpc", env = "WIJI_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// The account sending the transactions.
    ///
    /// If not provided, the node's first unlocked account is used.
    #[arg(long, env = "WIJI_FROM")]
    pub from: Option<Address>,

    /// Path to the compiled token artifact.
    #[arg(long, env = "WIJI_TOKEN_ARTIFACT", default_value = DEFAULT_TOKEN_ARTIFACT)]
    pub token_artifact: String,

    /// Path to the compiled ICO artifact.
    #[arg(long, env = "WIJI_SALE_ARTIFACT", default_value = DEFAULT_SALE_ARTIFACT)]
    pub sale_artifact: String,

    /// Do not call `set_ico_address` on the token after the ICO is deployed.
    #[arg(long, env = "WIJI_NO_LINK")]
    pub no_link: bool,

    /// Extra blocks to wait for after each transaction is mined.
    #[arg(long, env = "WIJI_CONFIRMATIONS", default_value_t = 0)]
    pub confirmations: u64,

    /// Maximum time to wait for a transaction receipt, in seconds.
    #[arg(long, env = "WIJI_RECEIPT_TIMEOUT", default_value_t = DEFAULT_RECEIPT_TIMEOUT_SECS)]
    pub receipt_timeout: u64,

    /// The path to the output data directory, or `temp-dir`.
    ///
    /// If not provided, the data will be stored at: ./data-wiji
    #[arg(long, env = "WIJI_OUTDATA", default_value = DEFAULT_OUTDATA)]
    pub outdata: OutData,

    /// Path to an existing Wiji.toml configuration file (or its directory) to load.
    ///
    /// When provided, the deployment uses the configuration from this file instead of
    /// the arguments above. `WIJI_CONF_`-prefixed environment variables override file
    /// values, with `__` separating nested keys (e.g. `WIJI_CONF_NETWORK__RPC_URL`).
    #[arg(long, alias = "conf", env = "WIJI_CONFIG")]
    pub config: Option<String>,

    /// Run against a local in-memory chain instead of the RPC node.
    #[arg(long, env = "WIJI_DRY_RUN")]
    pub dry_run: bool,
}
