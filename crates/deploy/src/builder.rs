//! Builder module for creating a [`Deployer`] configuration.
//!
//! This module provides the [`DeployerBuilder`] struct which simplifies the creation
//! of a [`Deployer`] by handling output directory creation and artifact locations.

use std::path::PathBuf;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};

use crate::{
    ArtifactSource, Deployer, RpcFrameworkConfig, SaleDeployment, TokenDeployment,
    framework::DEFAULT_RECEIPT_TIMEOUT_SECS,
};

/// Specifies how the output data directory should be created.
#[derive(Debug, Clone)]
pub enum OutDataPath {
    /// Use a fresh temporary directory that is kept after the run.
    TempDir,
    /// Use a specific path.
    Path(PathBuf),
}

/// Default output directory when none is given.
pub const DEFAULT_OUTDATA: &str = "data-wiji";

/// Builder for creating a [`Deployer`] configuration.
///
/// # Example
///
/// ```no_run
/// use wiji_deploy::DeployerBuilder;
///
/// # fn example() -> anyhow::Result<()> {
/// let deployer = DeployerBuilder::new()
///     .rpc_url("http://localhost:7545")
///     .token_artifact("build/contracts/Wiji.json")
///     .sale_artifact("build/contracts/Wiji_ICO.json")
///     .link_ico(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeployerBuilder {
    /// The node RPC URL.
    rpc_url: Option<String>,
    /// The sending account (optional, the node's first account otherwise).
    from: Option<Address>,
    /// Extra blocks to wait for after each transaction.
    confirmations: u64,
    /// Receipt timeout in seconds.
    receipt_timeout_secs: u64,
    /// Token artifact (optional, default path otherwise).
    token_artifact: Option<ArtifactSource>,
    /// ICO artifact (optional, default path otherwise).
    sale_artifact: Option<ArtifactSource>,
    /// Whether to link the ICO address into the token.
    link_ico: bool,
    /// The output data path specification.
    outdata: Option<OutDataPath>,
}

impl Default for DeployerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployerBuilder {
    /// Create a new [`DeployerBuilder`] with default settings.
    pub fn new() -> Self {
        Self {
            rpc_url: None,
            from: None,
            confirmations: 0,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
            token_artifact: None,
            sale_artifact: None,
            link_ico: true,
            outdata: None,
        }
    }

    /// Set the node RPC URL.
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the account sending the transactions.
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set how many extra blocks to wait for after each transaction is mined.
    pub fn confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Set how long to wait for a transaction receipt.
    pub fn receipt_timeout_secs(mut self, secs: u64) -> Self {
        self.receipt_timeout_secs = secs;
        self
    }

    /// Set the token artifact (a path or an in-memory artifact).
    pub fn token_artifact(mut self, artifact: impl Into<ArtifactSource>) -> Self {
        self.token_artifact = Some(artifact.into());
        self
    }

    /// Set the ICO artifact (a path or an in-memory artifact).
    pub fn sale_artifact(mut self, artifact: impl Into<ArtifactSource>) -> Self {
        self.sale_artifact = Some(artifact.into());
        self
    }

    /// Enable or disable the `set_ico_address` call after both deployments.
    pub fn link_ico(mut self, link_ico: bool) -> Self {
        self.link_ico = link_ico;
        self
    }

    /// Set the output data directory path.
    ///
    /// If not set, defaults to `./data-wiji`.
    pub fn outdata(mut self, outdata: OutDataPath) -> Self {
        self.outdata = Some(outdata);
        self
    }

    /// Set the output data directory to a specific path.
    pub fn outdata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.outdata = Some(OutDataPath::Path(path.into()));
        self
    }

    /// Build the [`Deployer`] configuration.
    ///
    /// This method creates the output data directory if it doesn't exist.
    pub fn build(self) -> Result<Deployer> {
        // Determine output data path
        let outdata_path = match self.outdata {
            None => PathBuf::from(DEFAULT_OUTDATA),
            Some(OutDataPath::TempDir) => tempdir::TempDir::new("data-wiji-")
                .context("Failed to create temporary directory")?
                .into_path(),
            Some(OutDataPath::Path(path)) => path,
        };

        // Create the output data directory if it doesn't exist
        if !outdata_path.try_exists().context(format!(
            "Failed to check if output data directory exists at path {}. Ensure you provided valid permissions to the directory.",
            outdata_path.display()
        ))? {
            std::fs::create_dir_all(&outdata_path)
                .context("Failed to create output data directory")?;
        }

        let outdata_path = outdata_path
            .canonicalize()
            .context("Failed to canonicalize output data directory path")?;

        let mut network = RpcFrameworkConfig {
            from: self.from,
            confirmations: self.confirmations,
            receipt_timeout_secs: self.receipt_timeout_secs,
            ..Default::default()
        };
        if let Some(rpc_url) = self.rpc_url {
            network.rpc_url = rpc_url;
        }

        tracing::info!(
            rpc_url = %network.rpc_url,
            link_ico = self.link_ico,
            outdata_path = %outdata_path.display(),
            "Building Wiji deployer configuration..."
        );

        Ok(Deployer {
            outdata: outdata_path,
            link_ico: self.link_ico,
            network,
            token: self
                .token_artifact
                .map(|artifact| TokenDeployment { artifact })
                .unwrap_or_default(),
            sale: self
                .sale_artifact
                .map(|artifact| SaleDeployment { artifact })
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = DeployerBuilder::new();
        assert!(builder.rpc_url.is_none());
        assert!(builder.from.is_none());
        assert_eq!(builder.confirmations, 0);
        assert!(builder.token_artifact.is_none());
        assert!(builder.sale_artifact.is_none());
        assert!(builder.link_ico);
        assert!(builder.outdata.is_none());
    }

    #[test]
    fn test_builder_with_options() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        let outdata = temp_dir.path().join("nested/out");

        let deployer = DeployerBuilder::new()
            .rpc_url("http://127.0.0.1:7545")
            .from(Address::repeat_byte(0x07))
            .confirmations(2)
            .token_artifact(PathBuf::from("a/Wiji.json"))
            .sale_artifact(PathBuf::from("a/Wiji_ICO.json"))
            .link_ico(false)
            .outdata_path(&outdata)
            .build()
            .expect("Failed to build deployer");

        assert!(outdata.exists(), "Output directory should be created");
        assert_eq!(deployer.outdata, outdata.canonicalize().unwrap());
        assert_eq!(deployer.network.rpc_url, "http://127.0.0.1:7545");
        assert_eq!(deployer.network.from, Some(Address::repeat_byte(0x07)));
        assert_eq!(deployer.network.confirmations, 2);
        assert_eq!(
            deployer.token.artifact,
            ArtifactSource::Path(PathBuf::from("a/Wiji.json"))
        );
        assert!(!deployer.link_ico);
    }

    #[test]
    fn test_builder_accepts_str_artifact_paths() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");

        let deployer = DeployerBuilder::new()
            .token_artifact("build/contracts/Wiji.json")
            .sale_artifact("build/contracts/Wiji_ICO.json")
            .outdata_path(temp_dir.path())
            .build()
            .expect("Failed to build deployer");

        assert_eq!(
            deployer.sale.artifact,
            ArtifactSource::Path(PathBuf::from("build/contracts/Wiji_ICO.json"))
        );
    }

    #[test]
    fn test_builder_temp_dir_outdata() {
        let deployer = DeployerBuilder::new()
            .outdata(OutDataPath::TempDir)
            .build()
            .expect("Failed to build deployer");

        assert!(deployer.outdata.exists());
        std::fs::remove_dir_all(&deployer.outdata).unwrap();
    }
}
