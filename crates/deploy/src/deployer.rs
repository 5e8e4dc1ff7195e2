use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    ContractFramework, DeploymentRecord, DeploymentResult, LinkedSequence, RpcFramework,
    RpcFrameworkConfig, RunSequence, SaleDeployment, TokenDeployment, UnlinkedSequence,
    record::DEPLOYMENTS_FILENAME,
};

/// The default name for the wiji configuration file.
pub const WIJI_CONF_FILENAME: &str = "Wiji.toml";

/// Which version of the deployment procedure to run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SequenceVariant {
    /// Deploy both contracts, then call `set_ico_address` on the token.
    Linked,
    /// Deploy both contracts only.
    Unlinked,
}

fn default_link_ico() -> bool {
    true
}

/// Main deployer that orchestrates the Wiji token and ICO deployment.
///
/// This struct contains all the configuration needed to run a deployment
/// and can be serialized to/from TOML format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployer {
    /// Path to the output data directory.
    pub outdata: PathBuf,
    /// Whether to call `set_ico_address` on the token once the ICO is deployed.
    #[serde(default = "default_link_ico")]
    pub link_ico: bool,

    /// Connection to the target node.
    #[serde(default)]
    pub network: RpcFrameworkConfig,
    /// Configuration for the token deployment.
    #[serde(default)]
    pub token: TokenDeployment,
    /// Configuration for the ICO deployment.
    #[serde(default)]
    pub sale: SaleDeployment,
}

/// Resolve a configuration path, accepting either the file or the directory holding it.
pub fn resolve_config_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(WIJI_CONF_FILENAME)
    } else {
        path.to_path_buf()
    }
}

impl Deployer {
    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deployer config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = resolve_config_path(path);

        let content = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config from {}", config_path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %config_path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save the deployer's configuration to the default location (Wiji.toml in outdata).
    pub fn save_config(&self) -> Result<PathBuf> {
        let config_path = self.outdata.join(WIJI_CONF_FILENAME);
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// The variant selected by `link_ico`.
    pub fn variant(&self) -> SequenceVariant {
        if self.link_ico {
            SequenceVariant::Linked
        } else {
            SequenceVariant::Unlinked
        }
    }

    /// Connect to the configured node and run the deployment.
    pub async fn deploy(self) -> Result<DeploymentResult> {
        let framework = RpcFramework::connect(self.network.clone())
            .await
            .context("Failed to connect to the RPC node")?;

        self.deploy_with(&framework).await
    }

    /// Run the deployment against `framework`.
    ///
    /// Steps run strictly in order and the first failure aborts the run.
    /// Contracts already deployed at that point stay deployed.
    pub async fn deploy_with<F: ContractFramework>(
        self,
        framework: &F,
    ) -> Result<DeploymentResult> {
        let variant = self.variant();
        let started_at = chrono::Utc::now();

        tracing::info!(
            %variant,
            chain_id = framework.chain_id(),
            sender = %framework.sender(),
            "Starting deployment process..."
        );

        let result = match variant {
            SequenceVariant::Linked => {
                LinkedSequence::standard(self.token, self.sale)
                    .run(framework)
                    .await?
            }
            SequenceVariant::Unlinked => {
                UnlinkedSequence::standard(self.token, self.sale)
                    .run(framework)
                    .await?
            }
        };

        std::fs::create_dir_all(&self.outdata)
            .context("Failed to create output data directory")?;
        DeploymentRecord::new(
            framework.chain_id(),
            framework.sender(),
            variant,
            started_at,
            &result,
        )
        .save_to_file(&self.outdata.join(DEPLOYMENTS_FILENAME))?;

        tracing::info!("✓ Deployment complete!");
        tracing::info!("Token:  {}", result.token.address);
        tracing::info!("ICO:    {}", result.sale.address);
        match &result.link {
            Some(link) => tracing::info!("Linked: {}", link.transaction_hash),
            None => tracing::info!("Linked: no"),
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn deployer(outdata: PathBuf) -> Deployer {
        Deployer {
            outdata,
            link_ico: true,
            network: RpcFrameworkConfig::default(),
            token: TokenDeployment::default(),
            sale: SaleDeployment::default(),
        }
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        let original = Deployer {
            link_ico: false,
            ..deployer(temp_dir.path().to_path_buf())
        };

        let path = original.save_config().expect("Failed to save config");
        assert_eq!(path, temp_dir.path().join(WIJI_CONF_FILENAME));

        let from_file = Deployer::load_from_file(&path).expect("Failed to load config");
        let from_dir = Deployer::load_from_file(temp_dir.path()).expect("Failed to load config");

        assert_eq!(original, from_file);
        assert_eq!(original, from_dir);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Deployer = toml::from_str(r#"outdata = "/tmp/wiji""#).unwrap();

        assert!(config.link_ico);
        assert_eq!(config.variant(), SequenceVariant::Linked);
        assert_eq!(config.token, TokenDeployment::default());
        assert_eq!(config.sale, SaleDeployment::default());
        assert_eq!(config.network, RpcFrameworkConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        assert!(Deployer::load_from_file(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_variant_from_flag() {
        let mut config = deployer(PathBuf::from("/tmp/wiji"));
        assert_eq!(config.variant(), SequenceVariant::Linked);
        config.link_ico = false;
        assert_eq!(config.variant(), SequenceVariant::Unlinked);
        assert_eq!(SequenceVariant::Unlinked.to_string(), "unlinked");
    }
}
