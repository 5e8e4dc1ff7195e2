//! wiji deploys the Wiji token and its ICO contract to an EVM node.

mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};

use cli::{Cli, OutData};
use wiji_deploy::{
    Deployer, DeployerBuilder, DeploymentResult, InMemoryChain, OutDataPath, resolve_config_path,
};

/// Prefix of the environment variables overriding a loaded config file.
///
/// Distinct from the `WIJI_*` flag fallbacks, which only apply when building from arguments.
const CONFIG_ENV_PREFIX: &str = "WIJI_CONF_";

/// Load a deployer configuration, letting `WIJI_CONF_*` environment variables override the file.
fn load_config(config_path: &Path) -> Result<Deployer> {
    let config_path = resolve_config_path(config_path);
    if !config_path.is_file() {
        anyhow::bail!("Config file {} does not exist", config_path.display());
    }

    Figment::new()
        .merge(Toml::file(&config_path))
        .merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"))
        .extract()
        .with_context(|| format!("Failed to load config from {}", config_path.display()))
}

fn build_from_cli(cli: &Cli) -> Result<Deployer> {
    let outdata = match &cli.outdata {
        OutData::TempDir => OutDataPath::TempDir,
        OutData::Path(path) => OutDataPath::Path(PathBuf::from(path)),
    };

    let mut builder = DeployerBuilder::new()
        .rpc_url(cli.rpc_url.clone())
        .confirmations(cli.confirmations)
        .receipt_timeout_secs(cli.receipt_timeout)
        .token_artifact(PathBuf::from(&cli.token_artifact))
        .sale_artifact(PathBuf::from(&cli.sale_artifact))
        .link_ico(!cli.no_link)
        .outdata(outdata);

    if let Some(from) = cli.from {
        builder = builder.from(from);
    }

    builder.build()
}

fn print_summary(result: &DeploymentResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Step", "Contract", "Address", "Transaction"]);

    table.add_row(vec![
        "token".to_string(),
        result.token.contract_name.clone(),
        result.token.address.to_string(),
        result.token.transaction_hash.to_string(),
    ]);
    table.add_row(vec![
        "sale".to_string(),
        result.sale.contract_name.clone(),
        result.sale.address.to_string(),
        result.sale.transaction_hash.to_string(),
    ]);
    if let Some(link) = &result.link {
        table.add_row(vec![
            "link".to_string(),
            result.token.contract_name.clone(),
            link.token.to_string(),
            link.transaction_hash.to_string(),
        ]);
    }

    println!("{table}");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let deployer = match &cli.config {
        Some(config_path) => {
            let deployer = load_config(Path::new(config_path))?;

            tracing::info!(
                config_path = %config_path,
                outdata_path = %deployer.outdata.display(),
                variant = %deployer.variant(),
                "Loading deployment from config file..."
            );

            deployer
        }
        None => {
            let deployer = build_from_cli(&cli)?;
            // Save the configuration to Wiji.toml before deploying
            deployer.save_config()?;
            deployer
        }
    };

    let result = if cli.dry_run {
        tracing::info!("Dry run: deploying to an in-memory chain");
        deployer.deploy_with(&InMemoryChain::new()).await?
    } else {
        deployer.deploy().await?
    };

    print_summary(&result);

    Ok(())
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use tempdir::TempDir;
    use wiji_deploy::{SequenceVariant, WIJI_CONF_FILENAME};

    use super::*;

    #[test]
    fn test_load_config_from_directory() {
        Jail::expect_with(|_| {
            let temp_dir = TempDir::new("wiji-cli-test").map_err(|e| e.to_string())?;
            let deployer = DeployerBuilder::new()
                .link_ico(false)
                .outdata_path(temp_dir.path())
                .build()
                .map_err(|e| e.to_string())?;
            deployer.save_config().map_err(|e| e.to_string())?;

            let loaded = load_config(temp_dir.path()).map_err(|e| e.to_string())?;
            assert_eq!(loaded.outdata, deployer.outdata);
            assert_eq!(loaded.variant(), SequenceVariant::Unlinked);
            assert!(temp_dir.path().join(WIJI_CONF_FILENAME).exists());

            Ok(())
        });
    }

    #[test]
    fn test_flag_env_vars_do_not_override_config_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                WIJI_CONF_FILENAME,
                r#"
                outdata = "/srv/wiji/saved"
                link_ico = true

                [network]
                rpc_url = "http://10.0.0.1:8545"
                "#,
            )?;
            jail.set_env("WIJI_OUTDATA", "temp-dir");
            jail.set_env("WIJI_CONF_LINK_ICO", "false");
            jail.set_env("WIJI_CONF_NETWORK__CONFIRMATIONS", "3");

            let loaded = load_config(Path::new(WIJI_CONF_FILENAME)).map_err(|e| e.to_string())?;
            assert_eq!(loaded.outdata, PathBuf::from("/srv/wiji/saved"));
            assert_eq!(loaded.network.rpc_url, "http://10.0.0.1:8545");
            assert_eq!(loaded.network.confirmations, 3);
            assert_eq!(loaded.variant(), SequenceVariant::Unlinked);

            Ok(())
        });
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp_dir = TempDir::new("wiji-cli-test").unwrap();
        assert!(load_config(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[tokio::test]
    async fn test_dry_run_from_cli_arguments() -> Result<()> {
        let temp_dir = TempDir::new("wiji-cli-test")?;
        let build_dir = temp_dir.path().join("build");
        std::fs::create_dir_all(&build_dir)?;
        std::fs::write(
            build_dir.join("Wiji.json"),
            r#"{"contractName": "Wiji", "abi": [], "bytecode": "0x6080"}"#,
        )?;
        std::fs::write(
            build_dir.join("Wiji_ICO.json"),
            r#"{"contractName": "Wiji_ICO", "abi": [], "bytecode": "0x6081"}"#,
        )?;

        let token = build_dir.join("Wiji.json");
        let sale = build_dir.join("Wiji_ICO.json");
        let outdata = temp_dir.path().join("out");
        let cli = Cli::parse_from([
            "wiji".to_string(),
            "--token-artifact".to_string(),
            token.display().to_string(),
            "--sale-artifact".to_string(),
            sale.display().to_string(),
            "--outdata".to_string(),
            outdata.display().to_string(),
            "--dry-run".to_string(),
        ]);

        let result = build_from_cli(&cli)?
            .deploy_with(&InMemoryChain::new())
            .await?;
        assert!(result.link.is_some());
        assert!(outdata.join("deployments.json").exists());

        Ok(())
    }
}
