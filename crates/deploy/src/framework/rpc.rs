//! Framework backed by an EVM node's JSON-RPC endpoint.
//!
//! Transactions are sent from an account the node manages (`eth_sendTransaction`),
//! which is how local development nodes such as Anvil or Ganache are driven.
//! Signing and gas estimation stay with the node.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use alloy_core::primitives::{Address, B256, Bytes, U64};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::{ContractFramework, ContractHandle, PendingDeployment};
use crate::{ContractArtifact, rpc};

/// Default JSON-RPC endpoint (a local development node).
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Default time to wait for a transaction receipt, in seconds.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for [`RpcFramework`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFrameworkConfig {
    /// JSON-RPC endpoint of the target node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Sending account. Defaults to the node's first account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Extra blocks to wait for after a transaction is mined.
    #[serde(default)]
    pub confirmations: u64,
    /// Maximum time to wait for a transaction to be mined, in seconds.
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_receipt_timeout_secs() -> u64 {
    DEFAULT_RECEIPT_TIMEOUT_SECS
}

impl Default for RpcFrameworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            from: None,
            confirmations: 0,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
        }
    }
}

/// The subset of `eth_getTransactionReceipt` the framework relies on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: U64,
    /// `0x1` on success, `0x0` when the transaction reverted.
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub contract_address: Option<Address>,
}

impl TransactionReceipt {
    /// Whether the transaction executed successfully.
    ///
    /// Pre-Byzantium receipts carry no status and are treated as successful.
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| status == U64::from(1))
    }
}

/// Block the node must reach before a transaction mined in `block_number` has `confirmations`.
fn confirmation_target(block_number: U64, confirmations: u64) -> Result<u64> {
    block_number
        .to::<u64>()
        .checked_add(confirmations)
        .with_context(|| {
            format!("{} confirmations after block {} overflow", confirmations, block_number)
        })
}

/// [`crate::ContractFramework`] talking JSON-RPC to a node.
#[derive(Debug)]
pub struct RpcFramework {
    client: reqwest::Client,
    config: RpcFrameworkConfig,
    from: Address,
    chain_id: u64,
    /// Deployments confirmed by this instance. Not shared across runs.
    registry: Mutex<HashMap<String, ContractHandle>>,
}

impl RpcFramework {
    /// Connect to the node, resolving the sending account and chain ID.
    pub async fn connect(config: RpcFrameworkConfig) -> Result<Self> {
        let url = Url::parse(&config.rpc_url)
            .with_context(|| format!("Invalid RPC URL: {}", config.rpc_url))?;
        let url = url.as_str();
        let client = rpc::create_client()?;

        let chain_id: U64 = rpc::json_rpc_call(&client, url, "eth_chainId", vec![])
            .await
            .context("Failed to fetch chain ID")?;

        let from = match config.from {
            Some(from) => from,
            None => {
                let accounts: Vec<Address> =
                    rpc::json_rpc_call(&client, url, "eth_accounts", vec![])
                        .await
                        .context("Failed to fetch node accounts")?;
                *accounts
                    .first()
                    .context("Node has no unlocked accounts and no sender was configured")?
            }
        };

        let chain_id = chain_id.to::<u64>();

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id,
            from = %from,
            "Connected to node"
        );

        Ok(Self {
            client,
            config,
            from,
            chain_id,
            registry: Mutex::new(HashMap::new()),
        })
    }

    async fn send_raw(&self, to: Option<Address>, data: &Bytes) -> Result<B256> {
        let mut tx = json!({
            "from": self.from,
            "data": data,
        });
        if let Some(to) = to {
            tx["to"] = json!(to);
        }

        rpc::json_rpc_call(
            &self.client,
            self.config.rpc_url.as_str(),
            "eth_sendTransaction",
            vec![tx],
        )
        .await
    }

    async fn fetch_receipt(&self, transaction_hash: B256) -> Result<Option<TransactionReceipt>> {
        rpc::json_rpc_call(
            &self.client,
            self.config.rpc_url.as_str(),
            "eth_getTransactionReceipt",
            vec![json!(transaction_hash)],
        )
        .await
    }

    async fn block_number(&self) -> Result<u64> {
        let number: U64 = rpc::json_rpc_call(
            &self.client,
            self.config.rpc_url.as_str(),
            "eth_blockNumber",
            vec![],
        )
        .await?;
        Ok(number.to::<u64>())
    }

    /// Wait until `transaction_hash` is mined (plus the configured confirmations) and succeeded.
    async fn wait_for_receipt(&self, transaction_hash: B256) -> Result<TransactionReceipt> {
        let timeout = Duration::from_secs(self.config.receipt_timeout_secs);
        let name = format!("receipt of {}", transaction_hash);

        let receipt = rpc::poll_until(&name, timeout, rpc::DEFAULT_POLL_INTERVAL, move || {
            self.fetch_receipt(transaction_hash)
        })
        .await?;

        if !receipt.succeeded() {
            anyhow::bail!("Transaction {} reverted", transaction_hash);
        }

        if self.config.confirmations > 0 {
            let target = confirmation_target(receipt.block_number, self.config.confirmations)?;
            let name = format!(
                "{} confirmations of {}",
                self.config.confirmations, transaction_hash
            );

            let this = self;
            rpc::poll_until(&name, timeout, rpc::DEFAULT_POLL_INTERVAL, move || async move {
                Ok((this.block_number().await? >= target).then_some(()))
            })
            .await?;
        }

        tracing::debug!(
            %transaction_hash,
            block_number = receipt.block_number.to::<u64>(),
            "Transaction confirmed"
        );

        Ok(receipt)
    }
}

impl ContractFramework for RpcFramework {
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<PendingDeployment> {
        let data = artifact.creation_data(&constructor_args);
        let transaction_hash = self
            .send_raw(None, &data)
            .await
            .with_context(|| {
                format!("Failed to send creation transaction for {}", artifact.contract_name)
            })?;

        tracing::debug!(
            contract = %artifact.contract_name,
            %transaction_hash,
            "Creation transaction sent"
        );

        Ok(PendingDeployment {
            contract_name: artifact.contract_name.clone(),
            transaction_hash,
            constructor_args,
        })
    }

    async fn confirm(&self, pending: PendingDeployment) -> Result<ContractHandle> {
        let receipt = self.wait_for_receipt(pending.transaction_hash).await?;
        let address = receipt.contract_address.with_context(|| {
            format!(
                "Receipt of {} has no contract address",
                pending.transaction_hash
            )
        })?;

        let handle = ContractHandle {
            contract_name: pending.contract_name,
            address,
            transaction_hash: pending.transaction_hash,
            constructor_args: pending.constructor_args,
        };

        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.contract_name.clone(), handle.clone());

        Ok(handle)
    }

    fn deployed(&self, contract_name: &str) -> Result<ContractHandle> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(contract_name)
            .cloned()
            .with_context(|| format!("{} has not been deployed", contract_name))
    }

    async fn send_transaction(&self, to: Address, calldata: Bytes) -> Result<B256> {
        let transaction_hash = self
            .send_raw(Some(to), &calldata)
            .await
            .with_context(|| format!("Failed to send transaction to {}", to))?;

        self.wait_for_receipt(transaction_hash).await?;

        Ok(transaction_hash)
    }

    fn sender(&self) -> Address {
        self.from
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_success() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "blockNumber": "0x10",
            "status": "0x1",
            "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "gasUsed": "0x5208"
        }))
        .unwrap();

        assert!(receipt.succeeded());
        assert_eq!(receipt.block_number.to::<u64>(), 16);
        assert!(receipt.contract_address.is_some());
    }

    #[test]
    fn test_receipt_reverted() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": "0x0000000000000000000000000000000000000000000000000000000000000002",
            "blockNumber": "0x1",
            "status": "0x0",
            "contractAddress": null
        }))
        .unwrap();

        assert!(!receipt.succeeded());
        assert!(receipt.contract_address.is_none());
    }

    #[test]
    fn test_pending_receipt_is_null() {
        let receipt: Option<TransactionReceipt> = serde_json::from_value(json!(null)).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn test_confirmation_target() {
        assert_eq!(confirmation_target(U64::from(16), 2).unwrap(), 18);
        assert!(confirmation_target(U64::from(16), u64::MAX).is_err());
    }

    #[test]
    fn test_config_defaults_from_partial_toml() {
        let config: RpcFrameworkConfig =
            toml::from_str(r#"rpc_url = "http://127.0.0.1:7545""#).unwrap();

        assert_eq!(config.rpc_url, "http://127.0.0.1:7545");
        assert_eq!(config.from, None);
        assert_eq!(config.confirmations, 0);
        assert_eq!(config.receipt_timeout_secs, DEFAULT_RECEIPT_TIMEOUT_SECS);
    }
}
