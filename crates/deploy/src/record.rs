//! Deployment record written after a successful run.

use std::path::Path;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContractHandle, DeploymentResult, LinkReceipt, SequenceVariant};

/// The default name of the deployment record file.
pub const DEPLOYMENTS_FILENAME: &str = "deployments.json";

/// What a run deployed, where, and when.
///
/// Addresses are only ever recorded, never read back to skip a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub chain_id: u64,
    /// Account that sent the transactions.
    pub deployer: Address,
    pub variant: SequenceVariant,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub token: ContractHandle,
    pub sale: ContractHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkReceipt>,
    /// Crate version that produced this record.
    pub wiji_version: String,
}

impl DeploymentRecord {
    pub fn new(
        chain_id: u64,
        deployer: Address,
        variant: SequenceVariant,
        started_at: DateTime<Utc>,
        result: &DeploymentResult,
    ) -> Self {
        Self {
            chain_id,
            deployer,
            variant,
            started_at,
            completed_at: Utc::now(),
            token: result.token.0.clone(),
            sale: result.sale.0.clone(),
            link: result.link.clone(),
            wiji_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Save the record as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize deployment record")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write deployment record to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Deployment record saved");
        Ok(())
    }

    /// Load a record previously written by [`Self::save_to_file`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment record from {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse deployment record")
    }
}
