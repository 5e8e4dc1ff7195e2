//! Token contract deployment step.

use std::path::PathBuf;

use alloy_core::primitives::{Address, B256, Bytes};
use anyhow::Context;
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::{
    ArtifactSource, ContractFramework, ContractHandle, contracts,
    traits::{DeployStep, TokenContext, TokenStage},
};

/// Default path of the token artifact.
pub const DEFAULT_TOKEN_ARTIFACT: &str = "build/contracts/Wiji.json";

/// Configuration for the token deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeployment {
    /// The compiled token contract.
    pub artifact: ArtifactSource,
}

impl Default for TokenDeployment {
    fn default() -> Self {
        Self {
            artifact: ArtifactSource::Path(PathBuf::from(DEFAULT_TOKEN_ARTIFACT)),
        }
    }
}

/// Handle to the deployed token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Deref)]
pub struct TokenHandle(pub ContractHandle);

impl TokenHandle {
    /// Call `set_ico_address(ico_address)` on the token and wait for it to be confirmed.
    pub async fn set_ico_address<F: ContractFramework>(
        &self,
        framework: &F,
        ico_address: Address,
    ) -> anyhow::Result<B256> {
        framework
            .send_transaction(self.address, contracts::set_ico_address_calldata(ico_address))
            .await
            .with_context(|| {
                format!(
                    "Failed to set ICO address {} on {} at {}",
                    ico_address, self.contract_name, self.address
                )
            })
    }
}

impl DeployStep for TokenDeployment {
    type Stage = TokenStage;
    type Handler = TokenHandle;
    type Context<'a, F: ContractFramework + 'a> = TokenContext<'a, F>;

    const STEP_NAME: &'static str = "token";

    async fn deploy<'a, F: ContractFramework + 'a>(
        self,
        ctx: Self::Context<'a, F>,
    ) -> anyhow::Result<Self::Handler>
    where
        Self: 'a,
    {
        let artifact = self.artifact.load().context("Failed to load token artifact")?;

        let pending = ctx
            .framework
            .deploy(&artifact, Bytes::new())
            .await
            .with_context(|| format!("Failed to deploy {}", artifact.contract_name))?;

        ctx.framework
            .confirm(pending)
            .await
            .with_context(|| {
                format!("Failed to confirm deployment of {}", artifact.contract_name)
            })?;

        let handle = ctx.framework.deployed(&artifact.contract_name)?;

        tracing::info!(
            contract = %handle.contract_name,
            address = %handle.address,
            transaction_hash = %handle.transaction_hash,
            "Token contract deployed"
        );

        Ok(TokenHandle(handle))
    }
}
