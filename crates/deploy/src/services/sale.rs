//! ICO (sale) contract deployment step.

use std::path::PathBuf;

use alloy_core::primitives::Address;
use anyhow::Context;
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::{
    ArtifactSource, ContractFramework, ContractHandle, contracts,
    traits::{DeployStep, SaleContext, SaleStage},
};

/// Default path of the ICO artifact.
pub const DEFAULT_SALE_ARTIFACT: &str = "build/contracts/Wiji_ICO.json";

/// Configuration for the ICO deployment.
///
/// The ICO constructor takes the token address as its only argument, so this
/// step can only run once the token is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDeployment {
    /// The compiled ICO contract.
    pub artifact: ArtifactSource,
}

impl Default for SaleDeployment {
    fn default() -> Self {
        Self {
            artifact: ArtifactSource::Path(PathBuf::from(DEFAULT_SALE_ARTIFACT)),
        }
    }
}

/// Handle to the deployed ICO contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Deref)]
pub struct SaleHandle(pub ContractHandle);

impl SaleHandle {
    /// The token address the ICO was constructed with.
    pub fn token_address(&self) -> anyhow::Result<Address> {
        contracts::decode_sale_constructor_args(&self.constructor_args)
    }
}

impl DeployStep for SaleDeployment {
    type Stage = SaleStage;
    type Handler = SaleHandle;
    type Context<'a, F: ContractFramework + 'a> = SaleContext<'a, F>;

    const STEP_NAME: &'static str = "sale";

    async fn deploy<'a, F: ContractFramework + 'a>(
        self,
        ctx: Self::Context<'a, F>,
    ) -> anyhow::Result<Self::Handler>
    where
        Self: 'a,
    {
        let artifact = self.artifact.load().context("Failed to load ICO artifact")?;

        tracing::debug!(
            contract = %artifact.contract_name,
            token = %ctx.token.address,
            "Constructing ICO with token address"
        );

        let pending = ctx
            .framework
            .deploy(&artifact, contracts::sale_constructor_args(ctx.token.address))
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
            token = %ctx.token.address,
            "ICO contract deployed"
        );

        Ok(SaleHandle(handle))
    }
}
