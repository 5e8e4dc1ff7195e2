//! Deployment execution engine.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::context::{LinkContext, SaleContext, TokenContext};
use super::sequence::{End, Sequence};
use super::service::DeployStep;
use crate::{
    ContractFramework, IcoLink, LinkReceipt, SaleDeployment, SaleHandle, TokenDeployment,
    TokenHandle,
};

/// Result type for deployment sequences.
///
/// This struct provides named access to all handles produced by the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub token: TokenHandle,
    pub sale: SaleHandle,
    /// Present only when the sequence includes the link step.
    pub link: Option<LinkReceipt>,
}

/// Trait for running a sequence and collecting handles.
pub trait RunSequence {
    /// Run all steps in order against `framework`.
    fn run<F: ContractFramework>(
        self,
        framework: &F,
    ) -> impl std::future::Future<Output = Result<DeploymentResult>> + Send;
}

// Implementation for TokenDeployment -> SaleDeployment -> IcoLink
impl RunSequence for Sequence<TokenDeployment, Sequence<SaleDeployment, Sequence<IcoLink, End>>> {
    async fn run<F: ContractFramework>(self, framework: &F) -> Result<DeploymentResult> {
        // Stage 1: Deploy the token
        tracing::info!(step = TokenDeployment::STEP_NAME, "Deploying token contract...");
        let token = self.step.deploy(TokenContext { framework }).await?;

        // Stage 2: Deploy the sale, constructed with the token address
        tracing::info!(step = SaleDeployment::STEP_NAME, "Deploying ICO contract...");
        let sale_ctx = SaleContext {
            framework,
            token: &token,
        };
        let sale = self.next.step.deploy(sale_ctx).await?;

        // Stage 3: Tell the token where its sale lives
        tracing::info!(step = IcoLink::STEP_NAME, "Linking ICO address into token...");
        let link_ctx = LinkContext {
            framework,
            token: &token,
            sale: &sale,
        };
        let link = self.next.next.step.deploy(link_ctx).await?;

        Ok(DeploymentResult {
            token,
            sale,
            link: Some(link),
        })
    }
}

// Implementation for TokenDeployment -> SaleDeployment (no linking)
impl RunSequence for Sequence<TokenDeployment, Sequence<SaleDeployment, End>> {
    async fn run<F: ContractFramework>(self, framework: &F) -> Result<DeploymentResult> {
        // Stage 1: Deploy the token
        tracing::info!(step = TokenDeployment::STEP_NAME, "Deploying token contract...");
        let token = self.step.deploy(TokenContext { framework }).await?;

        // Stage 2: Deploy the sale, constructed with the token address
        tracing::info!(step = SaleDeployment::STEP_NAME, "Deploying ICO contract...");
        let sale_ctx = SaleContext {
            framework,
            token: &token,
        };
        let sale = self.next.step.deploy(sale_ctx).await?;

        tracing::warn!("ICO linking disabled: the token is not told the sale address");

        Ok(DeploymentResult {
            token,
            sale,
            link: None,
        })
    }
}
