//! Post-deployment linking step: tell the token where its ICO lives.

use alloy_core::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::{
    ContractFramework,
    traits::{DeployStep, LinkContext, LinkStage},
};

/// Configuration for the link step. It has no settings of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcoLink;

/// Outcome of the `set_ico_address` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReceipt {
    pub token: Address,
    pub ico_address: Address,
    pub transaction_hash: B256,
}

impl DeployStep for IcoLink {
    type Stage = LinkStage;
    type Handler = LinkReceipt;
    type Context<'a, F: ContractFramework + 'a> = LinkContext<'a, F>;

    const STEP_NAME: &'static str = "link";

    async fn deploy<'a, F: ContractFramework + 'a>(
        self,
        ctx: Self::Context<'a, F>,
    ) -> anyhow::Result<Self::Handler>
    where
        Self: 'a,
    {
        let transaction_hash = ctx
            .token
            .set_ico_address(ctx.framework, ctx.sale.address)
            .await?;

        tracing::info!(
            token = %ctx.token.address,
            ico_address = %ctx.sale.address,
            %transaction_hash,
            "ICO address set on token"
        );

        Ok(LinkReceipt {
            token: ctx.token.address,
            ico_address: ctx.sale.address,
            transaction_hash,
        })
    }
}
