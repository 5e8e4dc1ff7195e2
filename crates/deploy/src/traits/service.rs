//! Core step trait for the deployment sequence.

use std::future::Future;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use super::stages::DeploymentStage;
use crate::ContractFramework;

/// Core trait for deployment steps.
///
/// A step turns its configuration into a handle by acting on the chain through
/// the framework found in its context. The `Stage` associated type determines
/// where in the sequence this step can run.
///
/// # Type Parameters
/// - `Stage`: The deployment stage this step belongs to
/// - `Handler`: What the step hands to the steps after it
/// - `Context`: Stage-specific deployment context
pub trait DeployStep: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The deployment stage this step belongs to.
    type Stage: DeploymentStage;

    /// The handle returned after the step is confirmed.
    type Handler: Send + 'static;

    /// The context type required to run the step.
    type Context<'a, F: ContractFramework + 'a>;

    /// The name of this step for logging/identification.
    const STEP_NAME: &'static str;

    /// Run the step, returning its handle once the chain has confirmed it.
    fn deploy<'a, F: ContractFramework + 'a>(
        self,
        ctx: Self::Context<'a, F>,
    ) -> impl Future<Output = Result<Self::Handler>> + Send + 'a
    where
        Self: 'a;
}
