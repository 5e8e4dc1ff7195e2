//! wiji-deploy - Deployment library for the Wiji token and its ICO.
//!
//! This crate deploys the token contract, then the ICO contract constructed with
//! the token address, and optionally tells the token the ICO address. Every step
//! waits for the previous one to be confirmed and the first failure aborts the run.

mod artifact;
pub use artifact::{ArtifactSource, ContractArtifact};

mod builder;
pub use builder::{DEFAULT_OUTDATA, DeployerBuilder, OutDataPath};

pub mod contracts;

mod deployer;
pub use deployer::{Deployer, SequenceVariant, WIJI_CONF_FILENAME, resolve_config_path};

pub mod framework;
pub use framework::{
    ContractFramework, ContractHandle, InMemoryChain, PendingDeployment, RpcFramework,
    RpcFrameworkConfig,
};

mod record;
pub use record::{DEPLOYMENTS_FILENAME, DeploymentRecord};

pub mod rpc;

pub mod services;
pub use services::{
    IcoLink, LinkReceipt, SaleDeployment, SaleHandle, TokenDeployment, TokenHandle,
};

pub mod traits;
pub use traits::{
    DeployStep, DeploymentResult, End, LinkedSequence, RunSequence, Sequence, UnlinkedSequence,
};
