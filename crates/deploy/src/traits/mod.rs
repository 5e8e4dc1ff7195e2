//! Trait-based step architecture for the Wiji deployment.
//!
//! This module provides a trait-based approach to running deployment steps in a type-safe manner.
//! The deployment process follows a fixed stage order: Token -> Sale -> Link.
//!
//! # Example
//!
//! ```no_run
//! use wiji_deploy::{IcoLink, SaleDeployment, Sequence, TokenDeployment};
//!
//! let sequence = Sequence::new(TokenDeployment::default())
//!     .then(SaleDeployment::default())
//!     .then(IcoLink);
//! ```

mod context;
mod runner;
mod sequence;
mod service;
mod stages;
mod standard;

pub use context::{LinkContext, SaleContext, TokenContext};
pub use runner::{DeploymentResult, RunSequence};
pub use sequence::{End, Sequence};
pub use service::DeployStep;
pub use stages::{DeploymentStage, LinkStage, NextStage, SaleStage, TokenStage};
pub use standard::{LinkedSequence, UnlinkedSequence};
