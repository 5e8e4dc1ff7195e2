//! Deployment stage markers for type-state pattern.
//!
//! The deployment order is fixed: Token -> Sale -> Link
//! Each stage provides context required by subsequent stages.

use serde::{Deserialize, Serialize};

/// Marker for the token contract deployment stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenStage;

/// Marker for the sale (ICO) contract deployment stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SaleStage;

/// Marker for the post-deployment linking stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinkStage;

/// Sealed trait for deployment stages.
mod sealed {
    pub trait Sealed {}
    impl Sealed for super::TokenStage {}
    impl Sealed for super::SaleStage {}
    impl Sealed for super::LinkStage {}
}

/// Marker trait for valid deployment stages.
pub trait DeploymentStage: sealed::Sealed + Default + Clone + Send + Sync + 'static {}

impl DeploymentStage for TokenStage {}
impl DeploymentStage for SaleStage {}
impl DeploymentStage for LinkStage {}

/// Trait encoding valid stage transitions.
///
/// This is implemented only for valid transitions:
/// - TokenStage -> SaleStage
/// - SaleStage -> LinkStage
pub trait NextStage: DeploymentStage {
    type Next: DeploymentStage;
}

impl NextStage for TokenStage {
    type Next = SaleStage;
}

impl NextStage for SaleStage {
    type Next = LinkStage;
}

// LinkStage has no NextStage impl - it's terminal
