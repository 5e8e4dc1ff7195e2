//! Step modules for the Wiji deployment.
//!
//! Each step is in its own module with its configuration, the handle it
//! produces and its `DeployStep` implementation.

pub mod link;
pub mod sale;
pub mod token;

// Re-export commonly used types
pub use link::{IcoLink, LinkReceipt};
pub use sale::{DEFAULT_SALE_ARTIFACT, SaleDeployment, SaleHandle};
pub use token::{DEFAULT_TOKEN_ARTIFACT, TokenDeployment, TokenHandle};
