//! Deployment context passed between stages.

use crate::{SaleHandle, TokenHandle};

/// Context available at the token stage (minimal).
pub struct TokenContext<'a, F> {
    pub framework: &'a F,
}

/// Context after the token is deployed.
pub struct SaleContext<'a, F> {
    pub framework: &'a F,
    pub token: &'a TokenHandle,
}

/// Context after both contracts are deployed.
pub struct LinkContext<'a, F> {
    pub framework: &'a F,
    pub token: &'a TokenHandle,
    pub sale: &'a SaleHandle,
}
