//! Standard sequence type aliases for the two deployment variants.

use crate::{IcoLink, SaleDeployment, TokenDeployment};

use super::sequence::{End, Sequence};

/// Full Wiji deployment sequence.
///
/// 1. Deploy the token
/// 2. Deploy the ICO with the token address as constructor argument
/// 3. Call `set_ico_address` on the token with the ICO address
pub type LinkedSequence =
    Sequence<TokenDeployment, Sequence<SaleDeployment, Sequence<IcoLink, End>>>;

/// Deployment sequence without the final linking call.
///
/// Same as LinkedSequence but the token never learns the ICO address.
pub type UnlinkedSequence = Sequence<TokenDeployment, Sequence<SaleDeployment, End>>;

impl LinkedSequence {
    /// Create the linked sequence from the two contract steps.
    pub fn standard(token: TokenDeployment, sale: SaleDeployment) -> Self {
        Sequence::new(token).then(sale).then(IcoLink)
    }
}

impl UnlinkedSequence {
    /// Create the unlinked sequence from the two contract steps.
    pub fn standard(token: TokenDeployment, sale: SaleDeployment) -> Self {
        Sequence::new(token).then(sale)
    }
}
