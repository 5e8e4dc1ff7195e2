//! Solidity bindings for the calls the sequencer makes into the Wiji contracts.

use alloy_core::primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue, sol};
use anyhow::{Context, Result};

sol! {
    /// Tells the token which contract runs its sale.
    function set_ico_address(address ico_address) external;
}

/// ABI-encode the Wiji ICO constructor arguments (the token address).
pub fn sale_constructor_args(token: Address) -> Bytes {
    token.abi_encode().into()
}

/// Decode the Wiji ICO constructor arguments back into the token address.
pub fn decode_sale_constructor_args(args: &[u8]) -> Result<Address> {
    Address::abi_decode(args, true).context("Invalid Wiji ICO constructor arguments")
}

/// Calldata for `set_ico_address(ico_address)`.
pub fn set_ico_address_calldata(ico_address: Address) -> Bytes {
    set_ico_addressCall { ico_address }.abi_encode().into()
}

/// Returns the ICO address if `calldata` is a `set_ico_address` call.
pub fn decode_set_ico_address(calldata: &[u8]) -> Option<Address> {
    if calldata.len() < 4 || calldata[..4] != set_ico_addressCall::SELECTOR {
        return None;
    }

    set_ico_addressCall::abi_decode(calldata, true)
        .ok()
        .map(|call| call.ico_address)
}
