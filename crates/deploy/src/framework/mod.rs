//! The deployment framework capability.
//!
//! The sequencer never talks to a chain directly. It is handed a
//! [`ContractFramework`], which publishes contracts, waits for their
//! confirmation and keeps track of what has been deployed during the run.

mod memory;
mod rpc;

use std::future::Future;

use alloy_core::primitives::{Address, B256, Bytes};
use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ContractArtifact;

pub use memory::{DEFAULT_CHAIN_ID, InMemoryChain, SentCall};
pub use rpc::{
    DEFAULT_RECEIPT_TIMEOUT_SECS, DEFAULT_RPC_URL, RpcFramework, RpcFrameworkConfig,
    TransactionReceipt,
};

/// A deployment transaction that has been sent but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeployment {
    /// Name of the contract being deployed.
    pub contract_name: String,
    /// Hash of the creation transaction.
    pub transaction_hash: B256,
    /// ABI-encoded constructor arguments sent with the bytecode.
    pub constructor_args: Bytes,
}

/// A confirmed contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractHandle {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: B256,
    pub constructor_args: Bytes,
}

/// Capability used to publish contracts and interact with them.
///
/// Every async operation resolves only once the underlying transaction is
/// confirmed, so awaiting one call before issuing the next is enough to
/// enforce on-chain ordering.
pub trait ContractFramework: Send + Sync {
    /// Send the creation transaction for `artifact` with the given constructor arguments.
    fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> impl Future<Output = Result<PendingDeployment>> + Send;

    /// Wait for a pending deployment to be confirmed and register it.
    fn confirm(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = Result<ContractHandle>> + Send;

    /// Look up the confirmed deployment of `contract_name` from this run.
    fn deployed(&self, contract_name: &str) -> Result<ContractHandle>;

    /// Send a state-mutating call and wait for its confirmation.
    fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> impl Future<Output = Result<B256>> + Send;

    /// The account sending the transactions.
    fn sender(&self) -> Address;

    /// The chain ID of the target network.
    fn chain_id(&self) -> u64;
}
