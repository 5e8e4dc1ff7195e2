//! In-process chain used for dry runs and tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

use alloy_core::primitives::{Address, B256, Bytes, keccak256};
use anyhow::{Context, Result};

use super::{ContractFramework, ContractHandle, PendingDeployment};
use crate::{ContractArtifact, contracts};

/// Chain ID reported by the in-memory chain unless overridden.
pub const DEFAULT_CHAIN_ID: u64 = 1337;

/// A call sent to a contract on the in-memory chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCall {
    pub to: Address,
    pub calldata: Bytes,
    pub transaction_hash: B256,
}

#[derive(Debug, Default)]
struct ChainState {
    nonce: u64,
    /// Contract names in the order their deployment was requested.
    deployment_attempts: Vec<String>,
    pending: HashMap<B256, ContractHandle>,
    contracts: Vec<ContractHandle>,
    registry: HashMap<String, ContractHandle>,
    calls: Vec<SentCall>,
    ico_addresses: HashMap<Address, Address>,
    failing_deployments: HashSet<String>,
    fail_calls: bool,
}

/// A simulated chain living in the current process.
///
/// Addresses follow the `CREATE` rule from a random sender account, so each
/// new chain hands out fresh addresses and a chain never repeats one.
#[derive(Debug)]
pub struct InMemoryChain {
    chain_id: u64,
    sender: Address,
    state: Mutex<ChainState>,
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::with_chain_id(DEFAULT_CHAIN_ID)
    }

    pub fn with_chain_id(chain_id: u64) -> Self {
        Self {
            chain_id,
            sender: Address::from(rand::random::<[u8; 20]>()),
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Make every deployment of `contract_name` fail.
    pub fn fail_deployment_of(&self, contract_name: impl Into<String>) {
        self.state().failing_deployments.insert(contract_name.into());
    }

    /// Make every contract call fail.
    pub fn fail_calls(&self) {
        self.state().fail_calls = true;
    }

    /// Names of every contract whose deployment was requested, successful or not.
    pub fn deployment_attempts(&self) -> Vec<String> {
        self.state().deployment_attempts.clone()
    }

    /// Confirmed contracts, in creation order.
    pub fn contracts(&self) -> Vec<ContractHandle> {
        self.state().contracts.clone()
    }

    /// Confirmed calls, in order.
    pub fn calls(&self) -> Vec<SentCall> {
        self.state().calls.clone()
    }

    /// The ICO address configured on `token` through `set_ico_address`, if any.
    pub fn ico_address(&self, token: Address) -> Option<Address> {
        self.state().ico_addresses.get(&token).copied()
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_transaction_hash(&self, state: &mut ChainState, data: &[u8]) -> B256 {
        let mut preimage = Vec::with_capacity(20 + 8 + data.len());
        preimage.extend_from_slice(self.sender.as_slice());
        preimage.extend_from_slice(&state.nonce.to_be_bytes());
        preimage.extend_from_slice(data);
        keccak256(preimage)
    }

    fn send_deployment(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<PendingDeployment> {
        let mut state = self.state();
        state.deployment_attempts.push(artifact.contract_name.clone());

        if state.failing_deployments.contains(&artifact.contract_name) {
            anyhow::bail!("Deployment of {} reverted", artifact.contract_name);
        }

        let data = artifact.creation_data(&constructor_args);
        let transaction_hash = self.next_transaction_hash(&mut state, &data);
        let address = self.sender.create(state.nonce);
        state.nonce += 1;

        state.pending.insert(
            transaction_hash,
            ContractHandle {
                contract_name: artifact.contract_name.clone(),
                address,
                transaction_hash,
                constructor_args: constructor_args.clone(),
            },
        );

        Ok(PendingDeployment {
            contract_name: artifact.contract_name.clone(),
            transaction_hash,
            constructor_args,
        })
    }

    fn confirm_deployment(&self, pending: &PendingDeployment) -> Result<ContractHandle> {
        let mut state = self.state();
        let handle = state
            .pending
            .remove(&pending.transaction_hash)
            .with_context(|| format!("Unknown transaction {}", pending.transaction_hash))?;

        state
            .registry
            .insert(handle.contract_name.clone(), handle.clone());
        state.contracts.push(handle.clone());

        Ok(handle)
    }

    fn apply_call(&self, to: Address, calldata: Bytes) -> Result<B256> {
        let mut state = self.state();

        if state.fail_calls {
            anyhow::bail!("Call to {} reverted", to);
        }

        if !state.contracts.iter().any(|c| c.address == to) {
            anyhow::bail!("No contract deployed at {}", to);
        }

        let transaction_hash = self.next_transaction_hash(&mut state, &calldata);
        state.nonce += 1;

        if let Some(ico_address) = contracts::decode_set_ico_address(&calldata) {
            state.ico_addresses.insert(to, ico_address);
        }

        state.calls.push(SentCall {
            to,
            calldata,
            transaction_hash,
        });

        Ok(transaction_hash)
    }
}

impl ContractFramework for InMemoryChain {
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<PendingDeployment> {
        self.send_deployment(artifact, constructor_args)
    }

    async fn confirm(&self, pending: PendingDeployment) -> Result<ContractHandle> {
        self.confirm_deployment(&pending)
    }

    fn deployed(&self, contract_name: &str) -> Result<ContractHandle> {
        self.state()
            .registry
            .get(contract_name)
            .cloned()
            .with_context(|| format!("{} has not been deployed", contract_name))
    }

    async fn send_transaction(&self, to: Address, calldata: Bytes) -> Result<B256> {
        self.apply_call(to, calldata)
    }

    fn sender(&self) -> Address {
        self.sender
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str) -> ContractArtifact {
        ContractArtifact::new(name, vec![0x60, 0x80])
    }

    #[tokio::test]
    async fn test_deploy_then_confirm_registers_contract() {
        let chain = InMemoryChain::new();

        let pending = chain.deploy(&artifact("Wiji"), Bytes::new()).await.unwrap();
        assert!(chain.deployed("Wiji").is_err(), "Unconfirmed deployments are not visible");

        let handle = chain.confirm(pending).await.unwrap();
        assert_eq!(handle.address, chain.sender().create(0));
        assert_eq!(chain.deployed("Wiji").unwrap(), handle);
        assert_eq!(chain.contracts().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_contracts_match_handles() {
        let chain = InMemoryChain::new();
        let args = Bytes::from(vec![0x01, 0x02]);

        let pending = chain.deploy(&artifact("Wiji_ICO"), args.clone()).await.unwrap();
        let handle = chain.confirm(pending).await.unwrap();

        assert_eq!(handle.constructor_args, args);
        assert_eq!(chain.contracts(), vec![handle]);
    }

    #[tokio::test]
    async fn test_addresses_are_never_reused() {
        let chain = InMemoryChain::new();

        let first = chain.deploy(&artifact("Wiji"), Bytes::new()).await.unwrap();
        let first = chain.confirm(first).await.unwrap();
        let second = chain.deploy(&artifact("Wiji"), Bytes::new()).await.unwrap();
        let second = chain.confirm(second).await.unwrap();

        assert_ne!(first.address, second.address);
        assert_ne!(first.transaction_hash, second.transaction_hash);
        assert_eq!(chain.deployed("Wiji").unwrap().address, second.address);
    }

    #[tokio::test]
    async fn test_failing_deployment_is_recorded_as_attempt() {
        let chain = InMemoryChain::new();
        chain.fail_deployment_of("Wiji");

        let result = chain.deploy(&artifact("Wiji"), Bytes::new()).await;
        assert!(result.is_err());
        assert_eq!(chain.deployment_attempts(), vec!["Wiji".to_string()]);
        assert!(chain.contracts().is_empty());
    }

    #[tokio::test]
    async fn test_set_ico_address_call_is_tracked() {
        let chain = InMemoryChain::new();
        let pending = chain.deploy(&artifact("Wiji"), Bytes::new()).await.unwrap();
        let token = chain.confirm(pending).await.unwrap();
        let ico = Address::repeat_byte(0x42);

        chain
            .send_transaction(token.address, contracts::set_ico_address_calldata(ico))
            .await
            .unwrap();

        assert_eq!(chain.ico_address(token.address), Some(ico));
        assert_eq!(chain.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_call_to_unknown_address_fails() {
        let chain = InMemoryChain::new();
        let result = chain
            .send_transaction(Address::repeat_byte(0x01), Bytes::new())
            .await;
        assert!(result.is_err());
        assert!(chain.calls().is_empty());
    }
}
