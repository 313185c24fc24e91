use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::domain::{
    ChainContext, ChainError, ChainReader, Clock, ContractCall, ContractKind, DecodedLog,
    PreparedCall, WalletProvider,
};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

pub(crate) fn test_chain() -> ChainContext {
    ChainContext {
        chain_id: 5,
        name: "goerli".to_string(),
        explorer_url: "https://goerli.etherscan.io".to_string(),
        game_address: Address::repeat_byte(0x11),
        token_address: Address::repeat_byte(0x22),
    }
}

type ReadTable = HashMap<(ContractKind, &'static str), Result<Vec<DynSolValue>, ChainError>>;

// Chain fake answering reads from a table; unscripted reads fail.
#[derive(Clone, Default)]
pub(crate) struct ScriptedChain {
    reads: Arc<Mutex<ReadTable>>,
    prepare_failures: Arc<Mutex<HashMap<&'static str, ChainError>>>,
    logs: Arc<Mutex<Vec<DecodedLog>>>,
    block_number: u64,
    prepared: Arc<Mutex<Vec<ContractCall>>>,
}

impl ScriptedChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_value(
        self,
        contract: ContractKind,
        function: &'static str,
        value: DynSolValue,
    ) -> Self {
        self.set(contract, function, Ok(vec![value]));
        self
    }

    pub(crate) fn with_uint(self, contract: ContractKind, function: &'static str, value: U256) -> Self {
        self.with_value(contract, function, DynSolValue::Uint(value, 256))
    }

    pub(crate) fn with_error(
        self,
        contract: ContractKind,
        function: &'static str,
        error: ChainError,
    ) -> Self {
        self.set(contract, function, Err(error));
        self
    }

    pub(crate) fn with_prepare_failure(self, function: &'static str, error: ChainError) -> Self {
        self.prepare_failures
            .lock()
            .expect("prepare mutex poisoned")
            .insert(function, error);
        self
    }

    pub(crate) fn with_logs(mut self, block_number: u64, logs: Vec<DecodedLog>) -> Self {
        self.block_number = block_number;
        *self.logs.lock().expect("logs mutex poisoned") = logs;
        self
    }

    pub(crate) fn set(
        &self,
        contract: ContractKind,
        function: &'static str,
        result: Result<Vec<DynSolValue>, ChainError>,
    ) {
        self.reads
            .lock()
            .expect("reads mutex poisoned")
            .insert((contract, function), result);
    }

    pub(crate) fn prepared_calls(&self) -> Vec<ContractCall> {
        self.prepared.lock().expect("prepared mutex poisoned").clone()
    }
}

#[async_trait]
impl ChainReader for ScriptedChain {
    async fn read(&self, call: &ContractCall) -> Result<Vec<DynSolValue>, ChainError> {
        let guard = self.reads.lock().expect("reads mutex poisoned");
        guard
            .get(&(call.contract, call.function))
            .cloned()
            .unwrap_or_else(|| Err(ChainError::Transport(format!("{} not scripted", call.function))))
    }

    async fn prepare(&self, from: Address, call: &ContractCall) -> Result<PreparedCall, ChainError> {
        self.prepared
            .lock()
            .expect("prepared mutex poisoned")
            .push(call.clone());

        let failures = self.prepare_failures.lock().expect("prepare mutex poisoned");
        if let Some(error) = failures.get(call.function) {
            return Err(error.clone());
        }

        Ok(PreparedCall {
            from,
            to: test_chain().address_of(call.contract),
            data: Bytes::from(call.function.as_bytes().to_vec()),
            value: call.value,
            gas: 21_000,
        })
    }

    async fn events(
        &self,
        _contract: ContractKind,
        _event: &'static str,
        from_block: u64,
    ) -> Result<Vec<DecodedLog>, ChainError> {
        let logs = self.logs.lock().expect("logs mutex poisoned");
        Ok(logs
            .iter()
            .filter(|log| log.block_number >= from_block)
            .cloned()
            .collect())
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(self.block_number)
    }
}

// Wallet fake returning a fixed outcome and recording what it was asked to send.
#[derive(Clone)]
pub(crate) struct ScriptedWallet {
    outcome: Result<TxHash, ChainError>,
    sent: Arc<Mutex<Vec<PreparedCall>>>,
}

impl ScriptedWallet {
    pub(crate) fn approving(hash: TxHash) -> Self {
        Self {
            outcome: Ok(hash),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn rejecting() -> Self {
        Self {
            outcome: Err(ChainError::Rejected("User denied transaction signature.".to_string())),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn sent(&self) -> Vec<PreparedCall> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn send_transaction(&self, prepared: PreparedCall) -> Result<TxHash, ChainError> {
        self.sent
            .lock()
            .expect("sent mutex poisoned")
            .push(prepared);
        self.outcome.clone()
    }
}

// Wallet fake that never answers, like a signing prompt left open.
pub(crate) struct SilentWallet;

#[async_trait]
impl WalletProvider for SilentWallet {
    async fn send_transaction(&self, _prepared: PreparedCall) -> Result<TxHash, ChainError> {
        std::future::pending().await
    }
}
