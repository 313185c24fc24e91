use crate::domain::chain::ContractKind;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::fmt;

// A call against one of the contracts, described by name rather than by a
// generated wrapper per ABI entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub contract: ContractKind,
    pub function: &'static str,
    pub args: Vec<DynSolValue>,
    // Wei attached to payable calls.
    pub value: U256,
}

impl ContractCall {
    pub fn new(contract: ContractKind, function: &'static str) -> Self {
        Self {
            contract,
            function,
            args: Vec::new(),
            value: U256::ZERO,
        }
    }

    pub fn game(function: &'static str) -> Self {
        Self::new(ContractKind::Game, function)
    }

    pub fn token(function: &'static str) -> Self {
        Self::new(ContractKind::Token, function)
    }

    pub fn arg(mut self, value: DynSolValue) -> Self {
        self.args.push(value);
        self
    }

    pub fn address_arg(self, address: Address) -> Self {
        self.arg(DynSolValue::Address(address))
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

// A write that passed the feasibility check and is ready for the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas: u64,
}

// A decoded contract log, fields in ABI declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub block_number: u64,
    pub tx_hash: TxHash,
    pub fields: Vec<(String, DynSolValue)>,
}

impl DecodedLog {
    pub fn field(&self, name: &str) -> Option<&DynSolValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    Transport(String),
    Rpc { code: i64, message: String },
    // EIP-1193 user rejection surfaced by the wallet.
    Rejected(String),
    Decode(String),
    Abi(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Transport(message) => write!(f, "chain transport error: {message}"),
            ChainError::Rpc { code, message } => write!(f, "rpc error {code}: {message}"),
            ChainError::Rejected(message) => write!(f, "rejected by wallet: {message}"),
            ChainError::Decode(message) => write!(f, "chain response decode error: {message}"),
            ChainError::Abi(message) => write!(f, "abi error: {message}"),
        }
    }
}

impl std::error::Error for ChainError {}

// Node-facing port: reads, feasibility checks and logs.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn read(&self, call: &ContractCall) -> Result<Vec<DynSolValue>, ChainError>;

    async fn prepare(&self, from: Address, call: &ContractCall) -> Result<PreparedCall, ChainError>;

    async fn events(
        &self,
        contract: ContractKind,
        event: &'static str,
        from_block: u64,
    ) -> Result<Vec<DecodedLog>, ChainError>;

    async fn block_number(&self) -> Result<u64, ChainError>;
}

// Wallet-facing port. The wallet signs; we only hand it the prepared call.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn send_transaction(&self, prepared: PreparedCall) -> Result<TxHash, ChainError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

// Value extraction helpers for single-output reads.

pub fn single_uint(values: Vec<DynSolValue>) -> Result<U256, ChainError> {
    match values.into_iter().next() {
        Some(DynSolValue::Uint(value, _)) => Ok(value),
        other => Err(unexpected("uint", other)),
    }
}

pub fn single_bool(values: Vec<DynSolValue>) -> Result<bool, ChainError> {
    match values.into_iter().next() {
        Some(DynSolValue::Bool(value)) => Ok(value),
        other => Err(unexpected("bool", other)),
    }
}

pub fn single_address(values: Vec<DynSolValue>) -> Result<Address, ChainError> {
    match values.into_iter().next() {
        Some(DynSolValue::Address(value)) => Ok(value),
        other => Err(unexpected("address", other)),
    }
}

// Contract timestamps are uint256; anything past u64 saturates.
pub fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn unexpected(expected: &str, got: Option<DynSolValue>) -> ChainError {
    ChainError::Decode(format!("expected single {expected} output, got {got:?}"))
}
