use crate::domain::{
    ChainContext, ChainError, ChainReader, ContractCall, ContractKind, DecodedLog, PreparedCall,
};
use crate::interface_adapters::abi::AbiRegistry;
use crate::interface_adapters::clients::endpoint::Endpoint;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log, TransactionInput, TransactionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Node-backed contract access bound to the active chain's deployment.
#[derive(Clone)]
pub struct ContractClient {
    node: Endpoint,
    abi: Arc<AbiRegistry>,
    chain: Arc<ChainContext>,
}

impl ContractClient {
    pub fn new(node: Endpoint, abi: Arc<AbiRegistry>, chain: Arc<ChainContext>) -> Self {
        Self { node, abi, chain }
    }

    fn transaction(&self, call: &ContractCall, data: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .to(self.chain.address_of(call.contract))
            .value(call.value)
            .input(TransactionInput::new(data))
    }

    fn decode_log(
        &self,
        contract: ContractKind,
        event: &str,
        log: &Log,
    ) -> Result<DecodedLog, ChainError> {
        let fields = self
            .abi
            .decode_log(contract, event, log.topics(), &log.data().data)?;

        Ok(DecodedLog {
            block_number: log.block_number.unwrap_or_default(),
            tx_hash: log.transaction_hash.unwrap_or_default(),
            fields,
        })
    }
}

#[async_trait]
impl ChainReader for ContractClient {
    async fn read(&self, call: &ContractCall) -> Result<Vec<DynSolValue>, ChainError> {
        let tx = self.transaction(call, self.abi.encode_call(call)?);

        let output = self
            .node
            .request("eth_call", self.node.provider().call(tx))
            .await?;

        self.abi.decode_output(call, &output)
    }

    async fn prepare(&self, from: Address, call: &ContractCall) -> Result<PreparedCall, ChainError> {
        let data = self.abi.encode_call(call)?;
        let tx = self.transaction(call, data.clone()).from(from);

        // A failed estimate means the call would revert against current state.
        let gas = self
            .node
            .request("eth_estimateGas", self.node.provider().estimate_gas(tx))
            .await?;

        Ok(PreparedCall {
            from,
            to: self.chain.address_of(call.contract),
            data,
            value: call.value,
            gas,
        })
    }

    async fn events(
        &self,
        contract: ContractKind,
        event: &'static str,
        from_block: u64,
    ) -> Result<Vec<DecodedLog>, ChainError> {
        let filter = Filter::new()
            .address(self.chain.address_of(contract))
            .event_signature(self.abi.event_topic(contract, event)?)
            .from_block(from_block)
            .to_block(BlockNumberOrTag::Latest);

        let logs = self
            .node
            .request("eth_getLogs", self.node.provider().get_logs(&filter))
            .await?;

        logs.iter()
            .map(|log| self.decode_log(contract, event, log))
            .collect()
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.node
            .request("eth_blockNumber", self.node.provider().get_block_number())
            .await
    }
}
